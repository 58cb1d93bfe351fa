//! Plain-text grid tables.

/// Horizontal alignment of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

/// Border style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    /// Box-drawing borders with a rule between every row
    FancyGrid,
    /// ASCII borders, centered headers, no rules between rows
    Pretty,
}

struct Borders {
    top: [char; 4],
    header: [char; 4],
    between: Option<[char; 4]>,
    bottom: [char; 4],
    vertical: char,
}

impl Style {
    fn borders(self) -> Borders {
        match self {
            Style::FancyGrid => Borders {
                top: ['╒', '═', '╤', '╕'],
                header: ['╞', '═', '╪', '╡'],
                between: Some(['├', '─', '┼', '┤']),
                bottom: ['╘', '═', '╧', '╛'],
                vertical: '│',
            },
            Style::Pretty => Borders {
                top: ['+', '-', '+', '+'],
                header: ['+', '-', '+', '+'],
                between: None,
                bottom: ['+', '-', '+', '+'],
                vertical: '|',
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct Table {
    headers: Vec<String>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// A table whose columns are all left-aligned.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let align = vec![Align::Left; headers.len()];
        Self {
            headers,
            align,
            rows: Vec::new(),
        }
    }

    /// Per-column alignment; missing entries stay left-aligned.
    pub fn with_align(mut self, align: &[Align]) -> Self {
        for (slot, a) in self.align.iter_mut().zip(align) {
            *slot = *a;
        }
        self
    }

    /// Append a row; short rows are padded with empty cells.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn render(&self, style: Style) -> String {
        let borders = style.borders();
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                self.rows
                    .iter()
                    .map(|row| display_width(&row[col]))
                    .chain(std::iter::once(display_width(&self.headers[col])))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header_align: Vec<Align> = match style {
            Style::FancyGrid => self.align.clone(),
            Style::Pretty => vec![Align::Center; self.headers.len()],
        };

        let mut lines = vec![rule(&widths, borders.top)];
        lines.push(line(&self.headers, &widths, &header_align, borders.vertical));
        lines.push(rule(&widths, borders.header));
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                if let Some(between) = borders.between {
                    lines.push(rule(&widths, between));
                }
            }
            lines.push(line(row, &widths, &self.align, borders.vertical));
        }
        lines.push(rule(&widths, borders.bottom));
        lines.join("\n")
    }
}

fn rule(widths: &[usize], [left, fill, cross, right]: [char; 4]) -> String {
    let segments: Vec<String> = widths
        .iter()
        .map(|w| fill.to_string().repeat(w + 2))
        .collect();
    format!("{}{}{}", left, segments.join(&cross.to_string()), right)
}

fn line(cells: &[String], widths: &[usize], align: &[Align], vertical: char) -> String {
    let mut out = String::new();
    out.push(vertical);
    for ((cell, width), align) in cells.iter().zip(widths).zip(align) {
        out.push(' ');
        out.push_str(&pad(cell, *width, *align));
        out.push(' ');
        out.push(vertical);
    }
    out
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let fill = width.saturating_sub(display_width(cell));
    let (left, right) = match align {
        Align::Left => (0, fill),
        Align::Right => (fill, 0),
        Align::Center => (fill / 2, fill - fill / 2),
    };
    format!("{}{}{}", " ".repeat(left), cell, " ".repeat(right))
}

/// Terminal columns taken by `s`; pictographs count double and variation
/// selectors count zero.
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

fn char_width(c: char) -> usize {
    match c as u32 {
        0xFE00..=0xFE0F | 0x200D => 0,
        0x2600..=0x27BF | 0x1F300..=0x1FAFF => 2,
        _ => 1,
    }
}
