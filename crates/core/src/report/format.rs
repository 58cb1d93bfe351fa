//! Cell formatting for reports.

use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder for a value that could not be fetched.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a value that does not apply (an exchange's home currency).
pub const NOT_APPLICABLE: &str = "-";

/// `value` with exactly `dp` decimal places, rounded half away from zero.
pub fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    format!("{:.*}", dp as usize, rounded)
}

/// Insert `,` every three digits of the integer part.
pub fn with_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// `$1,234.56`
pub fn usd(value: Decimal) -> String {
    format!("${}", with_thousands(&fixed(value, 2)))
}

/// `$0.8123`, no separators.
pub fn price(value: Decimal, precision: u32) -> String {
    format!("${}", fixed(value, precision))
}

/// `2.5000 SOL`
pub fn amount(value: Decimal, symbol: &str) -> String {
    format!("{} {}", fixed(value, 4), symbol)
}

/// First 12 characters, `...`, last 4.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(12).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Optional value or the placeholder.
pub fn or_na(value: Option<Decimal>, render: impl FnOnce(Decimal) -> String) -> String {
    value.map(render).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
