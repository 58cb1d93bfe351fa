//! Console rendering of run reports.
//!
//! Tables only ever show values or placeholders; error text goes to the
//! diagnostic stream through `tracing`.

pub mod format;
mod table;

use coinscope_market_data::provider::coingecko::COINGECKO_ID;
use coinscope_market_data::{
    Exchange, PriceDetail, ProviderResult, QuoteCurrency, SkippedProvider,
};
use rust_decimal::Decimal;

use crate::aggregator::{Diagnostics, ProviderStatus};
use crate::runs::{
    BalanceReport, BalanceRow, DetailReport, Holder, MarketReport, QuoteReport,
};

pub use format::{NOT_APPLICABLE, NOT_AVAILABLE};
pub use table::{display_width, Align, Style, Table};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const HELD: &str = "✅";
const NOT_HELD: &str = "❌";

pub fn balance_table(report: &BalanceReport) -> Table {
    let mut table = Table::new(["Cryptocurrency", "Address", "Balance", "USD Value", "Status"]);
    for row in &report.rows {
        table.push_row([
            row.label.clone(),
            holder(row),
            format::or_na(row.amount(), |a| format::amount(a, &row.asset.symbol)),
            format::or_na(row.usd_value(), format::usd),
            (if row.is_held() { HELD } else { NOT_HELD }).to_string(),
        ]);
    }
    table
}

fn holder(row: &BalanceRow) -> String {
    match &row.holder {
        Holder::Address(address) => format::shorten_address(address),
        Holder::Unset => NOT_AVAILABLE.to_string(),
        Holder::Exchange(exchange) => exchange.name().to_string(),
    }
}

pub fn price_table(report: &BalanceReport) -> Table {
    let mut table = Table::new(["Cryptocurrency", "Current Price"]);
    for row in &report.prices {
        table.push_row([
            format!("{}/USD", row.symbol),
            format::or_na(row.price, |p| format::price(p, row.precision)),
        ]);
    }
    table
}

pub fn render_balances(report: &BalanceReport) -> String {
    let mut out = vec![
        "\n🔍 Cryptocurrency Balance Report".to_string(),
        format!("📅 Generated at: {}", report.generated_at.format(TIME_FORMAT)),
        "\n📊 Balance Details:".to_string(),
        balance_table(report).render(Style::FancyGrid),
        "\n💰 Current Prices:".to_string(),
        price_table(report).render(Style::FancyGrid),
    ];
    if report.rows.is_empty() {
        out.insert(3, "No holdings to report.".to_string());
    }
    out.join("\n")
}

pub fn market_table(report: &MarketReport) -> Table {
    let mut headers = vec!["Asset".to_string()];
    for exchange in &report.exchanges {
        match exchange.home_currency() {
            QuoteCurrency::Usdt => {
                headers.push(format!("{} (USDT)", exchange.name()));
                headers.push(format!("{} (KRW)", exchange.name()));
            }
            currency => headers.push(format!("{} ({})", exchange.name(), currency.code())),
        }
    }
    let mut align = vec![Align::Right; headers.len()];
    align[0] = Align::Left;

    let mut table = Table::new(headers).with_align(&align);
    for row in &report.rows {
        let mut cells = vec![row.symbol.clone()];
        for exchange in &report.exchanges {
            let native = row.price(*exchange);
            match exchange.home_currency() {
                QuoteCurrency::Usdt => {
                    cells.push(format::or_na(native, |p| format::fixed(p, 3)));
                    cells.push(format::or_na(report.converted(row, *exchange), |p| {
                        format::fixed(p, 1)
                    }));
                }
                _ => cells.push(format::or_na(native, |p| format::fixed(p, 1))),
            }
        }
        table.push_row(cells);
    }
    table
}

pub fn render_markets(report: &MarketReport) -> String {
    let usdt = match report.usdt_krw {
        Some(rate) => format!("Current Exchange Rate (KRW to USDT): {}", format::fixed(rate, 2)),
        None => "Failed to fetch exchange rate.".to_string(),
    };
    let usd = match report.usd_krw {
        Some(rate) => format!("Current Exchange Rate (KRW to USD): {}", format::fixed(rate, 2)),
        None => "Failed to fetch exchange rate (KRW to USD).".to_string(),
    };
    [market_table(report).render(Style::Pretty), usdt, usd].join("\n")
}

pub fn detail_table(report: &DetailReport) -> Table {
    let mut table = Table::new([
        "Exchange",
        "Currency",
        "Open",
        "High",
        "Low",
        "Prev Close",
        "Current",
        "Volume",
    ])
    .with_align(&[
        Align::Left,
        Align::Left,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
    ]);

    for (id, outcome) in report.details.iter() {
        let name = Exchange::from_id(id).map_or(id, |e| e.name());
        let mut cells = vec![name.to_string()];
        match outcome {
            ProviderResult::Success(detail) => cells.extend(detail_cells(detail)),
            ProviderResult::NotApplicable => cells.extend(vec![NOT_APPLICABLE.to_string(); 7]),
            _ => cells.extend(vec![NOT_AVAILABLE.to_string(); 7]),
        }
        table.push_row(cells);
    }
    table
}

fn detail_cells(detail: &PriceDetail) -> Vec<String> {
    let dp = price_decimals(detail.currency);
    let price = |value: Option<Decimal>| format::or_na(value, |v| format::fixed(v, dp));
    vec![
        detail.currency.code().to_string(),
        price(detail.open),
        price(detail.high),
        price(detail.low),
        price(detail.prev_close),
        price(Some(detail.current)),
        format::or_na(detail.volume, |v| format::fixed(v, 4)),
    ]
}

/// Display precision for prices quoted in `currency`.
fn price_decimals(currency: QuoteCurrency) -> u32 {
    match currency {
        QuoteCurrency::Krw => 1,
        QuoteCurrency::Usdt => 3,
        QuoteCurrency::Usd => 2,
    }
}

pub fn render_detail(report: &DetailReport) -> String {
    format!(
        "\n📈 {} Market Detail\n{}",
        report.symbol,
        detail_table(report).render(Style::FancyGrid)
    )
}

pub fn render_quote(report: &QuoteReport) -> String {
    let asset = &report.asset;
    let Some(quote) = report.quote.value() else {
        return format!("Error: Could not fetch price for {}.", asset.symbol);
    };
    let change = format::or_na(quote.change_24h_pct, |c| format!("{}%", format::fixed(c, 2)));
    [
        format!("\n🪐 {} ({}) Price Information", asset.name, asset.symbol),
        "--------------------------------".to_string(),
        format!("📅 Time: {}", report.generated_at.format(TIME_FORMAT)),
        format!(
            "💰 Current Price: {}",
            format::price(quote.price, asset.price_precision)
        ),
        format!("📈 24h Change: {}", change),
    ]
    .join("\n")
}

/// The debug section: one line per provider and operation, then skipped
/// providers.
pub fn render_debug(diagnostics: &Diagnostics, skipped: &[SkippedProvider]) -> String {
    let mut lines = vec!["\n🐛 Debug Information:".to_string()];
    if let Some(connected) = diagnostics.is_connected(COINGECKO_ID) {
        lines.push(format!(
            "Price API Status: {}",
            if connected { "Connected" } else { "Not Connected" }
        ));
    }
    lines.extend(diagnostics.entries().iter().map(status_line));
    lines.extend(
        skipped
            .iter()
            .map(|s| format!("{}: skipped ({})", s.provider_id, s.reason)),
    );
    lines.join("\n")
}

fn status_line(status: &ProviderStatus) -> String {
    let counts = [
        (status.ok, "ok"),
        (status.not_configured, "not configured"),
        (status.not_applicable, "not applicable"),
        (status.failed, "failed"),
    ];
    let summary: Vec<String> = counts
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{} {}", n, label))
        .collect();
    let mut line = format!(
        "{} {}: {}",
        status.provider,
        status.operation,
        summary.join(", ")
    );
    if let Some(class) = status.last_failure {
        line.push_str(&format!(" (last failure: {})", class));
    }
    line
}
