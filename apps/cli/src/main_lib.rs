use coinscope_core::report::{
    render_balances, render_debug, render_detail, render_markets, render_quote,
};
use coinscope_core::{
    balance_sources, market_sources, BalanceRun, Catalog, Config, DetailRun, MarketRun, QuoteRun,
};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const USAGE: &str = "\
Usage: coinscope [COMMAND]

Commands:
  balances       Wallet and exchange balances valued in USD (default)
  markets        Same-asset prices across exchanges
  detail <SYM>   Open, high, low, previous close and volume per exchange
  quote <SYM>    Current USD price and 24h change
  all            balances, then markets";

/// A report to print.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Balances,
    Markets,
    Detail(String),
    Quote(String),
    All,
}

impl Command {
    /// `None` for an unknown command or a missing symbol.
    pub fn parse<I>(args: I) -> Option<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let command = match args.next() {
            None => return Some(Command::Balances),
            Some(command) => command.to_ascii_lowercase(),
        };
        match command.as_str() {
            "balances" => Some(Command::Balances),
            "markets" => Some(Command::Markets),
            "all" => Some(Command::All),
            "detail" => args.next().map(Command::Detail),
            "quote" => args.next().map(Command::Quote),
            _ => None,
        }
    }
}

/// Logs go to stderr so reports on stdout stay clean.
pub fn init_tracing(debug: bool) {
    let log_format = std::env::var("COINSCOPE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Run `command` and return the sections to print, in order.
pub async fn run(command: &Command, config: &Config) -> Vec<String> {
    let catalog = Catalog::standard();
    let mut sections = Vec::new();

    if matches!(command, Command::Balances | Command::All) {
        let registry = balance_sources(config, &catalog);
        info!("Fetching balances from {} providers", registry.len());
        let report = BalanceRun::new(config, &catalog, &registry).run().await;
        sections.push(render_balances(&report));
        if config.debug {
            sections.push(render_debug(&report.diagnostics, &report.skipped));
        }
    }

    if matches!(command, Command::Markets | Command::All) {
        let registry = market_sources(config, &catalog);
        info!("Fetching market prices from {} providers", registry.len());
        let report = MarketRun::new(&catalog, &registry).run().await;
        sections.push(render_markets(&report));
        if config.debug {
            sections.push(render_debug(&report.diagnostics, registry.skipped()));
        }
    }

    match command {
        Command::Detail(symbol) => {
            let registry = market_sources(config, &catalog);
            let report = DetailRun::new(&registry).run(symbol).await;
            sections.push(render_detail(&report));
            if config.debug {
                sections.push(render_debug(&report.diagnostics, registry.skipped()));
            }
        }
        Command::Quote(symbol) => {
            let registry = market_sources(config, &catalog);
            match QuoteRun::new(&catalog, &registry).run(symbol).await {
                Ok(report) => {
                    sections.push(render_quote(&report));
                    if config.debug {
                        sections.push(render_debug(&report.diagnostics, registry.skipped()));
                    }
                }
                Err(e) => sections.push(format!("Error: {}", e)),
            }
        }
        _ => {}
    }

    sections
}
