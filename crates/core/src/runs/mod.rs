//! Single-shot report runs.
//!
//! Each run walks the catalog against a registry through the aggregator and
//! returns a plain report value; rendering happens in [`crate::report`].

mod balance;
mod detail;
mod market;
mod quote;

pub use balance::{usd_value, BalanceReport, BalanceRow, BalanceRun, Holder, PriceRow};
pub use detail::{DetailReport, DetailRun};
pub use market::{MarketReport, MarketRow, MarketRun};
pub use quote::{QuoteReport, QuoteRun};
