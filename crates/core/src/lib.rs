//! Coinscope Core - configuration, asset catalog, aggregation and reports.
//!
//! This crate turns the environment into a provider registry, walks the
//! asset catalog through the aggregator, and renders the results as console
//! tables. Providers themselves live in `coinscope-market-data`.

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod report;
pub mod runs;
pub mod sources;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{collect, invoke, Collected, Diagnostics};
pub use catalog::{Catalog, Holding, HoldingSource};
pub use config::Config;
pub use runs::{BalanceRun, DetailRun, MarketRun, QuoteRun};
pub use sources::{balance_sources, market_sources};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
