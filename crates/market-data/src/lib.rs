//! Coinscope Market Data Crate
//!
//! This crate fetches balances and prices from blockchains, exchanges and
//! price indexes behind one provider interface.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Chain balances: Ethereum-compatible chains over JSON-RPC, Solana (native and SPL)
//! - Exchange market data and holdings: Upbit, Korbit, Bithumb, Binance, OKX
//! - USD prices from CoinGecko and the USD/KRW rate from exchangerate-api
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Configuration   | --> | ProviderRegistry |  (ordered, named)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Provider      |  (Evm, Solana, Exchange, ...)
//!                          +------------------+
//!                                  |
//!                                  v
//!                  +-------------------------------+
//!                  | Balance / PriceQuote / Detail |
//!                  +-------------------------------+
//! ```
//!
//! # Core Types
//!
//! - [`AssetProvider`] - Capability interface every provider implements
//! - [`Provider`] - Closed set of provider kinds held by the registry
//! - [`Balance`], [`PriceQuote`], [`PriceDetail`] - Fetched values
//! - [`ProviderResult`] - Tagged per-provider outcome
//! - [`ProviderError`] - Provider failures, classified by [`FailureClass`]

pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

// Re-export error types
pub use errors::{FailureClass, ProviderError};

// Re-export all public types from models
pub use models::{
    to_display_units, Account, Asset, Balance, Failure, Network, PriceDetail, PriceQuote,
    ProviderId, ProviderResult, QuoteCurrency, Symbol, DEFAULT_PRICE_PRECISION,
};

// Re-export provider types
pub use provider::{
    AssetProvider, CoinGeckoProvider, Credentials, EvmProvider, Exchange, ExchangeProvider,
    ExchangeRateApiProvider, Operation, Provider, ProviderCapabilities, SolanaProvider,
};

// Re-export registry types
pub use registry::{ProviderRegistry, SkipReason, SkippedProvider};
