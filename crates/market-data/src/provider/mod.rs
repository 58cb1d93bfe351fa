//! Balance and price provider abstractions and implementations.
//!
//! This module contains:
//! - The `AssetProvider` trait that all providers implement
//! - Provider capabilities and the operations they gate
//! - Concrete providers: EVM chains, Solana, exchanges, CoinGecko, exchangerate-api
//! - The closed [`Provider`] enum the registry stores
//!
//! # Architecture
//!
//! The set of provider kinds is fixed, so the registry holds a `Provider`
//! enum rather than trait objects. The enum implements `AssetProvider` by
//! delegating to the wrapped variant; the aggregator only ever sees the trait.

mod capabilities;
mod http;
mod rpc;
mod traits;

pub mod coingecko;
pub mod evm;
pub mod exchange;
pub mod exchange_rate_api;
pub mod solana;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::{Account, Asset, Balance, PriceDetail, PriceQuote};

// Re-exports
pub use capabilities::{Operation, ProviderCapabilities};
pub use coingecko::CoinGeckoProvider;
pub use evm::EvmProvider;
pub use exchange::{Credentials, Exchange, ExchangeProvider};
pub use exchange_rate_api::ExchangeRateApiProvider;
pub use solana::SolanaProvider;
pub use traits::AssetProvider;

/// Every provider kind the registry can hold.
pub enum Provider {
    Evm(EvmProvider),
    Solana(SolanaProvider),
    Exchange(ExchangeProvider),
    PriceIndex(CoinGeckoProvider),
    FxRate(ExchangeRateApiProvider),
}

impl Provider {
    fn inner(&self) -> &dyn AssetProvider {
        match self {
            Provider::Evm(p) => p,
            Provider::Solana(p) => p,
            Provider::Exchange(p) => p,
            Provider::PriceIndex(p) => p,
            Provider::FxRate(p) => p,
        }
    }

    /// RPC endpoint for chain providers.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Provider::Evm(p) => Some(p.rpc_url()),
            Provider::Solana(p) => Some(p.rpc_url()),
            _ => None,
        }
    }
}

impl From<EvmProvider> for Provider {
    fn from(p: EvmProvider) -> Self {
        Provider::Evm(p)
    }
}

impl From<SolanaProvider> for Provider {
    fn from(p: SolanaProvider) -> Self {
        Provider::Solana(p)
    }
}

impl From<ExchangeProvider> for Provider {
    fn from(p: ExchangeProvider) -> Self {
        Provider::Exchange(p)
    }
}

impl From<CoinGeckoProvider> for Provider {
    fn from(p: CoinGeckoProvider) -> Self {
        Provider::PriceIndex(p)
    }
}

impl From<ExchangeRateApiProvider> for Provider {
    fn from(p: ExchangeRateApiProvider) -> Self {
        Provider::FxRate(p)
    }
}

#[async_trait]
impl AssetProvider for Provider {
    fn id(&self) -> &'static str {
        self.inner().id()
    }

    fn capabilities(&self) -> ProviderCapabilities {
        self.inner().capabilities()
    }

    async fn fetch_balance(
        &self,
        account: Option<&Account>,
        asset: &Asset,
    ) -> Result<Balance, ProviderError> {
        self.inner().fetch_balance(account, asset).await
    }

    async fn fetch_balances(
        &self,
        account: Option<&Account>,
        assets: &[Asset],
    ) -> Result<Vec<Balance>, ProviderError> {
        self.inner().fetch_balances(account, assets).await
    }

    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote, ProviderError> {
        self.inner().fetch_price(symbol).await
    }

    async fn fetch_prices(&self, symbols: &[String]) -> Result<Vec<PriceQuote>, ProviderError> {
        self.inner().fetch_prices(symbols).await
    }

    async fn fetch_detailed_price(&self, symbol: &str) -> Result<PriceDetail, ProviderError> {
        self.inner().fetch_detailed_price(symbol).await
    }
}
