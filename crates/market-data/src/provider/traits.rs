//! Asset provider trait definitions.
//!
//! This module defines the `AssetProvider` capability interface that every
//! chain, exchange and price source implements.

use async_trait::async_trait;
use tracing::debug;

use crate::errors::ProviderError;
use crate::models::{Account, Asset, Balance, PriceDetail, PriceQuote};

use super::capabilities::ProviderCapabilities;

/// Trait for balance and price providers.
///
/// Every operation performs outbound network calls, never mutates shared
/// state and never retries. Unsupported operations fall back to the default
/// implementations, which return `NotSupported`.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use coinscope_market_data::provider::{AssetProvider, ProviderCapabilities};
///
/// struct MyExchange;
///
/// #[async_trait]
/// impl AssetProvider for MyExchange {
///     fn id(&self) -> &'static str {
///         "MY_EXCHANGE"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities::prices_only()
///     }
///
///     // ... implement fetch_price
/// }
/// ```
#[async_trait]
pub trait AssetProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "ETHEREUM", "UPBIT", etc.
    /// Used as the registry key and in logs.
    fn id(&self) -> &'static str;

    /// Describes which operations this provider offers.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Fetch the balance of `asset` held by `account`.
    ///
    /// `account` is `None` when no address is configured for this provider;
    /// chain providers answer with `NotConfigured`. A derived token account
    /// that does not exist yields a zero balance, not an error.
    async fn fetch_balance(
        &self,
        account: Option<&Account>,
        asset: &Asset,
    ) -> Result<Balance, ProviderError> {
        let _ = (account, asset);
        Err(ProviderError::not_supported(self.id(), "fetch_balance"))
    }

    /// Fetch the balances of several assets held by `account`, one per asset
    /// in input order.
    ///
    /// The default implementation calls `fetch_balance` once per asset and
    /// stops at the first error. Providers that list every holding in one
    /// response override it.
    async fn fetch_balances(
        &self,
        account: Option<&Account>,
        assets: &[Asset],
    ) -> Result<Vec<Balance>, ProviderError> {
        let mut balances = Vec::with_capacity(assets.len());
        for asset in assets {
            balances.push(self.fetch_balance(account, asset).await?);
        }
        Ok(balances)
    }

    /// Fetch the latest price for a symbol.
    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote, ProviderError> {
        let _ = symbol;
        Err(ProviderError::not_supported(self.id(), "fetch_price"))
    }

    /// Fetch prices for several symbols.
    ///
    /// Symbols the provider cannot price are left out of the result.
    /// The default implementation calls `fetch_price` once per symbol;
    /// providers with a batch endpoint override it.
    async fn fetch_prices(&self, symbols: &[String]) -> Result<Vec<PriceQuote>, ProviderError> {
        let mut quotes = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.fetch_price(symbol).await {
                Ok(quote) => quotes.push(quote),
                Err(e) => debug!("{}: no price for {}: {}", self.id(), symbol, e),
            }
        }
        Ok(quotes)
    }

    /// Fetch open/high/low/previous-close/current/volume for the trading day.
    async fn fetch_detailed_price(&self, symbol: &str) -> Result<PriceDetail, ProviderError> {
        let _ = symbol;
        Err(ProviderError::not_supported(self.id(), "fetch_detailed_price"))
    }
}
