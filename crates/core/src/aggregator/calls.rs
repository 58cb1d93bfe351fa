//! The provider operations a run can ask for, as values.

use async_trait::async_trait;
use coinscope_market_data::{
    Account, Asset, AssetProvider, Balance, Operation, PriceDetail, PriceQuote, ProviderError,
};

/// One operation plus its arguments, applied uniformly to any provider.
#[async_trait]
pub trait ProviderCall: Send + Sync {
    type Output: Send;

    /// Capability a provider needs to be asked at all.
    fn operation(&self) -> Operation;

    async fn call(&self, provider: &dyn AssetProvider) -> Result<Self::Output, ProviderError>;
}

/// Balance of one asset for an optional account.
pub struct FetchBalance<'a> {
    pub account: Option<&'a Account>,
    pub asset: &'a Asset,
}

#[async_trait]
impl ProviderCall for FetchBalance<'_> {
    type Output = Balance;

    fn operation(&self) -> Operation {
        Operation::FetchBalance
    }

    async fn call(&self, provider: &dyn AssetProvider) -> Result<Balance, ProviderError> {
        provider.fetch_balance(self.account, self.asset).await
    }
}

/// Balances of several assets from one provider in a single request.
pub struct FetchBalances<'a> {
    pub account: Option<&'a Account>,
    pub assets: &'a [Asset],
}

#[async_trait]
impl ProviderCall for FetchBalances<'_> {
    type Output = Vec<Balance>;

    fn operation(&self) -> Operation {
        Operation::FetchBalance
    }

    async fn call(&self, provider: &dyn AssetProvider) -> Result<Vec<Balance>, ProviderError> {
        provider.fetch_balances(self.account, self.assets).await
    }
}

pub struct FetchPrice<'a> {
    pub symbol: &'a str,
}

#[async_trait]
impl ProviderCall for FetchPrice<'_> {
    type Output = PriceQuote;

    fn operation(&self) -> Operation {
        Operation::FetchPrice
    }

    async fn call(&self, provider: &dyn AssetProvider) -> Result<PriceQuote, ProviderError> {
        provider.fetch_price(self.symbol).await
    }
}

/// Batched prices; gated on the same capability as a single price.
pub struct FetchPrices<'a> {
    pub symbols: &'a [String],
}

#[async_trait]
impl ProviderCall for FetchPrices<'_> {
    type Output = Vec<PriceQuote>;

    fn operation(&self) -> Operation {
        Operation::FetchPrice
    }

    async fn call(&self, provider: &dyn AssetProvider) -> Result<Vec<PriceQuote>, ProviderError> {
        provider.fetch_prices(self.symbols).await
    }
}

pub struct FetchDetailedPrice<'a> {
    pub symbol: &'a str,
}

#[async_trait]
impl ProviderCall for FetchDetailedPrice<'_> {
    type Output = PriceDetail;

    fn operation(&self) -> Operation {
        Operation::FetchDetailedPrice
    }

    async fn call(&self, provider: &dyn AssetProvider) -> Result<PriceDetail, ProviderError> {
        provider.fetch_detailed_price(self.symbol).await
    }
}
