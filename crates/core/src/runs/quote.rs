use chrono::{DateTime, Local};
use coinscope_market_data::provider::coingecko::COINGECKO_ID;
use coinscope_market_data::{
    Asset, AssetProvider, Operation, PriceQuote, Provider, ProviderRegistry, ProviderResult,
};

use crate::aggregator::{invoke, Diagnostics, FetchPrice};
use crate::catalog::Catalog;
use crate::errors::{Error, Result};

/// Price-index quote with 24h change for one catalog asset.
#[derive(Clone, Debug)]
pub struct QuoteReport {
    pub generated_at: DateTime<Local>,
    pub asset: Asset,
    pub quote: ProviderResult<PriceQuote>,
    pub diagnostics: Diagnostics,
}

pub struct QuoteRun<'a, P = Provider> {
    catalog: &'a Catalog,
    registry: &'a ProviderRegistry<P>,
}

impl<'a, P: AssetProvider> QuoteRun<'a, P> {
    pub fn new(catalog: &'a Catalog, registry: &'a ProviderRegistry<P>) -> Self {
        Self { catalog, registry }
    }

    pub async fn run(&self, symbol: &str) -> Result<QuoteReport> {
        let asset = self.catalog.asset(symbol.trim())?.clone();
        let index = self
            .registry
            .get(COINGECKO_ID)
            .ok_or_else(|| Error::ProviderMissing(COINGECKO_ID.to_string()))?;

        let quote = invoke(
            &FetchPrice {
                symbol: &asset.symbol,
            },
            index,
        )
        .await;
        let mut diagnostics = Diagnostics::default();
        diagnostics.record(COINGECKO_ID, Operation::FetchPrice, &quote);

        Ok(QuoteReport {
            generated_at: Local::now(),
            asset,
            quote,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProvider;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_quote_with_change() {
        let catalog = Catalog::standard();
        let mut registry: ProviderRegistry<MockProvider> = ProviderRegistry::new();
        registry.register(
            MockProvider::new("COINGECKO")
                .with_price("JUP", dec!(0.8123))
                .with_change("JUP", dec!(-3.21)),
        );

        let report = QuoteRun::new(&catalog, &registry).run("jup").await.unwrap();

        assert_eq!(report.asset.name, "Jupiter");
        let quote = report.quote.value().unwrap();
        assert_eq!(quote.price, dec!(0.8123));
        assert_eq!(quote.change_24h_pct, Some(dec!(-3.21)));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_an_error() {
        let catalog = Catalog::standard();
        let registry: ProviderRegistry<MockProvider> = ProviderRegistry::new();

        let result = QuoteRun::new(&catalog, &registry).run("DOGE").await;

        assert!(matches!(result, Err(Error::UnknownSymbol(_))));
    }

    #[tokio::test]
    async fn test_missing_index_is_an_error() {
        let catalog = Catalog::standard();
        let registry: ProviderRegistry<MockProvider> = ProviderRegistry::new();

        let result = QuoteRun::new(&catalog, &registry).run("ETH").await;

        assert!(matches!(result, Err(Error::ProviderMissing(_))));
    }

    #[tokio::test]
    async fn test_index_failure_is_reported_not_raised() {
        let catalog = Catalog::standard();
        let mut registry: ProviderRegistry<MockProvider> = ProviderRegistry::new();
        registry.register(MockProvider::new("COINGECKO").failing());

        let report = QuoteRun::new(&catalog, &registry).run("ETH").await.unwrap();

        assert!(report.quote.failure().is_some());
    }
}
