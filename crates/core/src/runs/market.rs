use coinscope_market_data::provider::exchange_rate_api::EXCHANGERATE_API_ID;
use coinscope_market_data::{
    AssetProvider, Exchange, Operation, PriceQuote, Provider, ProviderRegistry, ProviderResult,
    QuoteCurrency,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::aggregator::{invoke, Diagnostics, FetchPrice};
use crate::catalog::Catalog;

/// Exchange whose `KRW-USDT` market sets the conversion rate.
const RATE_EXCHANGE: Exchange = Exchange::Upbit;

#[derive(Clone, Debug)]
pub struct MarketRow {
    pub symbol: String,
    pub quotes: Vec<(Exchange, ProviderResult<PriceQuote>)>,
}

impl MarketRow {
    /// Price in the exchange's home currency.
    pub fn price(&self, exchange: Exchange) -> Option<Decimal> {
        self.quotes
            .iter()
            .find(|(e, _)| *e == exchange)
            .and_then(|(_, outcome)| outcome.value())
            .map(|quote| quote.price)
    }
}

/// Same-asset prices across exchanges plus the rates used to compare them.
#[derive(Clone, Debug)]
pub struct MarketReport {
    /// Column order
    pub exchanges: Vec<Exchange>,
    pub rows: Vec<MarketRow>,
    /// KRW per USDT, fetched once for the whole run
    pub usdt_krw: Option<Decimal>,
    /// KRW per USD
    pub usd_krw: Option<Decimal>,
    pub diagnostics: Diagnostics,
}

impl MarketReport {
    /// Price of `row` on a USDT exchange converted to KRW with the run's rate.
    pub fn converted(&self, row: &MarketRow, exchange: Exchange) -> Option<Decimal> {
        if exchange.home_currency() != QuoteCurrency::Usdt {
            return None;
        }
        let price = row.price(exchange)?;
        let rate = self.usdt_krw?;
        price.checked_mul(rate)
    }
}

/// Latest price of each market symbol on every registered exchange.
pub struct MarketRun<'a, P = Provider> {
    catalog: &'a Catalog,
    registry: &'a ProviderRegistry<P>,
}

impl<'a, P: AssetProvider> MarketRun<'a, P> {
    pub fn new(catalog: &'a Catalog, registry: &'a ProviderRegistry<P>) -> Self {
        Self { catalog, registry }
    }

    pub async fn run(&self) -> MarketReport {
        let mut diagnostics = Diagnostics::default();
        let exchanges: Vec<(Exchange, &P)> = self
            .registry
            .list()
            .filter_map(|(id, provider)| Exchange::from_id(id).map(|e| (e, provider)))
            .collect();

        let usdt_krw = self.rate(RATE_EXCHANGE.id(), "USDT", &mut diagnostics).await;

        let mut rows = Vec::with_capacity(self.catalog.market_symbols().len());
        for symbol in self.catalog.market_symbols() {
            let mut quotes = Vec::with_capacity(exchanges.len());
            for (exchange, provider) in &exchanges {
                let outcome = invoke(&FetchPrice { symbol }, *provider).await;
                diagnostics.record(exchange.id(), Operation::FetchPrice, &outcome);
                quotes.push((*exchange, outcome));
            }
            rows.push(MarketRow {
                symbol: symbol.clone(),
                quotes,
            });
        }

        let usd_krw = self.rate(EXCHANGERATE_API_ID, "USD", &mut diagnostics).await;

        info!(
            "Market run finished: {} symbols on {} exchanges",
            rows.len(),
            exchanges.len()
        );
        MarketReport {
            exchanges: exchanges.into_iter().map(|(e, _)| e).collect(),
            rows,
            usdt_krw,
            usd_krw,
            diagnostics,
        }
    }

    /// KRW per unit of `symbol` from the named provider.
    async fn rate(
        &self,
        provider_id: &str,
        symbol: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<Decimal> {
        let Some(provider) = self.registry.get(provider_id) else {
            debug!("{} is not registered, no {} rate", provider_id, symbol);
            return None;
        };
        let outcome = invoke(&FetchPrice { symbol }, provider).await;
        diagnostics.record(provider_id, Operation::FetchPrice, &outcome);
        outcome
            .into_value()
            .filter(|quote| quote.currency == QuoteCurrency::Krw)
            .map(|quote| quote.price)
    }
}
