use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Local};
use coinscope_market_data::provider::coingecko::COINGECKO_ID;
use coinscope_market_data::{
    Asset, AssetProvider, Balance, Exchange, Operation, Provider, ProviderRegistry,
    ProviderResult, SkippedProvider,
};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info};

use crate::aggregator::{invoke, Diagnostics, FetchBalance, FetchBalances, FetchPrices};
use crate::catalog::{Catalog, HoldingSource};
use crate::config::Config;

/// Who holds a row's asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Holder {
    Address(String),
    /// Chain holding with no address configured
    Unset,
    Exchange(Exchange),
}

#[derive(Clone, Debug)]
pub struct BalanceRow {
    pub label: String,
    pub asset: Asset,
    pub holder: Holder,
    pub balance: ProviderResult<Balance>,
    /// USD price of the asset, when the price index answered for it
    pub price: Option<Decimal>,
}

impl BalanceRow {
    pub fn amount(&self) -> Option<Decimal> {
        self.balance.value().map(|b| b.amount)
    }

    /// Amount times price, rounded half away from zero to cents.
    pub fn usd_value(&self) -> Option<Decimal> {
        let amount = self.amount()?;
        let price = self.price?;
        Some(usd_value(amount, price))
    }

    pub fn is_held(&self) -> bool {
        self.balance.value().is_some_and(Balance::is_positive)
    }
}

/// Value of `amount` at `price`, in cents precision.
pub fn usd_value(amount: Decimal, price: Decimal) -> Decimal {
    amount
        .saturating_mul(price)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Clone, Debug)]
pub struct PriceRow {
    pub symbol: String,
    pub price: Option<Decimal>,
    pub precision: u32,
}

/// Everything the balances report shows.
#[derive(Clone, Debug)]
pub struct BalanceReport {
    pub generated_at: DateTime<Local>,
    pub rows: Vec<BalanceRow>,
    pub prices: Vec<PriceRow>,
    /// Whether the price index answered the batch request
    pub prices_available: bool,
    pub diagnostics: Diagnostics,
    pub skipped: Vec<SkippedProvider>,
}

/// Balances of every catalog holding whose provider is registered, valued
/// with one batched price-index request.
pub struct BalanceRun<'a, P = Provider> {
    config: &'a Config,
    catalog: &'a Catalog,
    registry: &'a ProviderRegistry<P>,
}

impl<'a, P: AssetProvider> BalanceRun<'a, P> {
    pub fn new(
        config: &'a Config,
        catalog: &'a Catalog,
        registry: &'a ProviderRegistry<P>,
    ) -> Self {
        Self {
            config,
            catalog,
            registry,
        }
    }

    pub async fn run(&self) -> BalanceReport {
        let generated_at = Local::now();
        let mut diagnostics = Diagnostics::default();
        let mut rows = Vec::new();

        let exchange_balances = self.fetch_exchange_balances(&mut diagnostics).await;

        for holding in self.catalog.holdings() {
            let provider_id = holding.provider_id();
            let Some(provider) = self.registry.get(provider_id) else {
                debug!("{} is not registered, no row for {}", provider_id, holding.label);
                continue;
            };

            let (holder, balance) = match &holding.source {
                HoldingSource::Chain { provider: id, network } => {
                    let account = self.config.account_for(id, *network);
                    let holder = match &account {
                        Some(account) => Holder::Address(account.address.clone()),
                        None => Holder::Unset,
                    };
                    let call = FetchBalance {
                        account: account.as_ref(),
                        asset: &holding.asset,
                    };
                    let balance = invoke(&call, provider).await;
                    diagnostics.record(provider_id, Operation::FetchBalance, &balance);
                    (holder, balance)
                }
                HoldingSource::Exchange(exchange) => {
                    let Some(listing) = exchange_balances.get(provider_id) else {
                        continue;
                    };
                    let balance = pick_balance(listing, &holding.asset, provider_id);
                    (Holder::Exchange(*exchange), balance)
                }
            };

            rows.push(BalanceRow {
                label: holding.label.clone(),
                asset: holding.asset.clone(),
                holder,
                balance,
                price: None,
            });
        }

        let price_rows = price_rows(&rows);
        let symbols: Vec<String> = price_rows.iter().map(|r| r.symbol.clone()).collect();
        let (prices, prices_available) = self.fetch_prices(&symbols, &mut diagnostics).await;

        for row in &mut rows {
            row.price = prices.get(&row.asset.symbol).copied();
        }
        let price_rows = price_rows
            .into_iter()
            .map(|row| PriceRow {
                price: prices.get(&row.symbol).copied(),
                ..row
            })
            .collect();

        info!("Balance run finished with {} rows", rows.len());
        BalanceReport {
            generated_at,
            rows,
            prices: price_rows,
            prices_available,
            diagnostics,
            skipped: self.registry.skipped().to_vec(),
        }
    }

    /// One account listing per registered exchange, covering all of its
    /// holdings.
    async fn fetch_exchange_balances(
        &self,
        diagnostics: &mut Diagnostics,
    ) -> HashMap<&'static str, ProviderResult<Vec<Balance>>> {
        let mut wanted: Vec<(&'static str, Vec<Asset>)> = Vec::new();
        for holding in self.catalog.holdings() {
            if !matches!(holding.source, HoldingSource::Exchange(_)) {
                continue;
            }
            let provider_id = holding.provider_id();
            match wanted.iter_mut().find(|(id, _)| *id == provider_id) {
                Some((_, assets)) => assets.push(holding.asset.clone()),
                None => wanted.push((provider_id, vec![holding.asset.clone()])),
            }
        }

        let mut listings = HashMap::new();
        for (provider_id, assets) in &wanted {
            let Some(provider) = self.registry.get(provider_id) else {
                continue;
            };
            let call = FetchBalances {
                account: None,
                assets,
            };
            let outcome = invoke(&call, provider).await;
            diagnostics.record(provider_id, Operation::FetchBalance, &outcome);
            listings.insert(*provider_id, outcome);
        }
        listings
    }

    async fn fetch_prices(
        &self,
        symbols: &[String],
        diagnostics: &mut Diagnostics,
    ) -> (HashMap<String, Decimal>, bool) {
        let Some(index) = self.registry.get(COINGECKO_ID) else {
            debug!("No price index registered");
            return (HashMap::new(), false);
        };
        let outcome = invoke(&FetchPrices { symbols }, index).await;
        diagnostics.record(COINGECKO_ID, Operation::FetchPrice, &outcome);

        let available = outcome.is_success();
        let prices = outcome
            .into_value()
            .unwrap_or_default()
            .into_iter()
            .map(|quote| (quote.symbol, quote.price))
            .collect();
        (prices, available)
    }
}

/// The entry for `asset` in an exchange's listing; zero when it is missing.
fn pick_balance(
    listing: &ProviderResult<Vec<Balance>>,
    asset: &Asset,
    provider_id: &'static str,
) -> ProviderResult<Balance> {
    listing.clone().map(|balances| {
        balances
            .into_iter()
            .find(|b| b.symbol == asset.symbol)
            .unwrap_or_else(|| Balance::zero(&asset.symbol, Cow::Borrowed(provider_id)))
    })
}

/// One price row per priced asset, in first-appearance order.
fn price_rows(rows: &[BalanceRow]) -> Vec<PriceRow> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| row.asset.price_id.is_some())
        .filter(|row| seen.insert(row.asset.symbol.clone()))
        .map(|row| PriceRow {
            symbol: row.asset.symbol.clone(),
            price: None,
            precision: row.asset.price_precision,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Holding, JUP_MINT};
    use crate::config::keys;
    use crate::testing::{config, MockProvider};
    use coinscope_market_data::{Network, ProviderCapabilities};
    use rust_decimal_macros::dec;

    const SOL_OWNER: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

    fn solana_catalog() -> Catalog {
        let sol = Asset::native("SOL", "Solana", 9).with_price_id("solana");
        let jup = Asset::token("JUP", "Jupiter", JUP_MINT, 6)
            .with_price_id("jupiter")
            .with_price_precision(4);
        Catalog::new(
            vec![sol.clone(), jup.clone()],
            vec![
                Holding::on_chain("Solana", sol, "SOLANA", Network::Solana),
                Holding::on_chain("Jupiter", jup, "SOLANA", Network::Solana),
            ],
            vec![],
        )
    }

    fn price_index() -> MockProvider {
        MockProvider::new("COINGECKO").with_capabilities(ProviderCapabilities::prices_only())
    }

    #[tokio::test]
    async fn test_sol_held_and_jup_account_missing() {
        let config = config(&[(keys::SOL_ADDRESS, SOL_OWNER)]);
        let catalog = solana_catalog();
        let mut registry: ProviderRegistry<MockProvider> = ProviderRegistry::new();
        registry
            .register(MockProvider::new("SOLANA").with_balance("SOL", dec!(2.5)))
            .register(price_index().with_price("SOL", dec!(150.00)));

        let report = BalanceRun::new(&config, &catalog, &registry).run().await;

        assert_eq!(report.rows.len(), 2);
        let sol = &report.rows[0];
        assert_eq!(sol.amount(), Some(dec!(2.5)));
        assert!(sol.is_held());
        assert_eq!(sol.usd_value(), Some(dec!(375.00)));
        assert_eq!(sol.holder, Holder::Address(SOL_OWNER.to_string()));

        let jup = &report.rows[1];
        assert_eq!(jup.amount(), Some(Decimal::ZERO));
        assert!(!jup.is_held());
        assert_eq!(jup.usd_value(), None);
        assert!(report.prices_available);
        assert_eq!(report.prices[1].price, None);
    }

    #[tokio::test]
    async fn test_missing_address_is_not_configured() {
        let config = config(&[]);
        let catalog = solana_catalog();
        let mut registry: ProviderRegistry<MockProvider> = ProviderRegistry::new();
        registry.register(MockProvider::new("SOLANA").with_balance("SOL", dec!(1)));

        let report = BalanceRun::new(&config, &catalog, &registry).run().await;

        assert!(matches!(report.rows[0].balance, ProviderResult::NotConfigured));
        assert_eq!(report.rows[0].holder, Holder::Unset);
        assert!(!report.prices_available);
    }

    #[tokio::test]
    async fn test_unregistered_exchange_has_no_row() {
        let config = config(&[(keys::SOL_ADDRESS, SOL_OWNER)]);
        let catalog = Catalog::standard();
        let mut registry: ProviderRegistry<MockProvider> = ProviderRegistry::new();
        registry
            .register(MockProvider::new("SOLANA"))
            .register(
                MockProvider::new("KORBIT")
                    .without_account()
                    .with_balance("BTC", dec!(0.01)),
            );

        let report = BalanceRun::new(&config, &catalog, &registry).run().await;

        assert!(report.rows.iter().all(|r| r.holder != Holder::Exchange(Exchange::Upbit)));
        let korbit: Vec<&BalanceRow> = report
            .rows
            .iter()
            .filter(|r| r.holder == Holder::Exchange(Exchange::Korbit))
            .collect();
        assert_eq!(korbit.len(), 5);
        assert_eq!(korbit[0].amount(), Some(dec!(0.01)));
        assert!(report
            .rows
            .iter()
            .all(|r| r.balance.failure().is_none()));
    }

    #[tokio::test]
    async fn test_price_index_failure_keeps_balances() {
        let config = config(&[(keys::SOL_ADDRESS, SOL_OWNER)]);
        let catalog = solana_catalog();
        let mut registry: ProviderRegistry<MockProvider> = ProviderRegistry::new();
        registry
            .register(MockProvider::new("SOLANA").with_balance("SOL", dec!(2.5)))
            .register(price_index().failing());

        let report = BalanceRun::new(&config, &catalog, &registry).run().await;

        assert_eq!(report.rows[0].amount(), Some(dec!(2.5)));
        assert_eq!(report.rows[0].usd_value(), None);
        assert!(!report.prices_available);
        assert_eq!(report.diagnostics.is_connected("COINGECKO"), Some(false));
    }

    #[tokio::test]
    async fn test_prices_requested_once_per_symbol() {
        let config = config(&[(keys::SOL_ADDRESS, SOL_OWNER)]);
        let catalog = solana_catalog();
        let mut registry: ProviderRegistry<MockProvider> = ProviderRegistry::new();
        registry
            .register(MockProvider::new("SOLANA"))
            .register(price_index());

        BalanceRun::new(&config, &catalog, &registry).run().await;

        let index = registry.get("COINGECKO").unwrap();
        assert_eq!(index.calls(), vec!["prices:SOL,JUP"]);
    }

    #[tokio::test]
    async fn test_exchange_accounts_fetched_once_per_run() {
        let config = config(&[]);
        let catalog = Catalog::standard();
        let mut registry: ProviderRegistry<MockProvider> = ProviderRegistry::new();
        registry.register(
            MockProvider::new("UPBIT")
                .without_account()
                .with_balance("BTC", dec!(0.02))
                .with_balance("ETH", dec!(1.5)),
        );

        let report = BalanceRun::new(&config, &catalog, &registry).run().await;

        let upbit = registry.get("UPBIT").unwrap();
        let calls = upbit.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("balances:"));
        assert_eq!(upbit.call_count(&calls[0]), 1);

        let rows: Vec<&BalanceRow> = report
            .rows
            .iter()
            .filter(|r| r.holder == Holder::Exchange(Exchange::Upbit))
            .collect();
        assert!(rows.len() > 1);
        let btc = rows.iter().find(|r| r.asset.symbol == "BTC").unwrap();
        assert_eq!(btc.amount(), Some(dec!(0.02)));
        let eth = rows.iter().find(|r| r.asset.symbol == "ETH").unwrap();
        assert_eq!(eth.amount(), Some(dec!(1.5)));
        assert_eq!(report.diagnostics.is_connected("UPBIT"), Some(true));
    }

    #[tokio::test]
    async fn test_failed_exchange_listing_fails_each_row() {
        let config = config(&[]);
        let catalog = Catalog::standard();
        let mut registry: ProviderRegistry<MockProvider> = ProviderRegistry::new();
        registry.register(MockProvider::new("BITHUMB").without_account().failing());

        let report = BalanceRun::new(&config, &catalog, &registry).run().await;

        let rows: Vec<&BalanceRow> = report
            .rows
            .iter()
            .filter(|r| r.holder == Holder::Exchange(Exchange::Bithumb))
            .collect();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.balance.failure().is_some()));
        assert_eq!(registry.get("BITHUMB").unwrap().calls().len(), 1);
    }

    #[test]
    fn test_usd_value_rounds_half_away_from_zero() {
        assert_eq!(usd_value(dec!(1), dec!(0.125)), dec!(0.13));
        assert_eq!(usd_value(dec!(3), dec!(0.005)), dec!(0.02));
        assert_eq!(usd_value(dec!(0), dec!(150)), dec!(0));
    }
}
