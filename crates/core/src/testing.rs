//! Scripted providers for unit tests.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use coinscope_market_data::{
    Account, Asset, AssetProvider, Balance, PriceDetail, PriceQuote, ProviderCapabilities,
    ProviderError, QuoteCurrency,
};
use rust_decimal::Decimal;

use crate::config::Config;

/// A config read from `pairs` instead of the process environment.
pub(crate) fn config(pairs: &[(&str, &str)]) -> Config {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| env.get(key).cloned()).unwrap()
}

/// A provider answering from fixed tables and recording every call.
pub(crate) struct MockProvider {
    id: &'static str,
    capabilities: ProviderCapabilities,
    currency: QuoteCurrency,
    balances: HashMap<String, Decimal>,
    prices: HashMap<String, Decimal>,
    changes: HashMap<String, Decimal>,
    home: Option<String>,
    needs_account: bool,
    failing: bool,
    calls: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            capabilities: ProviderCapabilities {
                balances: true,
                prices: true,
                detailed_prices: true,
            },
            currency: QuoteCurrency::Usd,
            balances: HashMap::new(),
            prices: HashMap::new(),
            changes: HashMap::new(),
            home: None,
            needs_account: true,
            failing: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_capabilities(mut self, capabilities: ProviderCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Quote currency; the currency's own code answers `NotApplicable`.
    pub fn quoting(mut self, currency: QuoteCurrency) -> Self {
        self.currency = currency;
        self.home = Some(currency.code().to_string());
        self
    }

    pub fn with_balance(mut self, symbol: &str, amount: Decimal) -> Self {
        self.balances.insert(symbol.to_string(), amount);
        self
    }

    pub fn with_price(mut self, symbol: &str, price: Decimal) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }

    pub fn with_change(mut self, symbol: &str, change: Decimal) -> Self {
        self.changes.insert(symbol.to_string(), change);
        self
    }

    /// Balances are answered without an account, like an exchange.
    pub fn without_account(mut self) -> Self {
        self.needs_account = false;
        self
    }

    /// Every call fails with a network error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    fn record(&self, call: String) -> Result<(), ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.failing {
            return Err(ProviderError::Network {
                provider: self.id.to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn quote(&self, symbol: &str) -> Result<PriceQuote, ProviderError> {
        if self.home.as_deref() == Some(symbol) {
            return Err(ProviderError::NotApplicable {
                provider: self.id.to_string(),
                symbol: symbol.to_string(),
            });
        }
        let price = self
            .prices
            .get(symbol)
            .copied()
            .ok_or_else(|| ProviderError::SymbolNotFound {
                provider: self.id.to_string(),
                symbol: symbol.to_string(),
            })?;
        Ok(
            PriceQuote::new(symbol, self.currency, price, Cow::Borrowed(self.id))
                .with_change(self.changes.get(symbol).copied()),
        )
    }
}

#[async_trait]
impl AssetProvider for MockProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    fn capabilities(&self) -> ProviderCapabilities {
        self.capabilities
    }

    async fn fetch_balance(
        &self,
        account: Option<&Account>,
        asset: &Asset,
    ) -> Result<Balance, ProviderError> {
        self.record(format!("balance:{}", asset.symbol))?;
        if account.is_none() && self.needs_account {
            return Err(ProviderError::NotConfigured {
                provider: self.id.to_string(),
                what: "address".to_string(),
            });
        }
        let amount = self.balances.get(&asset.symbol).copied().unwrap_or_default();
        Ok(Balance::new(amount, &asset.symbol, Cow::Borrowed(self.id)))
    }

    async fn fetch_balances(
        &self,
        account: Option<&Account>,
        assets: &[Asset],
    ) -> Result<Vec<Balance>, ProviderError> {
        let symbols: Vec<&str> = assets.iter().map(|a| a.symbol.as_str()).collect();
        self.record(format!("balances:{}", symbols.join(",")))?;
        if account.is_none() && self.needs_account {
            return Err(ProviderError::NotConfigured {
                provider: self.id.to_string(),
                what: "address".to_string(),
            });
        }
        Ok(assets
            .iter()
            .map(|asset| {
                let amount = self.balances.get(&asset.symbol).copied().unwrap_or_default();
                Balance::new(amount, &asset.symbol, Cow::Borrowed(self.id))
            })
            .collect())
    }

    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote, ProviderError> {
        self.record(format!("price:{}", symbol))?;
        self.quote(symbol)
    }

    async fn fetch_prices(&self, symbols: &[String]) -> Result<Vec<PriceQuote>, ProviderError> {
        self.record(format!("prices:{}", symbols.join(",")))?;
        Ok(symbols.iter().filter_map(|s| self.quote(s).ok()).collect())
    }

    async fn fetch_detailed_price(&self, symbol: &str) -> Result<PriceDetail, ProviderError> {
        self.record(format!("detail:{}", symbol))?;
        let quote = self.quote(symbol)?;
        let mut detail = PriceDetail::new(symbol, self.currency, quote.price, quote.source);
        detail.open = Some(quote.price);
        detail.volume = Some(Decimal::ONE);
        Ok(detail)
    }
}
