//! Centralized exchange providers.
//!
//! One [`ExchangeProvider`] type covers every supported exchange; the
//! [`Exchange`] it wraps selects the endpoints, the market naming rules and
//! the home currency. Public market data needs no credentials. Holdings are
//! read from the private account endpoint when a key pair is attached.

mod auth;
mod binance;
mod bithumb;
mod korbit;
mod okx;
mod upbit;

pub use auth::Credentials;

use std::borrow::Cow;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::errors::ProviderError;
use crate::models::{
    Account, Asset, Balance, PriceDetail, PriceQuote, ProviderId, QuoteCurrency,
};
use crate::provider::http;
use crate::provider::{AssetProvider, ProviderCapabilities};

/// Supported exchanges.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Exchange {
    Upbit,
    Korbit,
    Bithumb,
    Binance,
    Okx,
}

impl Exchange {
    pub const ALL: [Exchange; 5] = [
        Exchange::Upbit,
        Exchange::Bithumb,
        Exchange::Korbit,
        Exchange::Binance,
        Exchange::Okx,
    ];

    /// Provider id ("UPBIT")
    pub fn id(&self) -> &'static str {
        match self {
            Exchange::Upbit => "UPBIT",
            Exchange::Korbit => "KORBIT",
            Exchange::Bithumb => "BITHUMB",
            Exchange::Binance => "BINANCE",
            Exchange::Okx => "OKX",
        }
    }

    /// Display name ("Upbit")
    pub fn name(&self) -> &'static str {
        match self {
            Exchange::Upbit => "Upbit",
            Exchange::Korbit => "Korbit",
            Exchange::Bithumb => "Bithumb",
            Exchange::Binance => "Binance",
            Exchange::Okx => "OKX",
        }
    }

    pub fn from_id(id: &str) -> Option<Exchange> {
        Self::ALL.into_iter().find(|e| e.id() == id)
    }

    /// The currency this exchange quotes everything against.
    pub fn home_currency(&self) -> QuoteCurrency {
        match self {
            Exchange::Upbit | Exchange::Korbit | Exchange::Bithumb => QuoteCurrency::Krw,
            Exchange::Binance | Exchange::Okx => QuoteCurrency::Usdt,
        }
    }

    /// Whether a private account endpoint is wired up for this exchange.
    pub fn has_accounts(&self) -> bool {
        matches!(self, Exchange::Upbit | Exchange::Korbit | Exchange::Bithumb)
    }

    /// Market identifier for `symbol` against the home currency.
    ///
    /// Each exchange spells pairs its own way: `KRW-BTC`, `btc_krw`,
    /// `BTC_KRW`, `BTCUSDT`, `BTC-USDT`.
    pub fn market(&self, symbol: &str) -> String {
        let upper = symbol.to_ascii_uppercase();
        match self {
            Exchange::Upbit => format!("KRW-{}", upper),
            Exchange::Korbit => format!("{}_krw", symbol.to_ascii_lowercase()),
            Exchange::Bithumb => format!("{}_KRW", upper),
            Exchange::Binance => format!("{}USDT", upper),
            Exchange::Okx => format!("{}-USDT", upper),
        }
    }

    fn base_url(&self) -> &'static str {
        match self {
            Exchange::Upbit => upbit::BASE_URL,
            Exchange::Korbit => korbit::BASE_URL,
            Exchange::Bithumb => bithumb::BASE_URL,
            Exchange::Binance => binance::BASE_URL,
            Exchange::Okx => okx::BASE_URL,
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Market data and holdings for one exchange.
pub struct ExchangeProvider {
    exchange: Exchange,
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl ExchangeProvider {
    /// Public market data only.
    pub fn new(exchange: Exchange) -> Self {
        Self {
            exchange,
            client: http::build_client(),
            base_url: exchange.base_url().to_string(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Point the provider at another host, such as a self-hosted proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn source(&self) -> ProviderId {
        Cow::Borrowed(self.exchange.id())
    }

    /// Upper-cased symbol, or `NotApplicable` for the home currency.
    fn foreign_symbol(&self, symbol: &str) -> Result<String, ProviderError> {
        let symbol = symbol.trim().to_ascii_uppercase();
        if symbol == self.exchange.home_currency().code() {
            return Err(ProviderError::not_applicable(self.exchange.id(), &symbol));
        }
        Ok(symbol)
    }
}

#[async_trait]
impl AssetProvider for ExchangeProvider {
    fn id(&self) -> &'static str {
        self.exchange.id()
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            balances: self.exchange.has_accounts(),
            prices: true,
            detailed_prices: true,
        }
    }

    async fn fetch_balance(
        &self,
        account: Option<&Account>,
        asset: &Asset,
    ) -> Result<Balance, ProviderError> {
        let mut balances = self
            .fetch_balances(account, std::slice::from_ref(asset))
            .await?;
        balances
            .pop()
            .ok_or_else(|| ProviderError::malformed(self.id(), "no balance returned"))
    }

    /// Every asset is answered from a single account listing.
    async fn fetch_balances(
        &self,
        _account: Option<&Account>,
        assets: &[Asset],
    ) -> Result<Vec<Balance>, ProviderError> {
        if !self.exchange.has_accounts() {
            return Err(ProviderError::not_supported(self.id(), "fetch_balance"));
        }
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| ProviderError::NotConfigured {
                provider: self.id().to_string(),
                what: "access key / secret key".to_string(),
            })?;

        let symbols: Vec<&str> = assets.iter().map(|a| a.symbol.as_str()).collect();
        let (client, base) = (&self.client, self.base_url.as_str());
        let amounts = match self.exchange {
            Exchange::Upbit => upbit::holdings(client, base, credentials, &symbols).await?,
            Exchange::Korbit => korbit::holdings(client, base, credentials, &symbols).await?,
            Exchange::Bithumb => bithumb::holdings(client, base, credentials, &symbols).await?,
            Exchange::Binance | Exchange::Okx => {
                return Err(ProviderError::not_supported(self.id(), "fetch_balance"))
            }
        };
        debug!("{}: holdings for {}", self.id(), symbols.join(","));

        Ok(assets
            .iter()
            .zip(amounts)
            .map(|(asset, amount)| Balance::new(amount, asset.symbol.clone(), self.source()))
            .collect())
    }

    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote, ProviderError> {
        let symbol = self.foreign_symbol(symbol)?;
        let base = &self.base_url;
        match self.exchange {
            Exchange::Binance => binance::price(&self.client, base, &symbol).await,
            _ => self.fetch_detailed_price(&symbol).await.map(|d| d.to_quote()),
        }
    }

    async fn fetch_detailed_price(&self, symbol: &str) -> Result<PriceDetail, ProviderError> {
        let symbol = self.foreign_symbol(symbol)?;
        let base = &self.base_url;
        match self.exchange {
            Exchange::Upbit => upbit::ticker(&self.client, base, &symbol).await,
            Exchange::Korbit => korbit::ticker(&self.client, base, &symbol).await,
            Exchange::Bithumb => bithumb::ticker(&self.client, base, &symbol).await,
            Exchange::Binance => binance::ticker(&self.client, base, &symbol).await,
            Exchange::Okx => okx::ticker(&self.client, base, &symbol).await,
        }
    }
}
