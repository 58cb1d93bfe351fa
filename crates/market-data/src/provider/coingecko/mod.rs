//! CoinGecko price index provider.
//!
//! Prices are looked up by CoinGecko coin id, not ticker, so the provider
//! carries a symbol -> id map. The built-in map covers the assets this tool
//! tracks; callers add or override entries with [`CoinGeckoProvider::with_id`].

use std::borrow::Cow;
use std::collections::HashMap;

use async_trait::async_trait;
use lazy_static::lazy_static;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::ProviderError;
use crate::models::{PriceQuote, QuoteCurrency};
use crate::provider::http;
use crate::provider::{AssetProvider, ProviderCapabilities};

/// Provider ID constant
pub const COINGECKO_ID: &str = "COINGECKO";

const BASE_URL: &str = "https://api.coingecko.com/api/v3";

lazy_static! {
    static ref DEFAULT_COIN_IDS: HashMap<&'static str, &'static str> = HashMap::from([
        ("BTC", "bitcoin"),
        ("ETH", "ethereum"),
        ("SOL", "solana"),
        ("FLR", "flare-networks"),
        ("WFLR", "flare-networks"),
        ("JUP", "jupiter"),
        ("JPL", "jupiter-protocol"),
        ("USDT", "tether"),
    ]);
}

/// One entry of the `simple/price` response.
#[derive(Debug, Deserialize)]
struct SimplePrice {
    #[serde(default)]
    usd: Option<f64>,
    #[serde(default)]
    usd_24h_change: Option<f64>,
}

pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    coin_ids: HashMap<String, String>,
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        let coin_ids = DEFAULT_COIN_IDS
            .iter()
            .map(|(symbol, id)| (symbol.to_string(), id.to_string()))
            .collect();
        Self {
            client: http::build_client(),
            base_url: BASE_URL.to_string(),
            coin_ids,
        }
    }

    /// Map `symbol` to CoinGecko coin `id`.
    pub fn with_id(mut self, symbol: &str, id: &str) -> Self {
        self.coin_ids.insert(symbol.to_ascii_uppercase(), id.to_string());
        self
    }

    pub fn coin_id(&self, symbol: &str) -> Option<&str> {
        self.coin_ids
            .get(&symbol.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Unique coin ids for `symbols`, in first-seen order. Unknown symbols are skipped.
    fn ids_for(&self, symbols: &[String]) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for symbol in symbols {
            match self.coin_id(symbol) {
                Some(id) if !ids.contains(&id) => ids.push(id),
                Some(_) => {}
                None => debug!("{}: no coin id for {}", COINGECKO_ID, symbol),
            }
        }
        ids
    }
}

#[async_trait]
impl AssetProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        COINGECKO_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::prices_only()
    }

    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote, ProviderError> {
        let symbol = symbol.to_ascii_uppercase();
        if self.coin_id(&symbol).is_none() {
            return Err(ProviderError::SymbolNotFound {
                provider: COINGECKO_ID.to_string(),
                symbol,
            });
        }
        let quotes = self.fetch_prices(std::slice::from_ref(&symbol)).await?;
        quotes
            .into_iter()
            .next()
            .ok_or(ProviderError::SymbolNotFound {
                provider: COINGECKO_ID.to_string(),
                symbol,
            })
    }

    /// One `simple/price` request for every symbol with a known coin id.
    async fn fetch_prices(&self, symbols: &[String]) -> Result<Vec<PriceQuote>, ProviderError> {
        let ids = self.ids_for(symbols);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let request = self
            .client
            .get(format!("{}/simple/price", self.base_url))
            .query(&[
                ("ids", ids.join(",")),
                ("vs_currencies", "usd".to_string()),
                ("include_24hr_change", "true".to_string()),
            ]);
        let body = http::send(COINGECKO_ID, request).await?;
        parse_prices(&body, symbols, &self.coin_ids)
    }
}

/// Build quotes for `symbols` from a `simple/price` body.
///
/// Several symbols may share one coin id (FLR and WFLR); each gets its own quote.
fn parse_prices(
    body: &str,
    symbols: &[String],
    coin_ids: &HashMap<String, String>,
) -> Result<Vec<PriceQuote>, ProviderError> {
    let prices: HashMap<String, SimplePrice> = http::parse_json(COINGECKO_ID, body)?;

    let mut quotes = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let symbol = symbol.to_ascii_uppercase();
        let Some(entry) = coin_ids.get(&symbol).and_then(|id| prices.get(id)) else {
            continue;
        };
        let Some(usd) = entry.usd else {
            continue;
        };
        let price = http::decimal_from_f64(COINGECKO_ID, "usd", usd)?;
        let change = entry
            .usd_24h_change
            .map(|c| http::decimal_from_f64(COINGECKO_ID, "usd_24h_change", c))
            .transpose()?;
        quotes.push(
            PriceQuote::new(&symbol, QuoteCurrency::Usd, price, Cow::Borrowed(COINGECKO_ID))
                .with_change(change),
        );
    }
    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_ids() {
        let provider = CoinGeckoProvider::new();
        assert_eq!(provider.coin_id("flr"), Some("flare-networks"));
        assert_eq!(provider.coin_id("JPL"), Some("jupiter-protocol"));
        assert_eq!(provider.coin_id("DOGE"), None);
    }

    #[test]
    fn test_with_id_overrides() {
        let provider = CoinGeckoProvider::new().with_id("doge", "dogecoin");
        assert_eq!(provider.coin_id("DOGE"), Some("dogecoin"));
    }

    #[test]
    fn test_ids_are_deduplicated() {
        let provider = CoinGeckoProvider::new();
        let ids = provider.ids_for(&symbols(&["FLR", "WFLR", "ETH", "DOGE"]));
        assert_eq!(ids, vec!["flare-networks", "ethereum"]);
    }

    #[test]
    fn test_parse_prices() {
        let provider = CoinGeckoProvider::new();
        let body = r#"{"ethereum":{"usd":3150.25,"usd_24h_change":-1.5},
                       "flare-networks":{"usd":0.0125},
                       "jupiter":{}}"#;
        let wanted = symbols(&["ETH", "FLR", "WFLR", "JUP"]);
        let quotes = parse_prices(body, &wanted, &provider.coin_ids).unwrap();

        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].symbol, "ETH");
        assert_eq!(quotes[0].price, dec!(3150.25));
        assert_eq!(quotes[0].change_24h_pct, Some(dec!(-1.5)));
        assert_eq!(quotes[1].symbol, "FLR");
        assert_eq!(quotes[1].price, dec!(0.0125));
        assert!(quotes[1].change_24h_pct.is_none());
        assert_eq!(quotes[2].symbol, "WFLR");
        assert!(quotes.iter().all(|q| q.currency == QuoteCurrency::Usd));
    }

    #[test]
    fn test_parse_prices_malformed() {
        let provider = CoinGeckoProvider::new();
        let result = parse_prices("<html>", &symbols(&["ETH"]), &provider.coin_ids);
        assert!(matches!(result, Err(ProviderError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let provider = CoinGeckoProvider::new();
        let result = provider.fetch_price("DOGE").await;
        assert!(matches!(result, Err(ProviderError::SymbolNotFound { .. })));
    }

    #[tokio::test]
    async fn test_no_known_symbols_skips_request() {
        let provider = CoinGeckoProvider::new();
        let quotes = provider.fetch_prices(&symbols(&["DOGE"])).await.unwrap();
        assert!(quotes.is_empty());
    }
}
