//! exchangerate-api.com fiat rate provider.
//!
//! `fetch_price("USD")` answers how many KRW one USD buys.

use std::borrow::Cow;
use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::{PriceQuote, QuoteCurrency};
use crate::provider::http;
use crate::provider::{AssetProvider, ProviderCapabilities};

/// Provider ID constant
pub const EXCHANGERATE_API_ID: &str = "EXCHANGERATE_API";

const BASE_URL: &str = "https://api.exchangerate-api.com/v4";

#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

pub struct ExchangeRateApiProvider {
    client: Client,
    base_url: String,
}

impl Default for ExchangeRateApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeRateApiProvider {
    pub fn new() -> Self {
        Self {
            client: http::build_client(),
            base_url: BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl AssetProvider for ExchangeRateApiProvider {
    fn id(&self) -> &'static str {
        EXCHANGERATE_API_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::prices_only()
    }

    async fn fetch_price(&self, symbol: &str) -> Result<PriceQuote, ProviderError> {
        let base = symbol.trim().to_ascii_uppercase();
        if base == QuoteCurrency::Krw.code() {
            return Err(ProviderError::not_applicable(EXCHANGERATE_API_ID, &base));
        }
        let url = format!("{}/latest/{}", self.base_url, base);
        let body = http::send(EXCHANGERATE_API_ID, self.client.get(url)).await?;
        parse_krw_rate(&body, &base)
    }
}

fn parse_krw_rate(body: &str, base: &str) -> Result<PriceQuote, ProviderError> {
    let latest: LatestRates = http::parse_json(EXCHANGERATE_API_ID, body)?;
    let rate = latest
        .rates
        .get(QuoteCurrency::Krw.code())
        .copied()
        .ok_or_else(|| ProviderError::malformed(EXCHANGERATE_API_ID, "no KRW rate"))?;
    let rate = http::decimal_from_f64(EXCHANGERATE_API_ID, "rates.KRW", rate)?;
    Ok(PriceQuote::new(
        base,
        QuoteCurrency::Krw,
        rate,
        Cow::Borrowed(EXCHANGERATE_API_ID),
    ))
}
