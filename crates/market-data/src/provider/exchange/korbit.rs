//! Korbit REST adapter.
//!
//! Market data comes from the v1 detailed ticker, holdings from the v2
//! balance endpoint signed with HMAC-SHA256 over the query string.

use std::borrow::Cow;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::auth::{self, Credentials};
use super::Exchange;
use crate::errors::ProviderError;
use crate::models::{PriceDetail, QuoteCurrency};
use crate::provider::http;

pub(super) const BASE_URL: &str = "https://api.korbit.co.kr";

const PROVIDER_ID: &str = "KORBIT";

/// `GET /v1/ticker/detailed`; every number is a string.
#[derive(Debug, Deserialize)]
struct DetailedTicker {
    last: String,
    #[serde(default)]
    open: Option<String>,
    #[serde(default)]
    high: Option<String>,
    #[serde(default)]
    low: Option<String>,
    #[serde(default)]
    volume: Option<String>,
    /// Difference between `last` and the previous close
    #[serde(default)]
    change: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    success: bool,
    #[serde(default)]
    data: Vec<BalanceEntry>,
}

#[derive(Debug, Deserialize)]
struct BalanceEntry {
    currency: String,
    /// Total holding, including amounts in use by open orders
    balance: String,
}

pub(super) async fn ticker(
    client: &Client,
    base: &str,
    symbol: &str,
) -> Result<PriceDetail, ProviderError> {
    let request = client
        .get(format!("{}/v1/ticker/detailed", base))
        .query(&[("currency_pair", Exchange::Korbit.market(symbol))]);
    let body = http::send(PROVIDER_ID, request).await?;
    parse_ticker(&body, symbol)
}

/// Holdings of `symbols`, in order, from one signed `GET /v2/balance`.
pub(super) async fn holdings(
    client: &Client,
    base: &str,
    credentials: &Credentials,
    symbols: &[&str],
) -> Result<Vec<Decimal>, ProviderError> {
    let timestamp = auth::now_millis(PROVIDER_ID)?;
    let query = format!("timestamp={}", timestamp);
    let signature = auth::hmac_signature(PROVIDER_ID, &credentials.secret_key, &query)?;

    let request = client
        .get(format!("{}/v2/balance?{}&signature={}", base, query, signature))
        .header("X-KAPI-KEY", &credentials.access_key);
    let body = http::send(PROVIDER_ID, request).await?;
    parse_holdings(&body, symbols)
}

fn parse_ticker(body: &str, symbol: &str) -> Result<PriceDetail, ProviderError> {
    let ticker: DetailedTicker = http::parse_json(PROVIDER_ID, body)?;

    let current = http::decimal_from_str(PROVIDER_ID, "last", &ticker.last)?;
    let change = http::optional_decimal(PROVIDER_ID, "change", ticker.change.as_deref())?;

    let mut detail =
        PriceDetail::new(symbol, QuoteCurrency::Krw, current, Cow::Borrowed(PROVIDER_ID));
    detail.open = http::optional_decimal(PROVIDER_ID, "open", ticker.open.as_deref())?;
    detail.high = http::optional_decimal(PROVIDER_ID, "high", ticker.high.as_deref())?;
    detail.low = http::optional_decimal(PROVIDER_ID, "low", ticker.low.as_deref())?;
    detail.volume = http::optional_decimal(PROVIDER_ID, "volume", ticker.volume.as_deref())?;
    detail.prev_close = change.map(|change| current - change);
    Ok(detail)
}

fn parse_holdings(body: &str, symbols: &[&str]) -> Result<Vec<Decimal>, ProviderError> {
    let response: BalanceResponse = http::parse_json(PROVIDER_ID, body)?;
    if !response.success {
        return Err(ProviderError::malformed(
            PROVIDER_ID,
            "balance request was not successful",
        ));
    }
    symbols
        .iter()
        .map(|symbol| {
            match response
                .data
                .iter()
                .find(|e| e.currency.eq_ignore_ascii_case(symbol))
            {
                Some(entry) => http::decimal_from_str(PROVIDER_ID, "balance", &entry.balance),
                None => Ok(Decimal::ZERO),
            }
        })
        .collect()
}
