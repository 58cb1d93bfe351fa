//! OKX public market data.

use std::borrow::Cow;

use reqwest::Client;
use serde::Deserialize;

use super::Exchange;
use crate::errors::ProviderError;
use crate::models::{PriceDetail, QuoteCurrency};
use crate::provider::http;

pub(super) const BASE_URL: &str = "https://www.okx.com";

const PROVIDER_ID: &str = "OKX";

#[derive(Debug, Deserialize)]
struct Envelope {
    code: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Vec<Ticker>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker {
    last: String,
    #[serde(default)]
    open24h: Option<String>,
    #[serde(default)]
    high24h: Option<String>,
    #[serde(default)]
    low24h: Option<String>,
    #[serde(default)]
    vol24h: Option<String>,
}

pub(super) async fn ticker(
    client: &Client,
    base: &str,
    symbol: &str,
) -> Result<PriceDetail, ProviderError> {
    let request = client
        .get(format!("{}/api/v5/market/ticker", base))
        .query(&[("instId", Exchange::Okx.market(symbol))]);
    let body = http::send(PROVIDER_ID, request).await?;
    parse_ticker(&body, symbol)
}

/// OKX reports no previous close, so `prev_close` stays empty.
fn parse_ticker(body: &str, symbol: &str) -> Result<PriceDetail, ProviderError> {
    let envelope: Envelope = http::parse_json(PROVIDER_ID, body)?;
    if envelope.code != "0" {
        return Err(ProviderError::malformed(
            PROVIDER_ID,
            format!("code {}: {}", envelope.code, envelope.msg),
        ));
    }
    let ticker = envelope
        .data
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::SymbolNotFound {
            provider: PROVIDER_ID.to_string(),
            symbol: symbol.to_string(),
        })?;

    let current = http::decimal_from_str(PROVIDER_ID, "last", &ticker.last)?;
    let mut detail =
        PriceDetail::new(symbol, QuoteCurrency::Usdt, current, Cow::Borrowed(PROVIDER_ID));
    detail.open = http::optional_decimal(PROVIDER_ID, "open24h", ticker.open24h.as_deref())?;
    detail.high = http::optional_decimal(PROVIDER_ID, "high24h", ticker.high24h.as_deref())?;
    detail.low = http::optional_decimal(PROVIDER_ID, "low24h", ticker.low24h.as_deref())?;
    detail.volume = http::optional_decimal(PROVIDER_ID, "vol24h", ticker.vol24h.as_deref())?;
    Ok(detail)
}
