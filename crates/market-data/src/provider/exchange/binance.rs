//! Binance public market data.

use std::borrow::Cow;

use reqwest::Client;
use serde::Deserialize;

use super::Exchange;
use crate::errors::ProviderError;
use crate::models::{PriceDetail, PriceQuote, QuoteCurrency};
use crate::provider::http;

pub(super) const BASE_URL: &str = "https://api.binance.com";

const PROVIDER_ID: &str = "BINANCE";

/// `GET /api/v3/ticker/price`
#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

/// `GET /api/v3/ticker/24hr`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24h {
    last_price: String,
    #[serde(default)]
    open_price: Option<String>,
    #[serde(default)]
    high_price: Option<String>,
    #[serde(default)]
    low_price: Option<String>,
    #[serde(default)]
    prev_close_price: Option<String>,
    #[serde(default)]
    volume: Option<String>,
}

pub(super) async fn price(
    client: &Client,
    base: &str,
    symbol: &str,
) -> Result<PriceQuote, ProviderError> {
    let request = client
        .get(format!("{}/api/v3/ticker/price", base))
        .query(&[("symbol", Exchange::Binance.market(symbol))]);
    let body = http::send(PROVIDER_ID, request).await?;
    parse_price(&body, symbol)
}

pub(super) async fn ticker(
    client: &Client,
    base: &str,
    symbol: &str,
) -> Result<PriceDetail, ProviderError> {
    let request = client
        .get(format!("{}/api/v3/ticker/24hr", base))
        .query(&[("symbol", Exchange::Binance.market(symbol))]);
    let body = http::send(PROVIDER_ID, request).await?;
    parse_ticker(&body, symbol)
}

fn parse_price(body: &str, symbol: &str) -> Result<PriceQuote, ProviderError> {
    let ticker: TickerPrice = http::parse_json(PROVIDER_ID, body)?;
    let price = http::decimal_from_str(PROVIDER_ID, "price", &ticker.price)?;
    Ok(PriceQuote::new(symbol, QuoteCurrency::Usdt, price, Cow::Borrowed(PROVIDER_ID)))
}

fn parse_ticker(body: &str, symbol: &str) -> Result<PriceDetail, ProviderError> {
    let ticker: Ticker24h = http::parse_json(PROVIDER_ID, body)?;
    let current = http::decimal_from_str(PROVIDER_ID, "lastPrice", &ticker.last_price)?;

    let mut detail =
        PriceDetail::new(symbol, QuoteCurrency::Usdt, current, Cow::Borrowed(PROVIDER_ID));
    detail.open = http::optional_decimal(PROVIDER_ID, "openPrice", ticker.open_price.as_deref())?;
    detail.high = http::optional_decimal(PROVIDER_ID, "highPrice", ticker.high_price.as_deref())?;
    detail.low = http::optional_decimal(PROVIDER_ID, "lowPrice", ticker.low_price.as_deref())?;
    detail.prev_close =
        http::optional_decimal(PROVIDER_ID, "prevClosePrice", ticker.prev_close_price.as_deref())?;
    detail.volume = http::optional_decimal(PROVIDER_ID, "volume", ticker.volume.as_deref())?;
    Ok(detail)
}
