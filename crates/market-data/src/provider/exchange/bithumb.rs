//! Bithumb REST adapter.

use std::borrow::Cow;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::auth::{self, Credentials};
use super::upbit::{total_holding, AccountEntry};
use super::Exchange;
use crate::errors::ProviderError;
use crate::models::{PriceDetail, QuoteCurrency};
use crate::provider::http;

pub(super) const BASE_URL: &str = "https://api.bithumb.com";

const PROVIDER_ID: &str = "BITHUMB";

/// Status code Bithumb uses for success.
const STATUS_OK: &str = "0000";

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Ticker>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    closing_price: String,
    #[serde(default)]
    opening_price: Option<String>,
    #[serde(default)]
    max_price: Option<String>,
    #[serde(default)]
    min_price: Option<String>,
    #[serde(default)]
    prev_closing_price: Option<String>,
    #[serde(default, rename = "units_traded_24H")]
    units_traded_24h: Option<String>,
}

pub(super) async fn ticker(
    client: &Client,
    base: &str,
    symbol: &str,
) -> Result<PriceDetail, ProviderError> {
    let url = format!("{}/public/ticker/{}", base, Exchange::Bithumb.market(symbol));
    let body = http::send(PROVIDER_ID, client.get(url)).await?;
    parse_ticker(&body, symbol)
}

/// Holdings of `symbols`, in order, from one `GET /v1/accounts`.
pub(super) async fn holdings(
    client: &Client,
    base: &str,
    credentials: &Credentials,
    symbols: &[&str],
) -> Result<Vec<Decimal>, ProviderError> {
    let timestamp = auth::now_millis(PROVIDER_ID)?;
    let token = auth::timestamp_token(PROVIDER_ID, credentials, timestamp)?;
    let request = client
        .get(format!("{}/v1/accounts", base))
        .bearer_auth(token);
    let body = http::send(PROVIDER_ID, request).await?;
    let entries: Vec<AccountEntry> = http::parse_json(PROVIDER_ID, &body)?;
    symbols
        .iter()
        .map(|symbol| total_holding(PROVIDER_ID, &entries, symbol))
        .collect()
}

fn parse_ticker(body: &str, symbol: &str) -> Result<PriceDetail, ProviderError> {
    let envelope: Envelope = http::parse_json(PROVIDER_ID, body)?;
    if envelope.status != STATUS_OK {
        let message = envelope.message.unwrap_or_default();
        return Err(ProviderError::malformed(
            PROVIDER_ID,
            format!("status {}: {}", envelope.status, message),
        ));
    }
    let ticker = envelope
        .data
        .ok_or_else(|| ProviderError::malformed(PROVIDER_ID, "missing data"))?;

    let current = http::decimal_from_str(PROVIDER_ID, "closing_price", &ticker.closing_price)?;
    let mut detail =
        PriceDetail::new(symbol, QuoteCurrency::Krw, current, Cow::Borrowed(PROVIDER_ID));
    detail.open =
        http::optional_decimal(PROVIDER_ID, "opening_price", ticker.opening_price.as_deref())?;
    detail.high = http::optional_decimal(PROVIDER_ID, "max_price", ticker.max_price.as_deref())?;
    detail.low = http::optional_decimal(PROVIDER_ID, "min_price", ticker.min_price.as_deref())?;
    detail.prev_close = http::optional_decimal(
        PROVIDER_ID,
        "prev_closing_price",
        ticker.prev_closing_price.as_deref(),
    )?;
    detail.volume = http::optional_decimal(
        PROVIDER_ID,
        "units_traded_24H",
        ticker.units_traded_24h.as_deref(),
    )?;
    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_ticker() {
        let body = r#"{"status":"0000","data":{"opening_price":"240000","closing_price":"245500",
            "min_price":"238000","max_price":"247000","units_traded":"1500.1","acc_trade_value":"1",
            "prev_closing_price":"240100","units_traded_24H":"3012.75","acc_trade_value_24H":"1",
            "fluctate_24H":"5400","fluctate_rate_24H":"2.25","date":"1729300000000"}}"#;
        let detail = parse_ticker(body, "SOL").unwrap();
        assert_eq!(detail.current, dec!(245500));
        assert_eq!(detail.open, Some(dec!(240000)));
        assert_eq!(detail.high, Some(dec!(247000)));
        assert_eq!(detail.low, Some(dec!(238000)));
        assert_eq!(detail.prev_close, Some(dec!(240100)));
        assert_eq!(detail.volume, Some(dec!(3012.75)));
        assert_eq!(detail.source, "BITHUMB");
    }

    #[test]
    fn test_error_status() {
        let body = r#"{"status":"5500","message":"Invalid Parameter"}"#;
        match parse_ticker(body, "NOPE") {
            Err(ProviderError::MalformedResponse { message, .. }) => {
                assert!(message.contains("5500"));
                assert!(message.contains("Invalid Parameter"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_account_shape_matches_upbit() {
        let entries: Vec<AccountEntry> = serde_json::from_str(
            r#"[{"currency":"FLR","balance":"1000","locked":"250","avg_buy_price":"30","unit_currency":"KRW"}]"#,
        )
        .unwrap();
        assert_eq!(total_holding(PROVIDER_ID, &entries, "flr").unwrap(), dec!(1250));
    }
}
