//! Upbit REST adapter.

use std::borrow::Cow;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::auth::{self, Credentials};
use super::Exchange;
use crate::errors::ProviderError;
use crate::models::{PriceDetail, QuoteCurrency};
use crate::provider::http;

pub(super) const BASE_URL: &str = "https://api.upbit.com";

const PROVIDER_ID: &str = "UPBIT";

/// Element of `GET /v1/ticker`
#[derive(Debug, Deserialize)]
struct Ticker {
    trade_price: f64,
    #[serde(default)]
    opening_price: Option<f64>,
    #[serde(default)]
    high_price: Option<f64>,
    #[serde(default)]
    low_price: Option<f64>,
    #[serde(default)]
    prev_closing_price: Option<f64>,
    #[serde(default)]
    acc_trade_volume_24h: Option<f64>,
}

/// Element of `GET /v1/accounts`. Bithumb's v1 account API uses the same shape.
#[derive(Debug, Deserialize)]
pub(super) struct AccountEntry {
    currency: String,
    balance: String,
    #[serde(default)]
    locked: Option<String>,
}

pub(super) async fn ticker(
    client: &Client,
    base: &str,
    symbol: &str,
) -> Result<PriceDetail, ProviderError> {
    let url = format!("{}/v1/ticker", base);
    let request = client
        .get(url)
        .query(&[("markets", Exchange::Upbit.market(symbol))]);
    let body = http::send(PROVIDER_ID, request).await?;
    parse_ticker(&body, symbol)
}

/// Holdings of `symbols`, in order, from one `GET /v1/accounts`.
pub(super) async fn holdings(
    client: &Client,
    base: &str,
    credentials: &Credentials,
    symbols: &[&str],
) -> Result<Vec<Decimal>, ProviderError> {
    let token = auth::nonce_token(PROVIDER_ID, credentials)?;
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
    let tickers: Vec<Ticker> = http::parse_json(PROVIDER_ID, body)?;
    let ticker = tickers.into_iter().next().ok_or_else(|| ProviderError::SymbolNotFound {
        provider: PROVIDER_ID.to_string(),
        symbol: symbol.to_string(),
    })?;

    let num = |field: &str, value: Option<f64>| -> Result<Option<Decimal>, ProviderError> {
        value
            .map(|v| http::decimal_from_f64(PROVIDER_ID, field, v))
            .transpose()
    };

    let current = http::decimal_from_f64(PROVIDER_ID, "trade_price", ticker.trade_price)?;
    let mut detail =
        PriceDetail::new(symbol, QuoteCurrency::Krw, current, Cow::Borrowed(PROVIDER_ID));
    detail.open = num("opening_price", ticker.opening_price)?;
    detail.high = num("high_price", ticker.high_price)?;
    detail.low = num("low_price", ticker.low_price)?;
    detail.prev_close = num("prev_closing_price", ticker.prev_closing_price)?;
    detail.volume = num("acc_trade_volume_24h", ticker.acc_trade_volume_24h)?;
    Ok(detail)
}

/// `balance + locked` for `symbol`; zero when the currency is not held.
pub(super) fn total_holding(
    provider: &str,
    entries: &[AccountEntry],
    symbol: &str,
) -> Result<Decimal, ProviderError> {
    let Some(entry) = entries
        .iter()
        .find(|e| e.currency.eq_ignore_ascii_case(symbol))
    else {
        return Ok(Decimal::ZERO);
    };
    let balance = http::decimal_from_str(provider, "balance", &entry.balance)?;
    let locked = http::optional_decimal(provider, "locked", entry.locked.as_deref())?
        .unwrap_or(Decimal::ZERO);
    Ok(balance + locked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const TICKER: &str = r#"[{"market":"KRW-BTC","trade_date":"20241019","trade_price":95123000.0,
        "opening_price":94000000.0,"high_price":95500000.0,"low_price":93800000.0,
        "prev_closing_price":94000000.0,"change":"RISE","signed_change_rate":0.0119468085,
        "acc_trade_volume_24h":2345.25,"timestamp":1729300000000}]"#;

    #[test]
    fn test_parse_ticker() {
        let detail = parse_ticker(TICKER, "BTC").unwrap();
        assert_eq!(detail.current, dec!(95123000));
        assert_eq!(detail.open, Some(dec!(94000000)));
        assert_eq!(detail.high, Some(dec!(95500000)));
        assert_eq!(detail.low, Some(dec!(93800000)));
        assert_eq!(detail.prev_close, Some(dec!(94000000)));
        assert_eq!(detail.volume, Some(dec!(2345.25)));
        assert_eq!(detail.currency, QuoteCurrency::Krw);
        assert_eq!(detail.source, "UPBIT");
    }

    #[test]
    fn test_price_only_ticker() {
        let detail = parse_ticker(r#"[{"market":"KRW-USDT","trade_price":1380.5}]"#, "USDT").unwrap();
        assert_eq!(detail.current, dec!(1380.5));
        assert!(detail.open.is_none());
    }

    #[test]
    fn test_empty_ticker_is_symbol_not_found() {
        assert!(matches!(
            parse_ticker("[]", "NOPE"),
            Err(ProviderError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_trade_price_is_malformed() {
        assert!(matches!(
            parse_ticker(r#"[{"market":"KRW-BTC"}]"#, "BTC"),
            Err(ProviderError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_total_holding_adds_locked() {
        let entries: Vec<AccountEntry> = serde_json::from_str(
            r#"[{"currency":"KRW","balance":"150000.0","locked":"0.0","avg_buy_price":"0","unit_currency":"KRW"},
                {"currency":"BTC","balance":"0.015","locked":"0.005","avg_buy_price":"90000000","unit_currency":"KRW"}]"#,
        )
        .unwrap();
        assert_eq!(total_holding(PROVIDER_ID, &entries, "BTC").unwrap(), dec!(0.020));
        assert_eq!(total_holding(PROVIDER_ID, &entries, "SOL").unwrap(), Decimal::ZERO);
    }
}
