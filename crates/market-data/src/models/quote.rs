use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::ProviderId;

/// Currency a price is expressed in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteCurrency {
    Usd,
    Krw,
    Usdt,
}

impl QuoteCurrency {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteCurrency::Usd => "usd",
            QuoteCurrency::Krw => "krw",
            QuoteCurrency::Usdt => "usdt",
        }
    }

    /// Upper-case code used in column headers ("KRW").
    pub fn code(&self) -> &'static str {
        match self {
            QuoteCurrency::Usd => "USD",
            QuoteCurrency::Krw => "KRW",
            QuoteCurrency::Usdt => "USDT",
        }
    }
}

/// Latest price for a symbol
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: String,

    pub currency: QuoteCurrency,

    /// Current price (required)
    pub price: Decimal,

    /// 24 hour change in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_24h_pct: Option<Decimal>,

    /// Source of the quote (COINGECKO, UPBIT, ...)
    pub source: ProviderId,

    pub fetched_at: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(symbol: &str, currency: QuoteCurrency, price: Decimal, source: ProviderId) -> Self {
        Self {
            symbol: symbol.to_string(),
            currency,
            price,
            change_24h_pct: None,
            source,
            fetched_at: Utc::now(),
        }
    }

    pub fn with_change(mut self, change_24h_pct: Option<Decimal>) -> Self {
        self.change_24h_pct = change_24h_pct;
        self
    }
}

/// Trading-day summary for a symbol, normalized across exchanges.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceDetail {
    pub symbol: String,

    pub currency: QuoteCurrency,

    /// Current/last traded price (required)
    pub current: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    /// Previous day's closing price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_close: Option<Decimal>,

    /// Traded volume in the base asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,

    pub source: ProviderId,
}

impl PriceDetail {
    /// Create a detail with only the current price set
    pub fn new(
        symbol: &str,
        currency: QuoteCurrency,
        current: Decimal,
        source: ProviderId,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            currency,
            current,
            open: None,
            high: None,
            low: None,
            prev_close: None,
            volume: None,
            source,
        }
    }

    /// Drop the trading-day fields and keep the latest price.
    pub fn to_quote(&self) -> PriceQuote {
        PriceQuote::new(&self.symbol, self.currency, self.current, self.source.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::borrow::Cow;

    #[test]
    fn test_quote_new() {
        let quote = PriceQuote::new(
            "ETH",
            QuoteCurrency::Usd,
            dec!(3150.25),
            Cow::Borrowed("COINGECKO"),
        );
        assert_eq!(quote.price, dec!(3150.25));
        assert_eq!(quote.currency.as_str(), "usd");
        assert!(quote.change_24h_pct.is_none());
    }

    #[test]
    fn test_detail_to_quote() {
        let mut detail =
            PriceDetail::new("BTC", QuoteCurrency::Krw, dec!(95000000), Cow::Borrowed("UPBIT"));
        detail.open = Some(dec!(94000000));
        let quote = detail.to_quote();
        assert_eq!(quote.price, dec!(95000000));
        assert_eq!(quote.currency, QuoteCurrency::Krw);
        assert_eq!(quote.source, "UPBIT");
    }
}
