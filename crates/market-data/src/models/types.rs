use std::borrow::Cow;

/// Provider identifier - mostly static constants ("ETHEREUM", "UPBIT", ...)
pub type ProviderId = Cow<'static, str>;

/// Ticker symbol as used in reports ("ETH", "JUP")
pub type Symbol = String;
