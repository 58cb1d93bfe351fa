use serde::{Deserialize, Serialize};

/// Decimal places used to display a price when none is configured.
pub const DEFAULT_PRICE_PRECISION: u32 = 2;

/// A currency or token identifier.
///
/// `decimals` is the asset's own base-unit precision. It is never shared
/// between assets: a 6-decimal SPL token and an 18-decimal native coin
/// convert the same raw integer to different amounts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Ticker symbol (e.g., "ETH", "JUP")
    pub symbol: String,

    /// Human readable name (e.g., "Ethereum")
    pub name: String,

    /// Contract (EVM) or mint (Solana) address for non-native assets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,

    /// Base-unit precision
    pub decimals: u8,

    /// Identifier in the price index (e.g., "flare-networks")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,

    /// Decimal places for displaying this asset's price
    pub price_precision: u32,
}

impl Asset {
    /// A chain's native asset.
    pub fn native(symbol: &str, name: &str, decimals: u8) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            contract: None,
            decimals,
            price_id: None,
            price_precision: DEFAULT_PRICE_PRECISION,
        }
    }

    /// A token held through a contract or mint.
    pub fn token(symbol: &str, name: &str, contract: &str, decimals: u8) -> Self {
        Self {
            contract: Some(contract.to_string()),
            ..Self::native(symbol, name, decimals)
        }
    }

    pub fn with_price_id(mut self, price_id: &str) -> Self {
        self.price_id = Some(price_id.to_string());
        self
    }

    pub fn with_price_precision(mut self, precision: u32) -> Self {
        self.price_precision = precision;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_asset() {
        let asset = Asset::native("SOL", "Solana", 9).with_price_id("solana");
        assert!(asset.contract.is_none());
        assert_eq!(asset.decimals, 9);
        assert_eq!(asset.price_id.as_deref(), Some("solana"));
        assert_eq!(asset.price_precision, DEFAULT_PRICE_PRECISION);
    }

    #[test]
    fn test_token_asset() {
        let asset = Asset::token(
            "JUP",
            "Jupiter",
            "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN",
            6,
        )
        .with_price_precision(4);
        assert_eq!(
            asset.contract.as_deref(),
            Some("JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN")
        );
        assert_eq!(asset.price_precision, 4);
    }
}
