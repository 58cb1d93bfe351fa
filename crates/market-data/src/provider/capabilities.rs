//! Provider capabilities and the operations they cover.
//!
//! The aggregator asks a provider for its capabilities before invoking an
//! operation, so providers without a capability are never called for it.

use serde::Serialize;

/// An operation a provider may support.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FetchBalance,
    FetchPrice,
    FetchDetailedPrice,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FetchBalance => "fetch_balance",
            Operation::FetchPrice => "fetch_price",
            Operation::FetchDetailedPrice => "fetch_detailed_price",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describes what a provider can do.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ProviderCapabilities {
    /// Whether account balances can be fetched.
    pub balances: bool,

    /// Whether latest prices can be fetched.
    pub prices: bool,

    /// Whether trading-day price details can be fetched.
    pub detailed_prices: bool,
}

impl ProviderCapabilities {
    pub fn balances_only() -> Self {
        Self {
            balances: true,
            ..Self::default()
        }
    }

    pub fn prices_only() -> Self {
        Self {
            prices: true,
            ..Self::default()
        }
    }

    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::FetchBalance => self.balances,
            Operation::FetchPrice => self.prices,
            Operation::FetchDetailedPrice => self.detailed_prices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_matches_flags() {
        let caps = ProviderCapabilities::balances_only();
        assert!(caps.supports(Operation::FetchBalance));
        assert!(!caps.supports(Operation::FetchPrice));
        assert!(!caps.supports(Operation::FetchDetailedPrice));

        let caps = ProviderCapabilities::prices_only();
        assert!(caps.supports(Operation::FetchPrice));
        assert!(!caps.supports(Operation::FetchBalance));
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::FetchDetailedPrice.to_string(), "fetch_detailed_price");
    }
}
