use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::ProviderId;
use crate::errors::ProviderError;

/// Largest scale a `Decimal` can carry.
const MAX_DECIMALS: u32 = 28;

/// Result of querying an account for one asset. Created per run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Balance {
    /// Amount in display units, never negative
    pub amount: Decimal,

    /// Asset symbol
    pub symbol: String,

    /// Provider that produced the balance
    pub source: ProviderId,

    /// When the balance was fetched
    pub fetched_at: DateTime<Utc>,
}

impl Balance {
    /// Create a balance; negative amounts are normalized to zero.
    pub fn new(amount: Decimal, symbol: impl Into<String>, source: ProviderId) -> Self {
        Self {
            amount: amount.max(Decimal::ZERO),
            symbol: symbol.into(),
            source,
            fetched_at: Utc::now(),
        }
    }

    pub fn zero(symbol: impl Into<String>, source: ProviderId) -> Self {
        Self::new(Decimal::ZERO, symbol, source)
    }

    /// Whether anything is held.
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Convert an integer amount in base units to display units.
///
/// Divides by `10^decimals` exactly; the result is deterministic for the
/// same input.
pub fn to_display_units(raw: u128, decimals: u32) -> Result<Decimal, ProviderError> {
    if decimals > MAX_DECIMALS {
        return Err(ProviderError::Conversion(format!(
            "{} decimals exceeds the supported maximum of {}",
            decimals, MAX_DECIMALS
        )));
    }
    let raw = i128::try_from(raw)
        .map_err(|_| ProviderError::Conversion(format!("amount {} is too large", raw)))?;
    Decimal::try_from_i128_with_scale(raw, decimals)
        .map_err(|e| ProviderError::Conversion(format!("amount {}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::borrow::Cow;

    #[test]
    fn test_lamports_to_sol() {
        let amount = to_display_units(2_500_000_000, 9).unwrap();
        assert_eq!(amount, dec!(2.5));
    }

    #[test]
    fn test_wei_to_ether() {
        let amount = to_display_units(1_234_500_000_000_000_000, 18).unwrap();
        assert_eq!(amount, dec!(1.2345));
    }

    #[test]
    fn test_decimals_are_asset_specific() {
        let raw = 2_500_000u128;
        let six = to_display_units(raw, 6).unwrap();
        let eighteen = to_display_units(raw, 18).unwrap();
        assert_eq!(six, dec!(2.5));
        assert_eq!(eighteen, dec!(0.0000000000025));
        assert_ne!(six, eighteen);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let first = to_display_units(987_654_321, 6).unwrap();
        let second = to_display_units(987_654_321, 6).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_too_many_decimals_rejected() {
        assert!(to_display_units(1, 29).is_err());
    }

    #[test]
    fn test_oversized_amount_rejected() {
        assert!(to_display_units(u128::MAX, 18).is_err());
    }

    #[test]
    fn test_negative_amount_normalized() {
        let balance = Balance::new(dec!(-3), "ETH", Cow::Borrowed("ETHEREUM"));
        assert_eq!(balance.amount, Decimal::ZERO);
        assert!(!balance.is_positive());
    }
}
