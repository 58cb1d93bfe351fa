//! Market data models
//!
//! This module contains the core data types shared by providers and reports:
//! - `types` - Type aliases for common identifiers (ProviderId, Symbol)
//! - `account` - Holder identity per network (Account, Network)
//! - `asset` - Currency/token identity with its decimal precision (Asset)
//! - `balance` - Fetched balances and base-unit conversion (Balance)
//! - `quote` - Price data structures (PriceQuote, PriceDetail)
//! - `outcome` - Tagged per-provider outcome (ProviderResult, Failure)

mod account;
mod asset;
mod balance;
mod outcome;
mod quote;
mod types;

pub use account::{Account, Network};
pub use asset::{Asset, DEFAULT_PRICE_PRECISION};
pub use balance::{to_display_units, Balance};
pub use outcome::{Failure, ProviderResult};
pub use quote::{PriceDetail, PriceQuote, QuoteCurrency};
pub use types::{ProviderId, Symbol};
