//! Provider registry module.
//!
//! Holds the providers a run may call, in a fixed order, plus a record of
//! providers that were left out because their configuration is absent.

mod registry;
mod skip_reason;

pub use registry::ProviderRegistry;
pub use skip_reason::{SkipReason, SkippedProvider};
