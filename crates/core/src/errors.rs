//! Core error types for coinscope.
//!
//! Provider failures never show up here: the aggregator folds them into
//! `ProviderResult` values. These errors cover configuration and lookups
//! that stop a run before any provider is called.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for coinscope runs.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration value: {key}: {message}")]
    InvalidConfigValue { key: String, message: String },

    #[error("Unknown symbol '{0}'")]
    UnknownSymbol(String),

    #[error("Provider '{0}' is not registered")]
    ProviderMissing(String),
}
