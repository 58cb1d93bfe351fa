//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`ProviderError`]: The error enum returned by every provider operation
//! - [`FailureClass`]: Classification used by the aggregator and reporter

mod class;

pub use class::FailureClass;

use thiserror::Error;

/// Errors that can occur during provider operations.
///
/// Each variant is classified into a [`FailureClass`] via the [`class`](Self::class)
/// method. Nothing here is retried: an error ends that provider's part of the run.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A required address or credential is not configured.
    #[error("Not configured: {provider} ({what})")]
    NotConfigured {
        /// The provider missing configuration
        provider: String,
        /// What is missing, e.g. "address"
        what: String,
    },

    /// The request makes no sense for this provider, e.g. the home currency.
    #[error("Not applicable: {provider} does not quote {symbol}")]
    NotApplicable {
        /// The provider that was asked
        provider: String,
        /// The symbol that was asked about
        symbol: String,
    },

    /// The provider does not implement the operation.
    #[error("Operation '{operation}' not supported by provider '{provider}'")]
    NotSupported {
        /// The operation that was requested
        operation: String,
        /// The provider that doesn't support it
        provider: String,
    },

    /// The provider does not know the symbol.
    #[error("Symbol not found: {provider} - {symbol}")]
    SymbolNotFound {
        /// The provider that was asked
        provider: String,
        /// The unknown symbol
        symbol: String,
    },

    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP {status} from {provider}: {message}")]
    Http {
        /// The provider whose endpoint failed
        provider: String,
        /// HTTP status code
        status: u16,
        /// Body excerpt or reason phrase
        message: String,
    },

    /// The request never completed (DNS, TLS, timeout, connection reset).
    #[error("Network error: {provider} - {message}")]
    Network {
        /// The provider that could not be reached
        provider: String,
        /// Transport error description
        message: String,
    },

    /// A JSON-RPC endpoint returned an error object.
    #[error("RPC error from {provider} ({code}): {message}")]
    Rpc {
        /// The provider whose node returned the error
        provider: String,
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
    },

    /// The response body could not be decoded or was missing data.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// The provider that sent the response
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// An address could not be parsed for the target network.
    #[error("Invalid address '{address}' for {provider}: {message}")]
    InvalidAddress {
        /// The provider that rejected the address
        provider: String,
        /// The offending address
        address: String,
        /// Parser message
        message: String,
    },

    /// Request signing failed (bad secret, clock error).
    #[error("Authentication setup failed for {provider}: {message}")]
    Auth {
        /// The provider whose request could not be signed
        provider: String,
        /// Signing error description
        message: String,
    },

    /// A raw amount could not be represented as a decimal.
    #[error("Conversion failed: {0}")]
    Conversion(String),
}

impl ProviderError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use coinscope_market_data::errors::{FailureClass, ProviderError};
    ///
    /// let error = ProviderError::Network {
    ///     provider: "SOLANA".to_string(),
    ///     message: "connection reset".to_string(),
    /// };
    /// assert_eq!(error.class(), FailureClass::Connectivity);
    /// ```
    pub fn class(&self) -> FailureClass {
        match self {
            Self::Http { .. } | Self::Network { .. } | Self::Rpc { .. } => {
                FailureClass::Connectivity
            }
            Self::MalformedResponse { .. } => FailureClass::MalformedResponse,
            Self::NotConfigured { .. } => FailureClass::MissingConfiguration,
            Self::NotApplicable { .. } => FailureClass::NotApplicable,
            Self::NotSupported { .. } | Self::SymbolNotFound { .. } => FailureClass::Unsupported,
            Self::InvalidAddress { .. } | Self::Auth { .. } | Self::Conversion(_) => {
                FailureClass::Invalid
            }
        }
    }

    pub(crate) fn malformed(provider: &str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn network(provider: &str, error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::malformed(provider, error.to_string());
        }
        Self::Network {
            provider: provider.to_string(),
            message: error.to_string(),
        }
    }

    pub(crate) fn not_applicable(provider: &str, symbol: &str) -> Self {
        Self::NotApplicable {
            provider: provider.to_string(),
            symbol: symbol.to_string(),
        }
    }

    pub(crate) fn not_supported(provider: &str, operation: &str) -> Self {
        Self::NotSupported {
            operation: operation.to_string(),
            provider: provider.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_connectivity() {
        let error = ProviderError::Http {
            provider: "UPBIT".to_string(),
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(error.class(), FailureClass::Connectivity);

        let error = ProviderError::Rpc {
            provider: "ETHEREUM".to_string(),
            code: -32000,
            message: "header not found".to_string(),
        };
        assert_eq!(error.class(), FailureClass::Connectivity);
    }

    #[test]
    fn test_malformed_response_class() {
        let error = ProviderError::malformed("OKX", "missing field `last`");
        assert_eq!(error.class(), FailureClass::MalformedResponse);
        assert!(error.class().is_fault());
    }

    #[test]
    fn test_missing_configuration_is_not_a_fault() {
        let error = ProviderError::NotConfigured {
            provider: "FLARE".to_string(),
            what: "address".to_string(),
        };
        assert_eq!(error.class(), FailureClass::MissingConfiguration);
        assert!(!error.class().is_fault());
    }

    #[test]
    fn test_home_currency_is_not_applicable() {
        let error = ProviderError::not_applicable("BITHUMB", "KRW");
        assert_eq!(error.class(), FailureClass::NotApplicable);
    }

    #[test]
    fn test_unknown_symbol_is_unsupported() {
        let error = ProviderError::SymbolNotFound {
            provider: "COINGECKO".to_string(),
            symbol: "DOGE".to_string(),
        };
        assert_eq!(error.class(), FailureClass::Unsupported);
    }

    #[test]
    fn test_error_display() {
        let error = ProviderError::not_supported("BINANCE", "fetch_balance");
        assert_eq!(
            format!("{}", error),
            "Operation 'fetch_balance' not supported by provider 'BINANCE'"
        );

        let error = ProviderError::Http {
            provider: "KORBIT".to_string(),
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(format!("{}", error), "HTTP 401 from KORBIT: Unauthorized");
    }
}
