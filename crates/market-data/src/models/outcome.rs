use serde::Serialize;

use super::types::ProviderId;
use crate::errors::{FailureClass, ProviderError};
use crate::provider::Operation;

/// Why a provider operation produced no value.
#[derive(Clone, Debug, Serialize)]
pub struct Failure {
    pub provider: ProviderId,
    pub operation: Operation,
    pub class: FailureClass,
    /// Human-readable cause, for the diagnostic stream only
    pub cause: String,
}

/// Tagged outcome of one provider operation.
///
/// Errors are folded into this type at the aggregator boundary, so nothing
/// past it ever has to handle a `ProviderError`.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum ProviderResult<T> {
    Success(T),
    /// The address or credential for this query is absent
    NotConfigured,
    /// The question does not apply (home currency)
    NotApplicable,
    Failure(Failure),
}

impl<T> ProviderResult<T> {
    /// Fold a provider's `Result` into an outcome.
    pub fn from_result(
        provider: ProviderId,
        operation: Operation,
        result: Result<T, ProviderError>,
    ) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(e) => match e.class() {
                FailureClass::MissingConfiguration => Self::NotConfigured,
                FailureClass::NotApplicable => Self::NotApplicable,
                class => Self::Failure(Failure {
                    provider,
                    operation,
                    class,
                    cause: e.to_string(),
                }),
            },
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProviderResult<U> {
        match self {
            Self::Success(value) => ProviderResult::Success(f(value)),
            Self::NotConfigured => ProviderResult::NotConfigured,
            Self::NotApplicable => ProviderResult::NotApplicable,
            Self::Failure(failure) => ProviderResult::Failure(failure),
        }
    }

    /// Short status for diagnostics ("ok", "not configured", ...).
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success(_) => "ok",
            Self::NotConfigured => "not configured",
            Self::NotApplicable => "not applicable",
            Self::Failure(_) => "failed",
        }
    }
}
