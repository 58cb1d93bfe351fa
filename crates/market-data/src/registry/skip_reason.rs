//! Skip reason tracking for registry diagnostics.

use crate::models::ProviderId;

/// Why a known provider was not registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// One or more credential variables are unset or blank.
    MissingCredentials { variables: Vec<String> },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingCredentials { variables } => {
                write!(f, "missing {}", variables.join(", "))
            }
        }
    }
}

/// A provider left out of the registry and the reason.
#[derive(Clone, Debug)]
pub struct SkippedProvider {
    pub provider_id: ProviderId,
    pub reason: SkipReason,
}
