use serde::Serialize;

/// Classification of provider failures.
///
/// Used by the aggregator to decide how an error is logged and how the
/// reporter labels the affected row. Classes never change control flow:
/// a failed call is terminal for that provider for the current run.
///
/// # Behavior Summary
///
/// | Class | Rendered as | Logged at |
/// |-------|-------------|-----------|
/// | `Connectivity` | `N/A` | `warn` |
/// | `MalformedResponse` | `N/A` | `warn` |
/// | `MissingConfiguration` | `N/A` | `debug` |
/// | `NotApplicable` | `-` | `debug` |
/// | `Unsupported` | `N/A` | `debug` |
/// | `Invalid` | `N/A` | `warn` |
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureClass {
    /// The endpoint was unreachable, answered with a non-2xx status,
    /// or returned a JSON-RPC error object.
    Connectivity,

    /// The response arrived but could not be decoded or lacked a field.
    MalformedResponse,

    /// A required address or credential is absent.
    MissingConfiguration,

    /// The question does not apply to this provider, e.g. asking a KRW
    /// exchange for the KRW price.
    NotApplicable,

    /// The provider does not offer the operation or does not know the symbol.
    Unsupported,

    /// The input itself is unusable (bad address, value out of range).
    Invalid,
}

impl FailureClass {
    /// Whether failures of this class point at an infrastructure fault worth
    /// surfacing on the diagnostic stream.
    pub fn is_fault(self) -> bool {
        matches!(
            self,
            Self::Connectivity | Self::MalformedResponse | Self::Invalid
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connectivity => "connectivity",
            Self::MalformedResponse => "malformed-response",
            Self::MissingConfiguration => "missing-configuration",
            Self::NotApplicable => "not-applicable",
            Self::Unsupported => "unsupported",
            Self::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for FailureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
