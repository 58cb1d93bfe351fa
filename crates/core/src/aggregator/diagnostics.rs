use coinscope_market_data::{FailureClass, Operation, ProviderId, ProviderResult};

use super::Collected;

/// Outcome counts for one provider and operation during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderStatus {
    pub provider: ProviderId,
    pub operation: Operation,
    pub ok: usize,
    pub not_configured: usize,
    pub not_applicable: usize,
    pub failed: usize,
    pub last_failure: Option<FailureClass>,
}

impl ProviderStatus {
    fn new(provider: ProviderId, operation: Operation) -> Self {
        Self {
            provider,
            operation,
            ok: 0,
            not_configured: 0,
            not_applicable: 0,
            failed: 0,
            last_failure: None,
        }
    }

    /// At least one call got an answer.
    pub fn reachable(&self) -> bool {
        self.ok > 0 || self.not_applicable > 0
    }
}

/// Per-provider summary backing the debug section of a report.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<ProviderStatus>,
}

impl Diagnostics {
    pub fn record<T>(&mut self, provider: &str, operation: Operation, outcome: &ProviderResult<T>) {
        let index = match self
            .entries
            .iter()
            .position(|e| e.provider == provider && e.operation == operation)
        {
            Some(index) => index,
            None => {
                self.entries
                    .push(ProviderStatus::new(ProviderId::Owned(provider.to_string()), operation));
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[index];
        match outcome {
            ProviderResult::Success(_) => entry.ok += 1,
            ProviderResult::NotConfigured => entry.not_configured += 1,
            ProviderResult::NotApplicable => entry.not_applicable += 1,
            ProviderResult::Failure(failure) => {
                entry.failed += 1;
                entry.last_failure = Some(failure.class);
            }
        }
    }

    pub fn record_collected<T>(&mut self, operation: Operation, collected: &Collected<T>) {
        for (provider, outcome) in collected.iter() {
            self.record(provider, operation, outcome);
        }
    }

    pub fn entries(&self) -> &[ProviderStatus] {
        &self.entries
    }

    /// Whether `provider` answered any call; `None` if it was never asked.
    pub fn is_connected(&self, provider: &str) -> Option<bool> {
        let mut asked = false;
        for entry in self.entries.iter().filter(|e| e.provider == provider) {
            asked = true;
            if entry.reachable() {
                return Some(true);
            }
        }
        asked.then_some(false)
    }
}
