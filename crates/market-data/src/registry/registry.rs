//! Ordered, named provider collection.
//!
//! The registry owns the providers for one run. Registration order is the
//! order reports list providers in; lookups go by the provider's upper-case id.

use std::borrow::Cow;

use tracing::debug;

use super::{SkipReason, SkippedProvider};
use crate::models::ProviderId;
use crate::provider::{AssetProvider, Provider};

/// Provider registry for one run.
///
/// Generic over the provider type so the aggregator can be exercised with
/// mock providers; production code uses the default [`Provider`] enum.
pub struct ProviderRegistry<P = Provider> {
    providers: Vec<P>,
    skipped: Vec<SkippedProvider>,
}

impl<P> Default for ProviderRegistry<P> {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<P: AssetProvider> ProviderRegistry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider at the end of the order.
    ///
    /// A provider whose id is already registered replaces the earlier one
    /// in place.
    pub fn register(&mut self, provider: impl Into<P>) -> &mut Self {
        let provider = provider.into();
        let id = provider.id();
        match self.providers.iter().position(|p| p.id() == id) {
            Some(index) => {
                debug!("Replacing provider {}", id);
                self.providers[index] = provider;
            }
            None => {
                debug!("Registered provider {}", id);
                self.providers.push(provider);
            }
        }
        self
    }

    /// Record a provider that was left out, for diagnostics.
    pub fn skip(&mut self, provider_id: &'static str, reason: SkipReason) -> &mut Self {
        debug!("Skipping provider {}: {}", provider_id, reason);
        self.skipped.push(SkippedProvider {
            provider_id: Cow::Borrowed(provider_id),
            reason,
        });
        self
    }

    /// `(name, provider)` pairs in registration order.
    pub fn list(&self) -> impl Iterator<Item = (&'static str, &P)> + '_ {
        self.providers.iter().map(|p| (p.id(), p))
    }

    pub fn get(&self, name: &str) -> Option<&P> {
        self.providers.iter().find(|p| p.id() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Provider ids in registration order.
    pub fn ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|p| Cow::Borrowed(p.id())).collect()
    }

    pub fn skipped(&self) -> &[SkippedProvider] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
