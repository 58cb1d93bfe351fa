use coinscope_market_data::{Failure, ProviderId, ProviderResult};

/// Outcomes of one operation across providers, in registration order.
#[derive(Clone, Debug)]
pub struct Collected<T> {
    entries: Vec<(ProviderId, ProviderResult<T>)>,
}

impl<T> Default for Collected<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Collected<T> {
    pub(crate) fn push(&mut self, provider: ProviderId, outcome: ProviderResult<T>) {
        self.entries.push((provider, outcome));
    }

    pub fn get(&self, provider: &str) -> Option<&ProviderResult<T>> {
        self.entries
            .iter()
            .find(|(id, _)| id.as_ref() == provider)
            .map(|(_, outcome)| outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProviderResult<T>)> + '_ {
        self.entries.iter().map(|(id, outcome)| (id.as_ref(), outcome))
    }

    pub fn failures(&self) -> impl Iterator<Item = &Failure> + '_ {
        self.entries.iter().filter_map(|(_, outcome)| outcome.failure())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> IntoIterator for Collected<T> {
    type Item = (ProviderId, ProviderResult<T>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
