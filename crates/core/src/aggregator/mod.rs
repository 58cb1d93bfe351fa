//! Uniform, failure-isolating provider invocation.
//!
//! Providers are called one at a time, in registry order. Every error is
//! folded into a [`ProviderResult`] here, so one unreachable provider never
//! stops the others and nothing past this module handles a `ProviderError`.

mod calls;
mod collected;
mod diagnostics;

use std::borrow::Cow;

use coinscope_market_data::{AssetProvider, ProviderRegistry, ProviderResult};
use tracing::{debug, warn};

pub use calls::{
    FetchBalance, FetchBalances, FetchDetailedPrice, FetchPrice, FetchPrices, ProviderCall,
};
pub use collected::Collected;
pub use diagnostics::{Diagnostics, ProviderStatus};

/// Ask every provider that supports `call.operation()`.
///
/// Providers without the capability are not invoked and get no entry.
pub async fn collect<C, P>(call: &C, registry: &ProviderRegistry<P>) -> Collected<C::Output>
where
    C: ProviderCall,
    P: AssetProvider,
{
    let operation = call.operation();
    let mut collected = Collected::default();
    for (id, provider) in registry.list() {
        if !provider.capabilities().supports(operation) {
            debug!("{} does not support {}, skipping", id, operation);
            continue;
        }
        let outcome = invoke(call, provider).await;
        collected.push(Cow::Borrowed(id), outcome);
    }
    collected
}

/// Ask a single provider.
pub async fn invoke<C, P>(call: &C, provider: &P) -> ProviderResult<C::Output>
where
    C: ProviderCall,
    P: AssetProvider,
{
    let id = provider.id();
    let operation = call.operation();
    debug!("Calling {} on {}", operation, id);

    let result = call.call(provider).await;
    if let Err(e) = &result {
        let class = e.class();
        if class.is_fault() {
            warn!(provider = id, operation = %operation, class = %class, "{}", e);
        } else {
            debug!(provider = id, operation = %operation, class = %class, "{}", e);
        }
    }
    ProviderResult::from_result(Cow::Borrowed(id), operation, result)
}
