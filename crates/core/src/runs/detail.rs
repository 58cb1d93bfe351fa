use coinscope_market_data::{AssetProvider, Operation, PriceDetail, Provider, ProviderRegistry};
use tracing::info;

use crate::aggregator::{collect, Collected, Diagnostics, FetchDetailedPrice};

/// Trading-day details for one symbol on every exchange that offers them.
#[derive(Clone, Debug)]
pub struct DetailReport {
    pub symbol: String,
    pub details: Collected<PriceDetail>,
    pub diagnostics: Diagnostics,
}

pub struct DetailRun<'a, P = Provider> {
    registry: &'a ProviderRegistry<P>,
}

impl<'a, P: AssetProvider> DetailRun<'a, P> {
    pub fn new(registry: &'a ProviderRegistry<P>) -> Self {
        Self { registry }
    }

    pub async fn run(&self, symbol: &str) -> DetailReport {
        let symbol = symbol.trim().to_ascii_uppercase();
        let details = collect(&FetchDetailedPrice { symbol: &symbol }, self.registry).await;

        let mut diagnostics = Diagnostics::default();
        diagnostics.record_collected(Operation::FetchDetailedPrice, &details);

        info!(
            "Detail run for {} finished: {} of {} providers answered",
            symbol,
            details.iter().filter(|(_, outcome)| outcome.is_success()).count(),
            details.len()
        );
        DetailReport {
            symbol,
            details,
            diagnostics,
        }
    }
}
