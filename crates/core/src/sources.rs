//! Registry wiring: which providers a run gets, built from `Config`.

use coinscope_market_data::{
    CoinGeckoProvider, EvmProvider, Exchange, ExchangeProvider, ExchangeRateApiProvider,
    ProviderRegistry, SkipReason, SolanaProvider,
};
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::Config;

/// Providers for the balances report.
///
/// Chain providers are always present; a missing address surfaces per
/// query. Exchanges with a private account API are registered only when
/// both of their key variables are set.
pub fn balance_sources(config: &Config, catalog: &Catalog) -> ProviderRegistry {
    let mut registry: ProviderRegistry = ProviderRegistry::new();
    registry
        .register(EvmProvider::ethereum(config.rpc.ethereum.as_str()))
        .register(SolanaProvider::new(config.rpc.solana.as_str()))
        .register(EvmProvider::flare(config.rpc.flare.as_str()));

    for exchange in [Exchange::Upbit, Exchange::Korbit, Exchange::Bithumb] {
        let Some(keys) = config.exchange_keys(exchange) else {
            continue;
        };
        match keys.credentials() {
            Some(credentials) => {
                registry.register(ExchangeProvider::new(exchange).with_credentials(credentials));
            }
            None => {
                registry.skip(
                    exchange.id(),
                    SkipReason::MissingCredentials {
                        variables: keys.missing_variables(),
                    },
                );
            }
        }
    }

    registry.register(price_index(catalog));
    debug!("Balance sources: {:?}", registry.ids());
    for (id, provider) in registry.list() {
        if let Some(url) = provider.endpoint() {
            debug!("{} RPC endpoint: {}", id, url);
        }
    }
    registry
}

/// Providers for the markets, detail and quote reports.
pub fn market_sources(config: &Config, catalog: &Catalog) -> ProviderRegistry {
    let mut registry: ProviderRegistry = ProviderRegistry::new();
    for exchange in Exchange::ALL {
        let provider = match config.credentials(exchange) {
            Some(credentials) => ExchangeProvider::new(exchange).with_credentials(credentials),
            None => ExchangeProvider::new(exchange),
        };
        registry.register(provider);
    }
    registry
        .register(price_index(catalog))
        .register(ExchangeRateApiProvider::new());
    debug!("Market sources: {:?}", registry.ids());
    registry
}

/// CoinGecko with the catalog's id map layered over the defaults.
fn price_index(catalog: &Catalog) -> CoinGeckoProvider {
    catalog
        .price_ids()
        .fold(CoinGeckoProvider::new(), |provider, (symbol, id)| {
            provider.with_id(symbol, id)
        })
}
