//! The assets coinscope knows about and where each one is held.

use coinscope_market_data::provider::evm::{ETHEREUM_ID, FLARE_ID};
use coinscope_market_data::provider::solana::SOLANA_ID;
use coinscope_market_data::{Asset, Exchange, Network};

use crate::errors::{Error, Result};

pub const JUP_MINT: &str = "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN";
pub const JPL_MINT: &str = "JPLxvNvzWzUZXmJ6YkkRAFSYZs9dKpPqWpeEGrskKYs";
pub const WFLR_CONTRACT: &str = "0x1D80c49BbBCd1C0911346656B529DF9E5c2F783d";

/// Symbols compared across exchanges in the markets report, in row order.
const MARKET_SYMBOLS: [&str; 5] = ["BTC", "SOL", "ETH", "FLR", "JUP"];

/// Symbols looked up on each exchange account, in row order.
const EXCHANGE_SYMBOLS: [&str; 5] = ["BTC", "ETH", "SOL", "FLR", "JUP"];

/// Where a holding lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HoldingSource {
    /// On chain, queried through the named chain provider
    Chain {
        provider: &'static str,
        network: Network,
    },
    /// In an exchange account
    Exchange(Exchange),
}

/// One row of the balances report: an asset at a source.
#[derive(Clone, Debug)]
pub struct Holding {
    pub asset: Asset,
    /// Label shown in the "Cryptocurrency" column
    pub label: String,
    pub source: HoldingSource,
}

impl Holding {
    pub fn on_chain(label: &str, asset: Asset, provider: &'static str, network: Network) -> Self {
        Self {
            asset,
            label: label.to_string(),
            source: HoldingSource::Chain { provider, network },
        }
    }

    pub fn on_exchange(asset: Asset, exchange: Exchange) -> Self {
        Self {
            label: format!("{} ({})", asset.name, exchange.name()),
            asset,
            source: HoldingSource::Exchange(exchange),
        }
    }

    /// Id of the provider that answers for this holding.
    pub fn provider_id(&self) -> &'static str {
        match &self.source {
            HoldingSource::Chain { provider, .. } => provider,
            HoldingSource::Exchange(exchange) => exchange.id(),
        }
    }
}

/// Static asset list for a run.
#[derive(Clone, Debug)]
pub struct Catalog {
    assets: Vec<Asset>,
    holdings: Vec<Holding>,
    market_symbols: Vec<String>,
}

impl Catalog {
    /// Build a catalog from parts.
    pub fn new(assets: Vec<Asset>, holdings: Vec<Holding>, market_symbols: Vec<String>) -> Self {
        Self {
            assets,
            holdings,
            market_symbols,
        }
    }

    /// Chain holdings first, then each exchange account.
    pub fn standard() -> Self {
        let eth = Asset::native("ETH", "Ethereum", 18).with_price_id("ethereum");
        let sol = Asset::native("SOL", "Solana", 9).with_price_id("solana");
        let flr = Asset::native("FLR", "Flare", 18)
            .with_price_id("flare-networks")
            .with_price_precision(4);
        let jup = Asset::token("JUP", "Jupiter", JUP_MINT, 6)
            .with_price_id("jupiter")
            .with_price_precision(4);
        let jpl = Asset::token("JPL", "JPL", JPL_MINT, 6)
            .with_price_id("jupiter-protocol")
            .with_price_precision(4);
        let wflr = Asset::token("WFLR", "Wrapped Flare", WFLR_CONTRACT, 18)
            .with_price_id("flare-networks")
            .with_price_precision(4);
        let btc = Asset::native("BTC", "Bitcoin", 8).with_price_id("bitcoin");

        let mut holdings = vec![
            Holding::on_chain("Ethereum", eth.clone(), ETHEREUM_ID, Network::Evm),
            Holding::on_chain("Solana", sol.clone(), SOLANA_ID, Network::Solana),
            Holding::on_chain("Flare", flr.clone(), FLARE_ID, Network::Evm),
            Holding::on_chain("Jupiter", jup.clone(), SOLANA_ID, Network::Solana),
            Holding::on_chain("JPL", jpl.clone(), SOLANA_ID, Network::Solana),
            Holding::on_chain("Wrapped Flare", wflr.clone(), FLARE_ID, Network::Evm),
        ];

        let assets = vec![eth, sol, flr, jup, jpl, wflr, btc];

        for exchange in Exchange::ALL.into_iter().filter(Exchange::has_accounts) {
            for symbol in EXCHANGE_SYMBOLS {
                if let Some(asset) = assets.iter().find(|a| a.symbol == symbol) {
                    holdings.push(Holding::on_exchange(asset.clone(), exchange));
                }
            }
        }

        Self::new(
            assets,
            holdings,
            MARKET_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn market_symbols(&self) -> &[String] {
        &self.market_symbols
    }

    /// Look up an asset by symbol, ignoring case.
    pub fn asset(&self, symbol: &str) -> Result<&Asset> {
        self.assets
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| Error::UnknownSymbol(symbol.to_string()))
    }

    /// `(symbol, price id)` pairs for every asset the price index can quote.
    pub fn price_ids(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.assets
            .iter()
            .filter_map(|a| a.price_id.as_deref().map(|id| (a.symbol.as_str(), id)))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
