//! Runtime configuration, read once from the environment.

use coinscope_market_data::provider::evm::{DEFAULT_ETHEREUM_RPC_URL, DEFAULT_FLARE_RPC_URL};
use coinscope_market_data::provider::solana::DEFAULT_SOLANA_RPC_URL;
use coinscope_market_data::{Account, Credentials, Exchange, Network};

use crate::errors::{Error, Result};

/// Environment variable names.
pub mod keys {
    pub const ETH_ADDRESS: &str = "ETH_ADDRESS";
    pub const SOL_ADDRESS: &str = "SOL_ADDRESS";
    pub const FLARE_ADDRESS: &str = "FLARE_ADDRESS";
    pub const UPBIT_ACCESS_KEY: &str = "UPBIT_ACCESS_KEY";
    pub const UPBIT_SECRET_KEY: &str = "UPBIT_SECRET_KEY";
    pub const KORBIT_ACCESS_KEY: &str = "KORBIT_ACCESS_KEY";
    pub const KORBIT_SECRET_KEY: &str = "KORBIT_SECRET_KEY";
    pub const BITHUMB_ACCESS_KEY: &str = "BITHUMB_ACCESS_KEY";
    pub const BITHUMB_SECRET_KEY: &str = "BITHUMB_SECRET_KEY";
    pub const ETH_RPC_URL: &str = "ETH_RPC_URL";
    pub const SOLANA_RPC_URL: &str = "SOLANA_RPC_URL";
    pub const FLARE_RPC_URL: &str = "FLARE_RPC_URL";
    pub const DEBUG: &str = "DEBUG";
}

/// Key pair variables for one exchange, as found in the environment.
#[derive(Clone, Debug, Default)]
pub struct ExchangeKeys {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    access_var: &'static str,
    secret_var: &'static str,
}

impl ExchangeKeys {
    fn load(
        lookup: &impl Fn(&str) -> Option<String>,
        access_var: &'static str,
        secret_var: &'static str,
    ) -> Self {
        Self {
            access_key: non_blank(lookup(access_var)),
            secret_key: non_blank(lookup(secret_var)),
            access_var,
            secret_var,
        }
    }

    /// Both keys, or nothing.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) => Some(Credentials::new(access, secret)),
            _ => None,
        }
    }

    /// Names of the variables that are unset or blank.
    pub fn missing_variables(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.access_key.is_none() {
            missing.push(self.access_var.to_string());
        }
        if self.secret_key.is_none() {
            missing.push(self.secret_var.to_string());
        }
        missing
    }
}

/// RPC endpoints for the chain providers.
#[derive(Clone, Debug)]
pub struct RpcEndpoints {
    pub ethereum: String,
    pub solana: String,
    pub flare: String,
}

impl Default for RpcEndpoints {
    fn default() -> Self {
        Self {
            ethereum: DEFAULT_ETHEREUM_RPC_URL.to_string(),
            solana: DEFAULT_SOLANA_RPC_URL.to_string(),
            flare: DEFAULT_FLARE_RPC_URL.to_string(),
        }
    }
}

/// Everything a run needs to know about the environment.
///
/// Blank values count as absent.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub eth_address: Option<String>,
    pub sol_address: Option<String>,
    pub flare_address: Option<String>,
    pub upbit: ExchangeKeys,
    pub korbit: ExchangeKeys,
    pub bithumb: ExchangeKeys,
    pub rpc: RpcEndpoints,
    pub debug: bool,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc = RpcEndpoints {
            ethereum: endpoint(&lookup, keys::ETH_RPC_URL, DEFAULT_ETHEREUM_RPC_URL)?,
            solana: endpoint(&lookup, keys::SOLANA_RPC_URL, DEFAULT_SOLANA_RPC_URL)?,
            flare: endpoint(&lookup, keys::FLARE_RPC_URL, DEFAULT_FLARE_RPC_URL)?,
        };

        Ok(Self {
            eth_address: non_blank(lookup(keys::ETH_ADDRESS)),
            sol_address: non_blank(lookup(keys::SOL_ADDRESS)),
            flare_address: non_blank(lookup(keys::FLARE_ADDRESS)),
            upbit: ExchangeKeys::load(&lookup, keys::UPBIT_ACCESS_KEY, keys::UPBIT_SECRET_KEY),
            korbit: ExchangeKeys::load(&lookup, keys::KORBIT_ACCESS_KEY, keys::KORBIT_SECRET_KEY),
            bithumb: ExchangeKeys::load(
                &lookup,
                keys::BITHUMB_ACCESS_KEY,
                keys::BITHUMB_SECRET_KEY,
            ),
            rpc,
            debug: lookup(keys::DEBUG).as_deref().map(parse_flag).unwrap_or(false),
        })
    }

    /// Key pair variables for an exchange that has a private account API.
    pub fn exchange_keys(&self, exchange: Exchange) -> Option<&ExchangeKeys> {
        match exchange {
            Exchange::Upbit => Some(&self.upbit),
            Exchange::Korbit => Some(&self.korbit),
            Exchange::Bithumb => Some(&self.bithumb),
            Exchange::Binance | Exchange::Okx => None,
        }
    }

    pub fn credentials(&self, exchange: Exchange) -> Option<Credentials> {
        self.exchange_keys(exchange).and_then(ExchangeKeys::credentials)
    }

    /// Configured address for a chain provider id.
    pub fn address_for(&self, provider_id: &str) -> Option<&str> {
        match provider_id {
            "ETHEREUM" => self.eth_address.as_deref(),
            "SOLANA" => self.sol_address.as_deref(),
            "FLARE" => self.flare_address.as_deref(),
            _ => None,
        }
    }

    /// Account on `network` for a chain provider id, when its address is set.
    pub fn account_for(&self, provider_id: &str, network: Network) -> Option<Account> {
        self.address_for(provider_id)
            .map(|address| Account::new(network, address))
    }
}

/// `true`, `1` and `yes` (any case) switch a flag on.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn endpoint(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<String> {
    let Some(url) = non_blank(lookup(key)) else {
        return Ok(default.to_string());
    };
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::InvalidConfigValue {
            key: key.to_string(),
            message: format!("'{}' is not an http(s) URL", url),
        });
    }
    Ok(url)
}
