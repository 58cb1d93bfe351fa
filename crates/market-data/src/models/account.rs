use serde::{Deserialize, Serialize};

/// Address family an account lives in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum-compatible chain (Ethereum, Flare, ...)
    Evm,
    /// Solana
    Solana,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Evm => "evm",
            Network::Solana => "solana",
        }
    }
}

/// A holder on a given network, loaded once from configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub network: Network,
    pub address: String,
}

impl Account {
    pub fn new(network: Network, address: impl Into<String>) -> Self {
        Self {
            network,
            address: address.into().trim().to_string(),
        }
    }

    pub fn evm(address: impl Into<String>) -> Self {
        Self::new(Network::Evm, address)
    }

    pub fn solana(address: impl Into<String>) -> Self {
        Self::new(Network::Solana, address)
    }
}
