//! Solana balance provider.
//!
//! Native SOL comes from `getBalance`. SPL tokens are read from the owner's
//! associated token account, derived locally from (owner, token program, mint).
//! A token account that was never created holds nothing, so it reads as zero.

use std::borrow::Cow;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use solana_pubkey::Pubkey;
use tracing::{debug, warn};

use crate::errors::ProviderError;
use crate::models::{to_display_units, Account, Asset, Balance, Network};
use crate::provider::rpc::JsonRpcClient;
use crate::provider::{AssetProvider, ProviderCapabilities};

/// Provider ID constant
pub const SOLANA_ID: &str = "SOLANA";

pub const DEFAULT_SOLANA_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// SPL Token program
pub const TOKEN_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// Associated Token Account program
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Message fragment nodes use when a queried account does not exist.
const ACCOUNT_NOT_FOUND: &str = "could not find account";

const COMMITMENT: &str = "confirmed";

/// `{ context, value }` envelope used by most Solana RPC results.
#[derive(Debug, Deserialize)]
struct RpcValue<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenAmount {
    /// Raw amount in base units, as a decimal string
    amount: String,
    /// Decimals recorded on the mint
    decimals: u8,
}

pub struct SolanaProvider {
    rpc: JsonRpcClient,
}

impl SolanaProvider {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc: JsonRpcClient::new(SOLANA_ID, rpc_url),
        }
    }

    pub fn rpc_url(&self) -> &str {
        self.rpc.url()
    }

    async fn native_balance(
        &self,
        owner: &Pubkey,
        asset: &Asset,
    ) -> Result<Balance, ProviderError> {
        let response: RpcValue<u64> = self
            .rpc
            .call(
                "getBalance",
                json!([owner.to_string(), { "commitment": COMMITMENT }]),
            )
            .await?;
        let amount = to_display_units(u128::from(response.value), u32::from(asset.decimals))?;
        Ok(Balance::new(amount, asset.symbol.clone(), Cow::Borrowed(SOLANA_ID)))
    }

    async fn token_balance(
        &self,
        owner: &Pubkey,
        mint: &str,
        asset: &Asset,
    ) -> Result<Balance, ProviderError> {
        let mint = parse_pubkey(mint)?;
        let token_account = associated_token_address(owner, &mint);
        debug!("{}: {} token account {}", SOLANA_ID, asset.symbol, token_account);

        let response = self
            .rpc
            .call::<RpcValue<Option<TokenAmount>>>(
                "getTokenAccountBalance",
                json!([token_account.to_string(), { "commitment": COMMITMENT }]),
            )
            .await;
        let raw = match settle_token_amount(response)? {
            Some(amount) => raw_token_amount(&amount, asset)?,
            None => {
                debug!(
                    "{}: token account {} does not exist, reading as zero",
                    SOLANA_ID, token_account
                );
                0
            }
        };

        let amount = to_display_units(raw, u32::from(asset.decimals))?;
        Ok(Balance::new(amount, asset.symbol.clone(), Cow::Borrowed(SOLANA_ID)))
    }
}

#[async_trait]
impl AssetProvider for SolanaProvider {
    fn id(&self) -> &'static str {
        SOLANA_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::balances_only()
    }

    async fn fetch_balance(
        &self,
        account: Option<&Account>,
        asset: &Asset,
    ) -> Result<Balance, ProviderError> {
        let account = account.ok_or_else(|| ProviderError::NotConfigured {
            provider: SOLANA_ID.to_string(),
            what: "address".to_string(),
        })?;
        if account.network != Network::Solana {
            return Err(ProviderError::InvalidAddress {
                provider: SOLANA_ID.to_string(),
                address: account.address.clone(),
                message: format!("expected a solana account, got {}", account.network.as_str()),
            });
        }
        let owner = parse_pubkey(&account.address)?;

        match asset.contract.as_deref() {
            None => self.native_balance(&owner, asset).await,
            Some(mint) => self.token_balance(&owner, mint, asset).await,
        }
    }
}

/// Derive the associated token account of `owner` for `mint`.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    let (address, _bump) = Pubkey::find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    );
    address
}

fn parse_pubkey(address: &str) -> Result<Pubkey, ProviderError> {
    Pubkey::from_str(address).map_err(|e| ProviderError::InvalidAddress {
        provider: SOLANA_ID.to_string(),
        address: address.to_string(),
        message: e.to_string(),
    })
}

/// Unwrap a `getTokenAccountBalance` outcome.
///
/// A missing account (RPC error or null value) is `None`. Every other error
/// passes through.
fn settle_token_amount(
    response: Result<RpcValue<Option<TokenAmount>>, ProviderError>,
) -> Result<Option<TokenAmount>, ProviderError> {
    match response {
        Ok(RpcValue { value }) => Ok(value),
        Err(ProviderError::Rpc { ref message, .. }) if message.contains(ACCOUNT_NOT_FOUND) => {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Raw base-unit amount of a token account.
///
/// The catalog decides the scale; a mint that disagrees is logged.
fn raw_token_amount(amount: &TokenAmount, asset: &Asset) -> Result<u128, ProviderError> {
    if amount.decimals != asset.decimals {
        warn!(
            "{}: {} mint reports {} decimals, catalog has {}",
            SOLANA_ID, asset.symbol, amount.decimals, asset.decimals
        );
    }
    amount.amount.parse::<u128>().map_err(|_| {
        ProviderError::malformed(
            SOLANA_ID,
            format!("token amount is not an integer: '{}'", amount.amount),
        )
    })
}
