//! Ethereum-compatible chain provider.
//!
//! Reads native balances with `eth_getBalance` and ERC-20 balances with
//! `eth_call` against the token contract. One instance serves one chain
//! (Ethereum, Flare, ...), identified by its provider id.

use std::borrow::Cow;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::errors::ProviderError;
use crate::models::{to_display_units, Account, Asset, Balance, Network};
use crate::provider::rpc::JsonRpcClient;
use crate::provider::{AssetProvider, ProviderCapabilities};

/// Provider id for Ethereum mainnet
pub const ETHEREUM_ID: &str = "ETHEREUM";

/// Provider id for the Flare C-chain
pub const FLARE_ID: &str = "FLARE";

pub const DEFAULT_ETHEREUM_RPC_URL: &str = "https://ethereum.publicnode.com";
pub const DEFAULT_FLARE_RPC_URL: &str = "https://flare-api.flare.network/ext/C/rpc";

/// `decimals()`
const DECIMALS_SELECTOR: &str = "0x313ce567";

/// `balanceOf(address)`
const BALANCE_OF_SELECTOR: &str = "0x70a08231";

/// Balance provider for one EVM chain.
pub struct EvmProvider {
    id: &'static str,
    rpc: JsonRpcClient,
}

impl EvmProvider {
    pub fn new(id: &'static str, rpc_url: impl Into<String>) -> Self {
        Self {
            id,
            rpc: JsonRpcClient::new(id, rpc_url),
        }
    }

    pub fn ethereum(rpc_url: impl Into<String>) -> Self {
        Self::new(ETHEREUM_ID, rpc_url)
    }

    pub fn flare(rpc_url: impl Into<String>) -> Self {
        Self::new(FLARE_ID, rpc_url)
    }

    pub fn rpc_url(&self) -> &str {
        self.rpc.url()
    }

    async fn native_balance(&self, address: &str, asset: &Asset) -> Result<Balance, ProviderError> {
        let hex: String = self
            .rpc
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        let raw = parse_quantity(self.id, &hex)?;
        let amount = to_display_units(raw, u32::from(asset.decimals))?;
        Ok(Balance::new(amount, asset.symbol.clone(), Cow::Borrowed(self.id)))
    }

    async fn token_balance(
        &self,
        address: &str,
        contract: &str,
        asset: &Asset,
    ) -> Result<Balance, ProviderError> {
        let contract = validate_address(self.id, contract)?;

        let hex: String = self
            .rpc
            .call(
                "eth_call",
                json!([{ "to": contract, "data": DECIMALS_SELECTOR }, "latest"]),
            )
            .await?;
        let decimals = parse_quantity(self.id, &hex)?;
        let decimals = u32::try_from(decimals).map_err(|_| {
            ProviderError::malformed(self.id, format!("decimals() returned {}", decimals))
        })?;

        let hex: String = self
            .rpc
            .call(
                "eth_call",
                json!([{ "to": contract, "data": encode_balance_of(address) }, "latest"]),
            )
            .await?;
        let raw = parse_quantity(self.id, &hex)?;
        debug!("{}: {} raw balance {} with {} decimals", self.id, asset.symbol, raw, decimals);

        let amount = to_display_units(raw, decimals)?;
        Ok(Balance::new(amount, asset.symbol.clone(), Cow::Borrowed(self.id)))
    }
}

#[async_trait]
impl AssetProvider for EvmProvider {
    fn id(&self) -> &'static str {
        self.id
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
            provider: self.id.to_string(),
            what: "address".to_string(),
        })?;
        if account.network != Network::Evm {
            return Err(ProviderError::InvalidAddress {
                provider: self.id.to_string(),
                address: account.address.clone(),
                message: format!("expected an evm account, got {}", account.network.as_str()),
            });
        }
        let address = validate_address(self.id, &account.address)?;

        match asset.contract.as_deref() {
            None => self.native_balance(&address, asset).await,
            Some(contract) => self.token_balance(&address, contract, asset).await,
        }
    }
}

/// Check a `0x`-prefixed 20-byte hex address and return it lower-cased.
pub(crate) fn validate_address(provider: &str, address: &str) -> Result<String, ProviderError> {
    let invalid = |message: &str| ProviderError::InvalidAddress {
        provider: provider.to_string(),
        address: address.to_string(),
        message: message.to_string(),
    };

    let hex = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| invalid("missing 0x prefix"))?;
    if hex.len() != 40 {
        return Err(invalid("expected 40 hex digits"));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("non-hex character"));
    }
    Ok(format!("0x{}", hex.to_ascii_lowercase()))
}

/// ABI-encode a `balanceOf(owner)` call.
///
/// `owner` must already be validated.
pub(crate) fn encode_balance_of(owner: &str) -> String {
    let hex = owner.trim_start_matches("0x");
    format!("{}{:0>64}", BALANCE_OF_SELECTOR, hex)
}

/// Parse a hex quantity ("0x1a") or 32-byte ABI word into an integer.
///
/// `"0x"` decodes as zero, which is what nodes return for calls into
/// addresses without code.
pub(crate) fn parse_quantity(provider: &str, value: &str) -> Result<u128, ProviderError> {
    let hex = value.strip_prefix("0x").ok_or_else(|| {
        ProviderError::malformed(provider, format!("not a hex quantity: '{}'", value))
    })?;
    let digits = hex.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    if digits.len() > 32 {
        return Err(ProviderError::Conversion(format!(
            "quantity {} does not fit in 128 bits",
            value
        )));
    }
    u128::from_str_radix(digits, 16)
        .map_err(|_| ProviderError::malformed(provider, format!("not a hex quantity: '{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const OWNER: &str = "0x00000000219ab540356cBB839Cbe05303d7705Fa";
    const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

    fn usdc() -> Asset {
        Asset::token("USDC", "USD Coin", USDC, 6)
    }

    fn rpc_result(result: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"jsonrpc":"2.0","id":1,"result":"{}"}}"#,
            result
        ))
    }

    async fn mount_eth_call(server: &MockServer, data: &str, result: &str) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "eth_call",
                "params": [{ "data": data }]
            })))
            .respond_with(rpc_result(result))
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(
            parse_quantity(ETHEREUM_ID, "0x1bc16d674ec80000").unwrap(),
            2_000_000_000_000_000_000
        );
        assert_eq!(parse_quantity(ETHEREUM_ID, "0x0").unwrap(), 0);
        assert_eq!(parse_quantity(ETHEREUM_ID, "0x").unwrap(), 0);
    }

    #[test]
    fn test_parse_abi_word() {
        let word = "0x0000000000000000000000000000000000000000000000000000000000000012";
        assert_eq!(parse_quantity(FLARE_ID, word).unwrap(), 18);
    }

    #[test]
    fn test_parse_quantity_rejects_garbage() {
        assert!(matches!(
            parse_quantity(ETHEREUM_ID, "1234"),
            Err(ProviderError::MalformedResponse { .. })
        ));
        assert!(parse_quantity(ETHEREUM_ID, "0xzz").is_err());
        let huge = format!("0x1{}", "0".repeat(32));
        assert!(matches!(
            parse_quantity(ETHEREUM_ID, &huge),
            Err(ProviderError::Conversion(_))
        ));
    }

    #[test]
    fn test_validate_address() {
        let normalized = validate_address(ETHEREUM_ID, OWNER).unwrap();
        assert_eq!(normalized, "0x00000000219ab540356cbb839cbe05303d7705fa");
        assert!(validate_address(ETHEREUM_ID, "0x1234").is_err());
        assert!(validate_address(ETHEREUM_ID, "00000000219ab540356cBB839Cbe05303d7705Fa").is_err());
        assert!(
            validate_address(ETHEREUM_ID, "0x00000000219ab540356cBB839Cbe05303d7705Fg").is_err()
        );
    }

    #[test]
    fn test_encode_balance_of() {
        let owner = validate_address(ETHEREUM_ID, OWNER).unwrap();
        let data = encode_balance_of(&owner);
        assert!(data.starts_with(BALANCE_OF_SELECTOR));
        assert_eq!(data.len(), 10 + 64);
        assert!(data.ends_with("00000000219ab540356cbb839cbe05303d7705fa"));
        assert_eq!(&data[10..34], "000000000000000000000000");
    }

    #[test]
    fn test_wei_word_to_amount() {
        let raw = parse_quantity(ETHEREUM_ID, "0x1121d33597384000").unwrap();
        assert_eq!(to_display_units(raw, 18).unwrap(), dec!(1.2345));
    }

    #[tokio::test]
    async fn test_missing_address_is_not_configured() {
        let provider = EvmProvider::flare(DEFAULT_FLARE_RPC_URL);
        let asset = Asset::native("FLR", "Flare", 18);
        let result = provider.fetch_balance(None, &asset).await;
        assert!(matches!(result, Err(ProviderError::NotConfigured { .. })));
    }

    #[tokio::test]
    async fn test_solana_account_rejected() {
        let provider = EvmProvider::ethereum(DEFAULT_ETHEREUM_RPC_URL);
        let asset = Asset::native("ETH", "Ethereum", 18);
        let account = Account::solana("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU");
        let result = provider.fetch_balance(Some(&account), &asset).await;
        assert!(matches!(result, Err(ProviderError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn test_fetch_token_balance_reads_decimals_then_balance() {
        let server = MockServer::start().await;
        let owner = validate_address(ETHEREUM_ID, OWNER).unwrap();
        mount_eth_call(
            &server,
            DECIMALS_SELECTOR,
            "0x0000000000000000000000000000000000000000000000000000000000000006",
        )
        .await;
        mount_eth_call(
            &server,
            &encode_balance_of(&owner),
            "0x000000000000000000000000000000000000000000000000000000004994f9a0",
        )
        .await;

        let provider = EvmProvider::ethereum(server.uri());
        let balance = provider
            .fetch_balance(Some(&Account::evm(OWNER)), &usdc())
            .await
            .unwrap();
        assert_eq!(balance.amount, dec!(1234.5));
        assert_eq!(balance.symbol, "USDC");
        assert_eq!(balance.source, ETHEREUM_ID);
    }

    #[tokio::test]
    async fn test_fetch_token_balance_empty_result_is_zero() {
        let server = MockServer::start().await;
        let owner = validate_address(ETHEREUM_ID, OWNER).unwrap();
        mount_eth_call(&server, DECIMALS_SELECTOR, "0x12").await;
        mount_eth_call(&server, &encode_balance_of(&owner), "0x").await;

        let provider = EvmProvider::ethereum(server.uri());
        let balance = provider
            .fetch_balance(Some(&Account::evm(OWNER)), &usdc())
            .await
            .unwrap();
        assert_eq!(balance.amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_fetch_native_balance() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "eth_getBalance" })))
            .respond_with(rpc_result("0x1121d33597384000"))
            .expect(1)
            .mount(&server)
            .await;

        let provider = EvmProvider::flare(server.uri());
        let balance = provider
            .fetch_balance(Some(&Account::evm(OWNER)), &Asset::native("FLR", "Flare", 18))
            .await
            .unwrap();
        assert_eq!(balance.amount, dec!(1.2345));
        assert_eq!(balance.source, FLARE_ID);
    }
}
