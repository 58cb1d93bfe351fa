//! Minimal JSON-RPC 2.0 client shared by the chain providers.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::http;
use crate::errors::ProviderError;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC endpoint bound to one provider id.
pub(crate) struct JsonRpcClient {
    provider: &'static str,
    url: String,
    client: Client,
}

impl JsonRpcClient {
    pub fn new(provider: &'static str, url: impl Into<String>) -> Self {
        Self {
            provider,
            url: url.into(),
            client: http::build_client(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call `method` and decode its `result` member.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ProviderError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        debug!("{} -> {} {}", self.provider, method, params);

        let request = self.client.post(&self.url).json(&body);
        let text = http::send(self.provider, request).await?;
        decode_response(self.provider, &text)
    }
}

/// Decode a JSON-RPC response body. An error object wins over a result.
///
/// A missing or null `result` decodes as JSON `null`, so callers asking for
/// an `Option` see `None`.
pub(crate) fn decode_response<T: DeserializeOwned>(
    provider: &str,
    body: &str,
) -> Result<T, ProviderError> {
    let response: RpcResponse = http::parse_json(provider, body)?;

    if let Some(error) = response.error {
        return Err(ProviderError::Rpc {
            provider: provider.to_string(),
            code: error.code,
            message: error.message,
        });
    }

    let result = response.result.unwrap_or(Value::Null);
    serde_json::from_value(result).map_err(|e| ProviderError::malformed(provider, e.to_string()))
}
