//! Shared HTTP plumbing for REST and JSON-RPC providers.

use std::str::FromStr;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::ProviderError;

/// Default HTTP request timeout
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest body excerpt carried in an error message.
const ERROR_BODY_LIMIT: usize = 200;

pub(crate) fn build_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("coinscope/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Send a request and return the body of a 2xx response.
pub(crate) async fn send(
    provider: &str,
    request: RequestBuilder,
) -> Result<String, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::network(provider, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::network(provider, e))?;

    if !status.is_success() {
        debug!("{} answered {}: {}", provider, status, excerpt(&body));
        return Err(ProviderError::Http {
            provider: provider.to_string(),
            status: status.as_u16(),
            message: excerpt(&body),
        });
    }

    Ok(body)
}

/// Send a request and decode the JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let body = send(provider, request).await?;
    parse_json(provider, &body)
}

pub(crate) fn parse_json<T: DeserializeOwned>(
    provider: &str,
    body: &str,
) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::malformed(provider, e.to_string()))
}

/// Parse a decimal sent as a JSON string ("12345.6").
pub(crate) fn decimal_from_str(
    provider: &str,
    field: &str,
    value: &str,
) -> Result<Decimal, ProviderError> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| {
            ProviderError::malformed(provider, format!("{} is not a number: '{}'", field, value))
        })
}

/// Parse a decimal sent as a JSON number.
pub(crate) fn decimal_from_f64(
    provider: &str,
    field: &str,
    value: f64,
) -> Result<Decimal, ProviderError> {
    Decimal::try_from(value).map_err(|_| {
        ProviderError::malformed(provider, format!("{} is out of range: {}", field, value))
    })
}

/// Like [`decimal_from_str`] for optional fields; blank strings become `None`.
pub(crate) fn optional_decimal(
    provider: &str,
    field: &str,
    value: Option<&str>,
) -> Result<Option<Decimal>, ProviderError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => decimal_from_str(provider, field, v).map(Some),
    }
}

fn excerpt(body: &str) -> String {
    if body.chars().count() <= ERROR_BODY_LIMIT {
        body.to_string()
    } else {
        let cut: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        format!("{}...", cut)
    }
}
