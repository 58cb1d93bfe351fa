//! Request signing for the private exchange endpoints.

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use sha2::Sha256;
use uuid::Uuid;

use crate::errors::ProviderError;

type HmacSha256 = Hmac<Sha256>;

/// API key pair for one exchange.
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct NonceClaims<'a> {
    access_key: &'a str,
    nonce: String,
}

#[derive(Debug, Serialize)]
struct TimestampClaims<'a> {
    access_key: &'a str,
    nonce: String,
    timestamp: u64,
}

/// HS256 bearer token with `access_key` and a fresh UUID nonce (Upbit).
pub(crate) fn nonce_token(
    provider: &str,
    credentials: &Credentials,
) -> Result<String, ProviderError> {
    let claims = NonceClaims {
        access_key: &credentials.access_key,
        nonce: Uuid::new_v4().to_string(),
    };
    sign_jwt(provider, &claims, &credentials.secret_key)
}

/// HS256 bearer token that also carries the request time in ms (Bithumb).
pub(crate) fn timestamp_token(
    provider: &str,
    credentials: &Credentials,
    timestamp_ms: u64,
) -> Result<String, ProviderError> {
    let claims = TimestampClaims {
        access_key: &credentials.access_key,
        nonce: Uuid::new_v4().to_string(),
        timestamp: timestamp_ms,
    };
    sign_jwt(provider, &claims, &credentials.secret_key)
}

/// Hex HMAC-SHA256 of `payload` (Korbit query signing).
pub(crate) fn hmac_signature(
    provider: &str,
    secret: &str,
    payload: &str,
) -> Result<String, ProviderError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| ProviderError::Auth {
        provider: provider.to_string(),
        message: format!("Invalid HMAC secret length: {}", e),
    })?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

pub(crate) fn now_millis(provider: &str) -> Result<u64, ProviderError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .map_err(|e| ProviderError::Auth {
            provider: provider.to_string(),
            message: format!("Timestamp error: {}", e),
        })
}

fn sign_jwt<T: Serialize>(
    provider: &str,
    claims: &T,
    secret: &str,
) -> Result<String, ProviderError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ProviderError::Auth {
        provider: provider.to_string(),
        message: format!("Failed to sign token: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Decoded {
        access_key: String,
        nonce: String,
        timestamp: Option<u64>,
    }

    fn decode_claims(token: &str, secret: &str) -> Decoded {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        decode::<Decoded>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .unwrap()
            .claims
    }

    #[test]
    fn test_nonce_token_claims() {
        let credentials = Credentials::new("access", "secret");
        let token = nonce_token("UPBIT", &credentials).unwrap();
        let claims = decode_claims(&token, "secret");
        assert_eq!(claims.access_key, "access");
        assert!(Uuid::parse_str(&claims.nonce).is_ok());
        assert!(claims.timestamp.is_none());
    }

    #[test]
    fn test_nonce_is_fresh_per_token() {
        let credentials = Credentials::new("access", "secret");
        let first = decode_claims(&nonce_token("UPBIT", &credentials).unwrap(), "secret");
        let second = decode_claims(&nonce_token("UPBIT", &credentials).unwrap(), "secret");
        assert_ne!(first.nonce, second.nonce);
    }

    #[test]
    fn test_timestamp_token_claims() {
        let credentials = Credentials::new("access", "secret");
        let token = timestamp_token("BITHUMB", &credentials, 1_700_000_000_000).unwrap();
        let claims = decode_claims(&token, "secret");
        assert_eq!(claims.timestamp, Some(1_700_000_000_000));
    }

    #[test]
    fn test_hmac_signature_known_vector() {
        let signature = hmac_signature("KORBIT", "Jefe", "what do ya want for nothing?").unwrap();
        assert_eq!(
            signature,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::new("access", "top-secret");
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("access"));
        assert!(!printed.contains("top-secret"));
    }
}
