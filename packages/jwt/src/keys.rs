//! Shared-secret key material
//!
//! Keys arrive as raw bytes, a UTF-8 string, or a symmetric JWK
//! (`{"kty":"oct","k":"<base64url>"}`) and are normalized to bytes before any
//! cryptographic use.

use crate::{
    algorithms::Algorithm,
    codec::b64url_decode,
    error::{JwtError, JwtResult},
};
use serde_json::Value;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// HMAC secret, wiped from memory on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Wrap raw secret bytes
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Normalize an `oct` JWK object
    pub fn from_jwk(jwk: &Value) -> JwtResult<Self> {
        let jwk = jwk
            .as_object()
            .ok_or_else(|| JwtError::invalid_key("JWK must be a JSON object"))?;
        if jwk.get("kty").and_then(Value::as_str) != Some("oct") {
            return Err(JwtError::invalid_key("Only 'oct' JWK keys are supported"));
        }
        match jwk.get("k") {
            Some(Value::String(k)) if !k.is_empty() => {
                let bytes = b64url_decode(k)
                    .map_err(|_| JwtError::invalid_key("JWK 'k' is not valid base64url"))?;
                Ok(Self { bytes })
            }
            _ => Err(JwtError::invalid_key("JWK 'k' must be a non-empty string")),
        }
    }

    /// Parse and normalize a JWK given as JSON text
    pub fn from_jwk_json(json: &str) -> JwtResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|_| JwtError::invalid_key("JWK is not valid JSON"))?;
        Self::from_jwk(&value)
    }

    /// Secret bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Secret length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the secret is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn warn_if_short(&self, algorithm: Algorithm) {
        if self.len() < algorithm.recommended_key_len() {
            tracing::warn!(
                algorithm = algorithm.as_str(),
                key_len = self.len(),
                recommended = algorithm.recommended_key_len(),
                "HMAC key is shorter than the digest size"
            );
        }
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

impl From<&[u8]> for SecretKey {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl<const N: usize> From<&[u8; N]> for SecretKey {
    fn from(bytes: &[u8; N]) -> Self {
        Self::from_bytes(bytes.as_slice())
    }
}

impl From<Vec<u8>> for SecretKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&str> for SecretKey {
    fn from(secret: &str) -> Self {
        Self::from_bytes(secret.as_bytes())
    }
}

impl From<String> for SecretKey {
    fn from(secret: String) -> Self {
        Self::from_bytes(secret.into_bytes())
    }
}

impl TryFrom<&Value> for SecretKey {
    type Error = JwtError;

    fn try_from(jwk: &Value) -> Result<Self, Self::Error> {
        Self::from_jwk(jwk)
    }
}
