//! Base64url and canonical-JSON adapters for token segments

use crate::error::{JwtError, JwtResult};
use base64::{
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
    Engine as _,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// JSON object as carried in a token header or payload
pub type JsonObject = Map<String, Value>;

/// Base64 URL-safe encoding without padding (RFC 7515)
#[inline]
#[must_use]
pub fn b64url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64 URL-safe decoding of an unpadded segment.
///
/// The input is re-padded to a multiple of four and decoded with the strict
/// padded engine, so stray characters, impossible lengths and non-canonical
/// trailing bits are all rejected.
pub fn b64url_decode(input: &str) -> JwtResult<Vec<u8>> {
    let missing = (4 - input.len() % 4) % 4;
    if missing == 3 {
        return Err(JwtError::invalid_token("Base64 input is not valid"));
    }
    let mut padded = String::with_capacity(input.len() + missing);
    padded.push_str(input);
    padded.extend(std::iter::repeat('=').take(missing));

    URL_SAFE
        .decode(padded)
        .map_err(|_| JwtError::invalid_token("Base64 input is not valid"))
}

/// Serialize to JSON with sorted keys and compact separators.
///
/// `serde_json` keeps object keys in a `BTreeMap`, so equal values always
/// produce identical bytes.
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T) -> JwtResult<Vec<u8>> {
    // Round-trip through `Value` so struct field order is normalized too.
    let value = serde_json::to_value(value)
        .map_err(|e| JwtError::InvalidToken(format!("JSON serialization failed: {e}")))?;
    serde_json::to_vec(&value)
        .map_err(|e| JwtError::InvalidToken(format!("JSON serialization failed: {e}")))
}

/// Serialize a value that must come out as a JSON object
pub fn to_object<T: Serialize + ?Sized>(value: &T, what: &str) -> JwtResult<JsonObject> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(JwtError::InvalidToken(format!("{what} must be a JSON object"))),
        Err(e) => Err(JwtError::InvalidToken(format!(
            "JSON serialization failed: {e}"
        ))),
    }
}

/// Parse bytes as a top-level JSON object
pub fn parse_object(bytes: &[u8], what: &str) -> JwtResult<JsonObject> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(JwtError::InvalidToken(format!("{what} must be a JSON object"))),
        Err(_) => Err(JwtError::InvalidToken(format!("{what} is not valid JSON"))),
    }
}
