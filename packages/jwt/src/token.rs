//! Three-segment token codec
//!
//! `decode` only checks structure. The signing input it returns is rebuilt
//! from the literal encoded segments, never from re-serialized JSON, so the
//! signature covers exactly the bytes that were received.

use crate::{
    algorithms::Algorithm,
    codec::{b64url_decode, b64url_encode, parse_object, to_canonical_json, to_object, JsonObject},
    error::{JwtError, JwtResult},
    keys::SecretKey,
};
use serde::Serialize;
use serde_json::Value;

/// Structurally decoded token
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    /// Header object
    pub header: JsonObject,
    /// Payload (claim set) object
    pub payload: JsonObject,
    /// Raw signature bytes
    pub signature: Vec<u8>,
    /// `segment0 + "." + segment1` as ASCII bytes
    pub signing_input: Vec<u8>,
}

impl DecodedToken {
    /// Declared `alg` header, if it is a string
    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        self.header.get("alg").and_then(Value::as_str)
    }
}

fn split(token: &str) -> JwtResult<(&str, &str, &str)> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok((header, payload, signature))
        }
        (Some(_), Some(_), Some(_), None) => Err(JwtError::invalid_token(
            "Token segments must not be empty",
        )),
        _ => Err(JwtError::invalid_token(
            "Token must have exactly three parts",
        )),
    }
}

/// Split and decode a token without checking its signature or claims
pub fn decode(token: &str) -> JwtResult<DecodedToken> {
    let (encoded_header, encoded_payload, encoded_signature) = split(token)?;

    let header = parse_object(&b64url_decode(encoded_header)?, "Token header")?;
    let payload = parse_object(&b64url_decode(encoded_payload)?, "Token payload")?;
    let signature = b64url_decode(encoded_signature)?;

    let mut signing_input = Vec::with_capacity(encoded_header.len() + 1 + encoded_payload.len());
    signing_input.extend_from_slice(encoded_header.as_bytes());
    signing_input.push(b'.');
    signing_input.extend_from_slice(encoded_payload.as_bytes());

    Ok(DecodedToken {
        header,
        payload,
        signature,
        signing_input,
    })
}

/// Sign `payload` and assemble a compact token.
///
/// The header starts as `{"typ":"JWT","alg":<algorithm>}`; `extra_headers`
/// are merged over it and may replace `typ`, but an `alg` that disagrees
/// with `algorithm` is rejected. Keys shorter than the digest are logged.
pub fn encode<P: Serialize + ?Sized>(
    payload: &P,
    key: &SecretKey,
    algorithm: &str,
    extra_headers: Option<&JsonObject>,
) -> JwtResult<String> {
    let (token, algorithm) = sign(payload, key, algorithm, extra_headers)?;
    key.warn_if_short(algorithm);
    Ok(token)
}

/// [`encode`] without the short-key warning, for callers that already
/// checked the key once.
pub(crate) fn sign<P: Serialize + ?Sized>(
    payload: &P,
    key: &SecretKey,
    algorithm: &str,
    extra_headers: Option<&JsonObject>,
) -> JwtResult<(String, Algorithm)> {
    let payload = to_object(payload, "Payload")?;

    let mut header = JsonObject::new();
    header.insert("typ".into(), Value::from("JWT"));
    header.insert("alg".into(), Value::from(algorithm));
    if let Some(extra) = extra_headers {
        if let Some(alg) = extra.get("alg") {
            if alg.as_str() != Some(algorithm) {
                return Err(JwtError::invalid_token(
                    "Header 'alg' conflicts with the signing algorithm",
                ));
            }
        }
        header.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    let algorithm = Algorithm::from_name(algorithm)?;

    let encoded_header = b64url_encode(&to_canonical_json(&header)?);
    let encoded_payload = b64url_encode(&to_canonical_json(&payload)?);
    let signing_input = format!("{encoded_header}.{encoded_payload}");

    let signature = algorithm.sign(key.as_bytes(), signing_input.as_bytes())?;
    let token = format!("{signing_input}.{}", b64url_encode(&signature));
    Ok((token, algorithm))
}
