//! Public entry points: encode, decode and verify

use crate::{
    algorithms::Algorithm,
    claims::validate_standard_claims,
    codec::JsonObject,
    crit::validate_crit,
    error::{JwtError, JwtResult},
    keys::SecretKey,
    token::{self, DecodedToken},
    validation::ValidationOptions,
};
use serde::Serialize;

/// Sign `payload` with `key` using the named algorithm.
///
/// Claims are not validated when encoding.
///
/// # Errors
/// `MalformedToken` when the payload is not a JSON object or an extra `alg`
/// header disagrees with `algorithm`; `UnsupportedAlgorithm` for unknown
/// algorithm names.
pub fn encode<P: Serialize + ?Sized>(
    payload: &P,
    key: &SecretKey,
    algorithm: &str,
    extra_headers: Option<&JsonObject>,
) -> JwtResult<String> {
    token::encode(payload, key, algorithm, extra_headers)
}

/// Split and decode a token. No signature or claim checks are performed.
///
/// # Errors
/// `MalformedToken` on any structural problem.
pub fn decode(token: &str) -> JwtResult<DecodedToken> {
    token::decode(token)
}

/// Fully verify a token and return its payload.
///
/// Pipeline: structural decode, `alg` allow-list, registry lookup, `crit`
/// enforcement, constant-time signature check, standard claims. A bad `crit`
/// header is malformed whether or not the signature would have matched.
/// `allowed_algorithms` of `None` accepts any registered algorithm.
///
/// # Errors
/// The first failing stage's error; a disallowed algorithm is reported as
/// `InvalidSignature`, the same as a bad signature.
pub fn verify(
    token: &str,
    key: &SecretKey,
    allowed_algorithms: Option<&[&str]>,
    options: &ValidationOptions,
) -> JwtResult<JsonObject> {
    let decoded = token::decode(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejecting structurally invalid token");
        e
    })?;

    let alg = decoded
        .alg()
        .ok_or_else(|| JwtError::invalid_token("Header 'alg' must be a string"))?;

    if let Some(allowed) = allowed_algorithms {
        if !allowed.contains(&alg) {
            tracing::debug!(alg, "Token algorithm is not in the allow-list");
            return Err(JwtError::InvalidSignature);
        }
    }

    let algorithm = Algorithm::from_name(alg)?;
    validate_crit(&decoded.header)?;

    algorithm
        .verify(key.as_bytes(), &decoded.signing_input, &decoded.signature)
        .map_err(|e| {
            tracing::debug!(alg, "Signature verification failed");
            e
        })?;

    validate_standard_claims(&decoded.payload, &decoded.header, options)?;

    tracing::trace!(alg, "Token verified");
    Ok(decoded.payload)
}
