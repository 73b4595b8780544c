//! `crit` (critical) header enforcement, RFC 7515 §4.1.11
//!
//! Extensions named in `crit` must be understood by this verifier and must
//! be present in the header. Only `b64` (RFC 7797) is understood, and only
//! in its default `true` form.

use crate::{
    codec::JsonObject,
    error::{JwtError, JwtResult},
};
use serde_json::Value;

/// Extensions this verifier understands
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["b64"];

/// Check `crit` and `b64` in a decoded header.
pub fn validate_crit(header: &JsonObject) -> JwtResult<()> {
    let declared = match header.get("crit") {
        None => Vec::new(),
        Some(crit) => declared_extensions(crit)?,
    };

    for name in declared {
        if !RECOGNIZED_EXTENSIONS.contains(&name.as_str()) {
            tracing::debug!(extension = %name, "Rejecting unrecognized critical extension");
            return Err(JwtError::UnrecognizedExtension(name));
        }
        if !header.contains_key(&name) {
            tracing::debug!(extension = %name, "Critical extension missing from header");
            return Err(JwtError::MissingExtension(name));
        }
    }

    match header.get("b64") {
        None | Some(Value::Bool(true)) => {}
        Some(Value::Bool(false)) => {
            return Err(JwtError::invalid_token(
                "JWTs must not use an unencoded payload",
            ))
        }
        Some(_) => {
            return Err(JwtError::invalid_token(
                "The \"b64\" header parameter must be a boolean",
            ))
        }
    }

    Ok(())
}

fn declared_extensions(crit: &Value) -> JwtResult<Vec<String>> {
    let invalid = || {
        JwtError::invalid_token(
            "\"crit\" header parameter must be a non-empty array of non-empty strings",
        )
    };
    let entries = crit.as_array().filter(|a| !a.is_empty()).ok_or_else(invalid)?;
    entries
        .iter()
        .map(|entry| match entry {
            Value::String(name) if !name.is_empty() => Ok(name.clone()),
            _ => Err(invalid()),
        })
        .collect()
}
