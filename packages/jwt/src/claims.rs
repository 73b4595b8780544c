//! Standard claims validation
//!
//! Claim values stay loosely typed (`serde_json::Value`) until this module
//! matches each one against the exact shape it must have. Every unexpected
//! shape is its own failure; nothing is coerced. Time arithmetic runs in
//! `i128` with saturation so leeway can never wrap.

use crate::{
    codec::JsonObject,
    error::{ClaimError, JwtError, JwtResult},
    validation::{OneOrMany, RegisteredClaim, ValidationOptions},
};
use serde_json::Value;

/// Validate a decoded payload (and header `typ`) against `options`.
///
/// Checks run in a fixed order and the first failure is returned.
pub fn validate_standard_claims(
    payload: &JsonObject,
    header: &JsonObject,
    options: &ValidationOptions,
) -> JwtResult<()> {
    check(payload, header, options).map_err(|err| {
        tracing::debug!(
            claim = err.claim().unwrap_or("-"),
            error = %err,
            "Claim validation failed"
        );
        JwtError::InvalidClaim(err)
    })
}

fn check(
    payload: &JsonObject,
    header: &JsonObject,
    options: &ValidationOptions,
) -> Result<(), ClaimError> {
    let now = i128::from(options.current_time());
    let leeway = options
        .leeway
        .seconds()
        .map(i128::from)
        .map_err(|e| ClaimError::InvalidLeeway(e.to_string()))?;

    if let Some(expected) = &options.typ {
        match header.get("typ") {
            Some(Value::String(typ)) if normalize_typ(typ) == normalize_typ(expected) => {}
            _ => return Err(ClaimError::TypMismatch),
        }
    }

    for claim in RegisteredClaim::ALL {
        if options.requires(claim) && !payload.contains_key(claim.as_str()) {
            return Err(ClaimError::Missing(claim.as_str()));
        }
    }
    if options.max_token_age.is_some() && !payload.contains_key("iat") {
        return Err(ClaimError::Missing("iat"));
    }

    match (&options.issuer, payload.get("iss")) {
        (Some(expected), Some(value)) => {
            let issuer = string_claim(value, "iss")?;
            if !acceptable(expected, "iss")?.iter().any(|v| v == issuer) {
                return Err(ClaimError::Mismatch("iss"));
            }
        }
        (Some(_), None) => return Err(ClaimError::Missing("iss")),
        (None, Some(value)) => {
            string_claim(value, "iss")?;
        }
        (None, None) => {}
    }

    match (&options.subject, payload.get("sub")) {
        (Some(expected), Some(value)) => {
            if string_claim(value, "sub")? != expected {
                return Err(ClaimError::Mismatch("sub"));
            }
        }
        (Some(_), None) => return Err(ClaimError::Missing("sub")),
        (None, Some(value)) => {
            string_claim(value, "sub")?;
        }
        (None, None) => {}
    }

    match (payload.get("aud"), &options.audience) {
        (Some(value), expected) => {
            let audiences = audience_claim(value)?;
            if let Some(expected) = expected {
                let expected = acceptable(expected, "aud")?;
                if !audiences.iter().any(|aud| expected.iter().any(|e| e == aud)) {
                    return Err(ClaimError::Mismatch("aud"));
                }
            }
        }
        (None, Some(_)) => return Err(ClaimError::Missing("aud")),
        (None, None) => {}
    }

    if let Some(value) = payload.get("jti") {
        string_claim(value, "jti")?;
    }

    if let Some(value) = payload.get("exp") {
        let exp = numeric_claim(value, "exp")?;
        if now >= exp.saturating_add(leeway) {
            return Err(ClaimError::Expired);
        }
    }

    if let Some(value) = payload.get("nbf") {
        let nbf = numeric_claim(value, "nbf")?;
        if now < nbf.saturating_sub(leeway) {
            return Err(ClaimError::NotYetValid);
        }
    }

    if let Some(value) = payload.get("iat") {
        let iat = numeric_claim(value, "iat")?;
        if let Some(max_age) = &options.max_token_age {
            let max_age = max_age
                .seconds()
                .map(i128::from)
                .map_err(|e| ClaimError::InvalidMaxAge(e.to_string()))?;
            let age = now.saturating_sub(iat);
            if age.saturating_sub(leeway) > max_age {
                return Err(ClaimError::TooOld);
            }
            if age < leeway.saturating_neg() {
                return Err(ClaimError::IssuedInFuture);
            }
        }
    }

    Ok(())
}

/// `"JWT"` and `"application/jwt"` compare equal
fn normalize_typ(typ: &str) -> String {
    let typ = typ.to_lowercase();
    if typ.contains('/') {
        typ
    } else {
        format!("application/{typ}")
    }
}

fn string_claim<'a>(value: &'a Value, claim: &'static str) -> Result<&'a str, ClaimError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(ClaimError::WrongType {
            claim,
            expected: "a string",
        }),
    }
}

// Integers are taken as-is, floats truncated. Booleans have their own arm so
// they can never be read as 0/1.
fn numeric_claim(value: &Value, claim: &'static str) -> Result<i128, ClaimError> {
    let wrong_type = ClaimError::WrongType {
        claim,
        expected: "a number",
    };
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(i128::from(u))
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i128)
                    .ok_or(wrong_type)
            }
        }
        Value::Bool(_) => Err(wrong_type),
        Value::Null | Value::String(_) | Value::Array(_) | Value::Object(_) => Err(wrong_type),
    }
}

fn audience_claim(value: &Value) -> Result<Vec<&str>, ClaimError> {
    let wrong_type = || ClaimError::WrongType {
        claim: "aud",
        expected: "a string or a non-empty array of strings",
    };
    match value {
        Value::String(aud) => Ok(vec![aud.as_str()]),
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| item.as_str().ok_or_else(wrong_type))
            .collect(),
        _ => Err(wrong_type()),
    }
}

fn acceptable<'a>(
    expected: &'a OneOrMany,
    claim: &'static str,
) -> Result<&'a [String], ClaimError> {
    let values = expected.values();
    if values.is_empty() {
        return Err(ClaimError::EmptyExpectation(claim));
    }
    Ok(values)
}
