//! Typed claim sets and their builder

use crate::{
    codec::{to_object, JsonObject},
    error::{JwtError, JwtResult},
    timespan::TimeSpan,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `aud` as either one string or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// Single audience
    One(String),
    /// Several audiences
    Many(Vec<String>),
}

impl Audience {
    /// Whether `audience` is among the values
    #[must_use]
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::One(aud) => aud == audience,
            Audience::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

/// Registered claims plus any custom ones
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    /// Expiry (unix seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Not before (unix seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued-at (unix seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// JWT ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Custom claims, flattened into the payload
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Claims {
    /// Start building a claim set
    #[must_use]
    pub fn builder() -> ClaimsBuilder {
        ClaimsBuilder::new()
    }

    /// Read a verified payload into typed claims
    pub fn from_payload(payload: JsonObject) -> JwtResult<Self> {
        serde_json::from_value(Value::Object(payload))
            .map_err(|e| JwtError::InvalidToken(format!("Payload does not match claim types: {e}")))
    }

    /// Payload object for encoding
    pub fn to_payload(&self) -> JwtResult<JsonObject> {
        to_object(self, "Claims")
    }
}

/// Builder for [`Claims`].
///
/// Relative times (`expires_in`, `not_before_in`) are kept as spans and
/// resolved in [`build`](Self::build) against `iat` when it was set,
/// otherwise against the wall clock.
#[derive(Debug, Clone, Default)]
pub struct ClaimsBuilder {
    claims: Claims,
    expires_in: Option<TimeSpan>,
    not_before_in: Option<TimeSpan>,
}

impl ClaimsBuilder {
    /// Create a new claims builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the issuer (iss) claim.
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.claims.iss = Some(iss.into());
        self
    }

    /// Set the subject (sub) claim.
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.claims.sub = Some(sub.into());
        self
    }

    /// Set a single audience.
    #[must_use]
    pub fn audience(mut self, aud: impl Into<String>) -> Self {
        self.claims.aud = Some(Audience::One(aud.into()));
        self
    }

    /// Set several audiences.
    #[must_use]
    pub fn audiences<I, S>(mut self, auds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.claims.aud = Some(Audience::Many(auds.into_iter().map(Into::into).collect()));
        self
    }

    /// Set the JWT ID (jti) claim.
    #[must_use]
    pub fn jwt_id(mut self, jti: impl Into<String>) -> Self {
        self.claims.jti = Some(jti.into());
        self
    }

    /// Set the issued-at time.
    #[must_use]
    pub fn issued_at(mut self, iat: i64) -> Self {
        self.claims.iat = Some(iat);
        self
    }

    /// Set the issued-at time to now.
    #[must_use]
    pub fn issued_now(self) -> Self {
        self.issued_at(chrono::Utc::now().timestamp())
    }

    /// Set an absolute expiry.
    #[must_use]
    pub fn expires_at(mut self, exp: i64) -> Self {
        self.claims.exp = Some(exp);
        self.expires_in = None;
        self
    }

    /// Expire after a span, e.g. `"15 minutes"` or `900`.
    #[must_use]
    pub fn expires_in(mut self, span: impl Into<TimeSpan>) -> Self {
        self.expires_in = Some(span.into());
        self
    }

    /// Set an absolute not-before time.
    #[must_use]
    pub fn not_before(mut self, nbf: i64) -> Self {
        self.claims.nbf = Some(nbf);
        self.not_before_in = None;
        self
    }

    /// Become valid after a span.
    #[must_use]
    pub fn not_before_in(mut self, span: impl Into<TimeSpan>) -> Self {
        self.not_before_in = Some(span.into());
        self
    }

    /// Add a custom claim.
    #[must_use]
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.extra.insert(name.into(), value.into());
        self
    }

    /// Resolve relative times and produce the claims.
    ///
    /// # Errors
    /// `MalformedToken` (time span) when a relative time cannot be parsed or
    /// overflows.
    pub fn build(self) -> JwtResult<Claims> {
        let ClaimsBuilder {
            mut claims,
            expires_in,
            not_before_in,
        } = self;
        let anchor = claims
            .iat
            .unwrap_or_else(|| chrono::Utc::now().timestamp());

        if let Some(span) = expires_in {
            claims.exp = Some(offset(anchor, &span)?);
        }
        if let Some(span) = not_before_in {
            claims.nbf = Some(offset(anchor, &span)?);
        }
        Ok(claims)
    }
}

fn offset(anchor: i64, span: &TimeSpan) -> JwtResult<i64> {
    let secs = span.seconds()?;
    anchor
        .checked_add(secs)
        .ok_or_else(|| JwtError::invalid_token("Relative claim time overflows"))
}
