//! JWT validation options and configuration.

use crate::timespan::TimeSpan;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

/// Registered claim names that can be required
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisteredClaim {
    /// Expiration time
    Exp,
    /// Not before
    Nbf,
    /// Issued at
    Iat,
    /// Issuer
    Iss,
    /// Subject
    Sub,
    /// Audience
    Aud,
    /// JWT ID
    Jti,
}

impl RegisteredClaim {
    /// Every registered claim, in validation order
    pub const ALL: [RegisteredClaim; 7] = [
        RegisteredClaim::Exp,
        RegisteredClaim::Nbf,
        RegisteredClaim::Iat,
        RegisteredClaim::Iss,
        RegisteredClaim::Sub,
        RegisteredClaim::Aud,
        RegisteredClaim::Jti,
    ];

    /// Payload key
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RegisteredClaim::Exp => "exp",
            RegisteredClaim::Nbf => "nbf",
            RegisteredClaim::Iat => "iat",
            RegisteredClaim::Iss => "iss",
            RegisteredClaim::Sub => "sub",
            RegisteredClaim::Aud => "aud",
            RegisteredClaim::Jti => "jti",
        }
    }
}

impl fmt::Display for RegisteredClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single acceptable value or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// Exactly one acceptable value
    One(String),
    /// Any of these values is acceptable
    Many(Vec<String>),
}

impl OneOrMany {
    /// Acceptable values as a slice
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(value: String) -> Self {
        OneOrMany::One(value)
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(values: Vec<String>) -> Self {
        OneOrMany::Many(values)
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany {
    fn from(values: [&str; N]) -> Self {
        OneOrMany::Many(values.iter().map(|v| (*v).to_string()).collect())
    }
}

/// Standard-claims validation options.
///
/// A plain value: build it once per verification with a struct literal
/// over `Default::default()` or with the `with_*`/`require` methods, which
/// consume and return the options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Clock tolerance applied to `exp`, `nbf` and `iat`; may be negative.
    pub leeway: TimeSpan,
    /// Current time override (unix seconds)
    pub now: Option<i64>,
    /// Expected header `typ`
    pub typ: Option<String>,
    /// Claims that must be present in the payload
    pub required: BTreeSet<RegisteredClaim>,
    /// Acceptable issuers
    pub issuer: Option<OneOrMany>,
    /// Expected subject
    pub subject: Option<String>,
    /// Acceptable audiences
    pub audience: Option<OneOrMany>,
    /// Maximum age measured from `iat`; makes `iat` mandatory
    pub max_token_age: Option<TimeSpan>,
}

impl ValidationOptions {
    /// Set the clock tolerance
    #[must_use]
    pub fn with_leeway(mut self, leeway: impl Into<TimeSpan>) -> Self {
        self.leeway = leeway.into();
        self
    }

    /// Pin the current time
    #[must_use]
    pub fn with_now(mut self, now: i64) -> Self {
        self.now = Some(now);
        self
    }

    /// Expect a header `typ` (compared as a media type)
    #[must_use]
    pub fn with_typ(mut self, typ: impl Into<String>) -> Self {
        self.typ = Some(typ.into());
        self
    }

    /// Require a claim to be present
    #[must_use]
    pub fn require(mut self, claim: RegisteredClaim) -> Self {
        self.required.insert(claim);
        self
    }

    /// Expect one of the given issuers
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<OneOrMany>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Expect a subject
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Expect one of the given audiences
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<OneOrMany>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Limit token age
    #[must_use]
    pub fn with_max_token_age(mut self, max_age: impl Into<TimeSpan>) -> Self {
        self.max_token_age = Some(max_age.into());
        self
    }

    /// Whether a claim is required
    #[must_use]
    pub fn requires(&self, claim: RegisteredClaim) -> bool {
        self.required.contains(&claim)
    }

    /// Current time: the override if set, otherwise the wall clock
    #[must_use]
    pub fn current_time(&self) -> i64 {
        self.now.unwrap_or_else(|| chrono::Utc::now().timestamp())
    }
}
