//! JWT error types
//!
//! Every failure is terminal for the call that raised it. Errors are grouped
//! into four kinds (see [`ErrorKind`]); callers that only care about the
//! category should match on [`JwtError::kind`] rather than on variants.

use thiserror::Error;

use crate::timespan::TimeSpanError;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// Coarse error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Structure, encoding, header declarations or key material are unusable
    MalformedToken,
    /// Algorithm identifier is not in the registry
    UnsupportedAlgorithm,
    /// Signature mismatch or algorithm outside the caller's allow-list
    InvalidSignature,
    /// Standard-claims validation failed
    InvalidClaim,
}

/// JWT error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Invalid token structure, encoding or header content
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    /// A `crit` entry names an extension this verifier does not implement
    #[error("Extension header parameter \"{0}\" is not recognized")]
    UnrecognizedExtension(String),

    /// A `crit` entry names an extension that is absent from the header
    #[error("Extension header parameter \"{0}\" is missing")]
    MissingExtension(String),

    /// Key material could not be normalized to secret bytes
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Standalone time-span parse failure
    #[error(transparent)]
    TimeSpan(#[from] TimeSpanError),

    /// Unsupported algorithm
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Signature mismatch, or the declared algorithm is not allowed.
    ///
    /// Both causes report the same variant.
    #[error("Invalid JWT signature")]
    InvalidSignature,

    /// Claim validation failed
    #[error("Invalid claim: {0}")]
    InvalidClaim(#[from] ClaimError),
}

impl JwtError {
    /// Category of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            JwtError::InvalidToken(_)
            | JwtError::UnrecognizedExtension(_)
            | JwtError::MissingExtension(_)
            | JwtError::InvalidKey(_)
            | JwtError::TimeSpan(_) => ErrorKind::MalformedToken,
            JwtError::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            JwtError::InvalidSignature => ErrorKind::InvalidSignature,
            JwtError::InvalidClaim(_) => ErrorKind::InvalidClaim,
        }
    }

    /// Create an invalid token error
    #[inline]
    #[must_use]
    pub fn invalid_token(msg: &str) -> Self {
        JwtError::InvalidToken(msg.to_string())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: &str) -> Self {
        JwtError::InvalidKey(msg.to_string())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        JwtError::UnsupportedAlgorithm(alg.to_string())
    }

    /// The claim failure, if this is a claim error
    #[must_use]
    pub fn claim_error(&self) -> Option<&ClaimError> {
        match self {
            JwtError::InvalidClaim(err) => Some(err),
            _ => None,
        }
    }
}

/// Which standard claim check failed, and why
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// Claim is required but absent
    #[error("Claim '{0}' is required")]
    Missing(&'static str),

    /// Claim is present with the wrong JSON type
    #[error("Claim '{claim}' must be {expected}")]
    WrongType {
        /// Claim name
        claim: &'static str,
        /// Human-readable expected shape
        expected: &'static str,
    },

    /// Claim does not match the configured expectation
    #[error("Claim '{0}' does not match expected value")]
    Mismatch(&'static str),

    /// Configured expectation list for a claim is empty
    #[error("Claim '{0}' expected values must not be empty")]
    EmptyExpectation(&'static str),

    /// Header `typ` is absent or does not match
    #[error("Header 'typ' does not match expected value")]
    TypMismatch,

    /// `now >= exp + leeway`
    #[error("Token has expired")]
    Expired,

    /// `now < nbf - leeway`
    #[error("Token is not yet valid")]
    NotYetValid,

    /// Token age exceeds the configured maximum
    #[error("Token is too old")]
    TooOld,

    /// `iat` lies further in the future than the leeway allows
    #[error("Token was issued in the future")]
    IssuedInFuture,

    /// Leeway option could not be resolved
    #[error("Clock tolerance must be a number of seconds or a valid time span: {0}")]
    InvalidLeeway(String),

    /// Max token age option could not be resolved
    #[error("Max token age must be a number of seconds or a valid time span: {0}")]
    InvalidMaxAge(String),
}

impl ClaimError {
    /// Name of the claim this failure concerns, when there is one
    #[must_use]
    pub fn claim(&self) -> Option<&'static str> {
        match self {
            ClaimError::Missing(claim)
            | ClaimError::Mismatch(claim)
            | ClaimError::EmptyExpectation(claim)
            | ClaimError::WrongType { claim, .. } => Some(*claim),
            ClaimError::TypMismatch => Some("typ"),
            ClaimError::Expired => Some("exp"),
            ClaimError::NotYetValid => Some("nbf"),
            ClaimError::TooOld | ClaimError::IssuedInFuture => Some("iat"),
            ClaimError::InvalidLeeway(_) | ClaimError::InvalidMaxAge(_) => None,
        }
    }
}
