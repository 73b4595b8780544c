//! Algorithm registry
//!
//! The registry is closed: every supported identifier is a variant of
//! [`Algorithm`], and lookup never consults anything a token can supply
//! beyond the identifier string itself.

use crate::error::{JwtError, JwtResult};
use hmac::{digest::KeyInit, Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use std::{collections::BTreeSet, fmt, str::FromStr};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// Supported signing algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
}

impl Algorithm {
    /// Every registered algorithm
    pub const ALL: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

    /// Look up an algorithm by its `alg` identifier
    pub fn from_name(name: &str) -> JwtResult<Self> {
        match name {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            _ => Err(JwtError::unsupported_algorithm(name)),
        }
    }

    /// `alg` header identifier
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
        }
    }

    /// Key length matching the digest size. Shorter keys still work.
    #[must_use]
    pub const fn recommended_key_len(&self) -> usize {
        match self {
            Algorithm::HS256 => 32,
            Algorithm::HS384 => 48,
            Algorithm::HS512 => 64,
        }
    }

    /// Compute the signature of `message` under `key`
    pub fn sign(&self, key: &[u8], message: &[u8]) -> JwtResult<Vec<u8>> {
        match self {
            Algorithm::HS256 => mac::<HmacSha256>(key, message),
            Algorithm::HS384 => mac::<HmacSha384>(key, message),
            Algorithm::HS512 => mac::<HmacSha512>(key, message),
        }
    }

    /// Check `signature` against a freshly computed one in constant time
    pub fn verify(&self, key: &[u8], message: &[u8], signature: &[u8]) -> JwtResult<()> {
        let expected = self.sign(key, message)?;
        if bool::from(expected.as_slice().ct_eq(signature)) {
            Ok(())
        } else {
            Err(JwtError::InvalidSignature)
        }
    }
}

fn mac<M: Mac + KeyInit>(key: &[u8], message: &[u8]) -> JwtResult<Vec<u8>> {
    let mut mac = <M as KeyInit>::new_from_slice(key)
        .map_err(|_| JwtError::invalid_key("Invalid HMAC key"))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl FromStr for Algorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::from_name(s)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Algorithm {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Identifiers of every supported algorithm
#[must_use]
pub fn list_algorithms() -> BTreeSet<&'static str> {
    Algorithm::ALL.iter().map(Algorithm::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // RFC 4231 test case 2
    const KEY: &[u8] = b"Jefe";
    const DATA: &[u8] = b"what do ya want for nothing?";

    #[test]
    fn test_rfc4231_vectors() {
        assert_eq!(
            Algorithm::HS256.sign(KEY, DATA).unwrap(),
            hex!("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
        );
        assert_eq!(
            Algorithm::HS384.sign(KEY, DATA).unwrap(),
            hex!(
                "af45d2e376484031617f78d2b58a6b1b9c7ef464f5a01b47e42ec3736322445e"
                "8e2240ca5e69e2c78b3239ecfab21649"
            )
        );
        assert_eq!(
            Algorithm::HS512.sign(KEY, DATA).unwrap(),
            hex!(
                "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554"
                "9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
            )
        );
    }

    #[test]
    fn test_verify() {
        for alg in Algorithm::ALL {
            let sig = alg.sign(b"secret", b"message").unwrap();
            assert_eq!(sig.len(), alg.recommended_key_len());
            assert!(alg.verify(b"secret", b"message", &sig).is_ok());
            assert_eq!(
                alg.verify(b"other", b"message", &sig),
                Err(JwtError::InvalidSignature)
            );
            assert_eq!(
                alg.verify(b"secret", b"message", &sig[..sig.len() - 1]),
                Err(JwtError::InvalidSignature)
            );
            assert_eq!(
                alg.verify(b"secret", b"message", &[]),
                Err(JwtError::InvalidSignature)
            );
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Algorithm::from_name("HS384"), Ok(Algorithm::HS384));
        assert_eq!("HS512".parse::<Algorithm>(), Ok(Algorithm::HS512));
        for name in ["none", "hs256", "RS256", "ES256", ""] {
            assert_eq!(
                Algorithm::from_name(name),
                Err(JwtError::UnsupportedAlgorithm(name.to_string()))
            );
        }
    }

    #[test]
    fn test_list_algorithms() {
        let names: Vec<_> = list_algorithms().into_iter().collect();
        assert_eq!(names, vec!["HS256", "HS384", "HS512"]);
    }
}
