//! HMAC JSON Web Tokens
//!
//! Compact-serialized JWS tokens signed with HS256, HS384 or HS512:
//! - encode a JSON object payload with optional extra header parameters
//! - decode without verification
//! - verify signature, `crit` header and standard claims (`exp`, `nbf`,
//!   `iat`, `iss`, `sub`, `aud`, `jti`, `typ`) with leeway and maximum age
//! - human-readable time spans such as `"2 hours ago"` for leeway and ages
//!
//! ```
//! use hmac_jwt::{encode, verify, SecretKey, ValidationOptions};
//! use serde_json::json;
//!
//! let key = SecretKey::from("secret");
//! let token = encode(&json!({"sub": "user-123", "exp": 1_800_000_000}), &key, "HS256", None)?;
//! let options = ValidationOptions::default().with_now(1_700_000_000);
//! let payload = verify(&token, &key, Some(&["HS256"]), &options)?;
//! assert_eq!(payload["sub"], "user-123");
//! # Ok::<(), hmac_jwt::JwtError>(())
//! ```

mod algorithms;
mod claims;
pub mod codec;
mod crit;
mod error;
mod generator;
mod keys;
mod operations;
pub mod timespan;
mod token;
mod types;
mod validation;

pub use algorithms::{list_algorithms, Algorithm};
pub use claims::validate_standard_claims;
pub use codec::JsonObject;
pub use crit::{validate_crit, RECOGNIZED_EXTENSIONS};
pub use error::*;
pub use generator::Generator;
pub use keys::SecretKey;
pub use operations::{decode, encode, verify};
pub use timespan::{TimeSpan, TimeSpanError};
pub use token::DecodedToken;
pub use types::*;
pub use validation::{OneOrMany, RegisteredClaim, ValidationOptions};
