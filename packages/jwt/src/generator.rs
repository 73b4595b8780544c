//! JWT token generator with validation support.

use crate::{
    algorithms::Algorithm,
    codec::JsonObject,
    error::JwtResult,
    keys::SecretKey,
    operations,
    token,
    validation::ValidationOptions,
};
use serde::Serialize;
use std::sync::Arc;

/// Core JWT generator.
///
/// Binds one algorithm and one key. Tokens it verifies must carry the same
/// `alg`; anything else is refused as an invalid signature.
#[derive(Debug, Clone)]
pub struct Generator {
    algorithm: Algorithm,
    key: Arc<SecretKey>,
    headers: Option<JsonObject>,
    validation_options: ValidationOptions,
}

impl Generator {
    /// Create a new generator for the given algorithm and key.
    ///
    /// A key shorter than the digest is logged here once, not per token.
    pub fn new(algorithm: Algorithm, key: impl Into<SecretKey>) -> Self {
        let key = key.into();
        key.warn_if_short(algorithm);
        Self {
            algorithm,
            key: Arc::new(key),
            headers: None,
            validation_options: ValidationOptions::default(),
        }
    }

    /// Extra header parameters added to every token.
    #[must_use]
    pub fn with_headers(mut self, headers: JsonObject) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Set custom validation options.
    #[must_use]
    pub fn with_validation_options(mut self, options: ValidationOptions) -> Self {
        self.validation_options = options;
        self
    }

    /// Get a reference to the validation options.
    pub fn validation_options(&self) -> &ValidationOptions {
        &self.validation_options
    }

    /// Signing algorithm
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Generate a JWT token with the given claims.
    pub fn token<P: Serialize + ?Sized>(&self, claims: &P) -> JwtResult<String> {
        token::sign(
            claims,
            &self.key,
            self.algorithm.as_str(),
            self.headers.as_ref(),
        )
        .map(|(token, _)| token)
    }

    /// Verify a JWT token and return its payload if valid.
    pub fn verify(&self, token: &str) -> JwtResult<JsonObject> {
        let allowed = [self.algorithm.as_str()];
        operations::verify(
            token,
            &self.key,
            Some(&allowed[..]),
            &self.validation_options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::JwtError, types::Claims};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::{
        layer::{Context, SubscriberExt},
        Layer,
    };

    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_warnings(f: impl FnOnce()) -> usize {
        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        tracing::subscriber::with_default(subscriber, f);
        counter.0.load(Ordering::SeqCst)
    }

    #[test]
    fn test_generate_and_verify() {
        let key = "0123456789abcdef0123456789abcdef0123456789abcdef";
        let generator = Generator::new(Algorithm::HS384, key)
            .with_validation_options(ValidationOptions::default().with_now(1_700_000_000));
        let claims = Claims::builder()
            .subject("user-1")
            .issued_at(1_700_000_000)
            .expires_in("1h")
            .build()
            .unwrap();

        let token = generator.token(&claims).unwrap();
        let payload = generator.verify(&token).unwrap();
        assert_eq!(Claims::from_payload(payload).unwrap(), claims);
    }

    #[test]
    fn test_rejects_other_algorithm() {
        let key = "shared-secret-shared-secret-shared-secret-shared-secret-1234";
        let hs256 = Generator::new(Algorithm::HS256, key);
        let hs512 = Generator::new(Algorithm::HS512, key);
        let token = hs512.token(&json!({"sub": "x"})).unwrap();
        assert_eq!(hs256.verify(&token), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_extra_headers() {
        let mut headers = JsonObject::new();
        headers.insert("kid".into(), json!("key-1"));
        let generator = Generator::new(Algorithm::HS256, "secret").with_headers(headers);
        let token = generator.token(&json!({})).unwrap();
        let decoded = operations::decode(&token).unwrap();
        assert_eq!(decoded.header.get("kid"), Some(&json!("key-1")));
    }

    #[test]
    fn test_short_key_warns_once() {
        let warnings = count_warnings(|| {
            let generator = Generator::new(Algorithm::HS256, "short");
            for n in 0..3 {
                generator.token(&json!({"n": n})).unwrap();
            }
        });
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_long_key_does_not_warn() {
        let warnings = count_warnings(|| {
            let generator = Generator::new(Algorithm::HS256, [9u8; 32].as_slice());
            generator.token(&json!({})).unwrap();
        });
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_free_encode_warns_per_call() {
        let key = SecretKey::from("short");
        let warnings = count_warnings(|| {
            for _ in 0..2 {
                operations::encode(&json!({}), &key, "HS256", None).unwrap();
            }
        });
        assert_eq!(warnings, 2);
    }
}
