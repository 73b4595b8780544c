//! Typed claims and generator tests

use hmac_jwt::{Algorithm, Audience, Claims, ClaimsBuilder, ErrorKind, Generator, ValidationOptions};
use serde_json::json;

#[test]
fn test_claims_builder_optional_fields() {
    let claims = ClaimsBuilder::new().subject("test-user").build().unwrap();

    assert_eq!(claims.sub.as_deref(), Some("test-user"));
    assert!(claims.iss.is_none());
    assert!(claims.aud.is_none());
    assert!(claims.exp.is_none());
    assert!(claims.nbf.is_none());
    assert!(claims.iat.is_none());
    assert!(claims.jti.is_none());
    assert!(claims.extra.is_empty());
}

#[test]
fn test_claims_builder_relative_to_wall_clock() {
    let before = chrono::Utc::now().timestamp();
    let claims = Claims::builder()
        .expires_in(chrono::Duration::hours(2))
        .build()
        .unwrap();
    let exp = claims.exp.unwrap();
    assert!(exp >= before + 7200);
    assert!(exp <= chrono::Utc::now().timestamp() + 7200);
}

#[test]
fn test_claims_builder_span_error_kind() {
    let err = Claims::builder().not_before_in("eventually").build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedToken);
}

#[test]
fn test_generator_with_typed_claims() {
    let generator = Generator::new(Algorithm::HS256, "generator-secret-generator-secret")
        .with_validation_options(
            ValidationOptions::default()
                .with_now(1_700_000_100)
                .with_audience("api")
                .with_max_token_age("5 minutes"),
        );
    let claims = Claims::builder()
        .issuer("auth")
        .audience("api")
        .issued_at(1_700_000_000)
        .expires_in("10m")
        .claim("role", "admin")
        .build()
        .unwrap();

    let token = generator.token(&claims).unwrap();
    let back = Claims::from_payload(generator.verify(&token).unwrap()).unwrap();
    assert_eq!(back.aud, Some(Audience::One("api".into())));
    assert_eq!(back.extra.get("role"), Some(&json!("admin")));
    assert_eq!(back.exp, Some(1_700_000_600));
}

#[test]
fn test_generator_reports_claim_failures() {
    let generator = Generator::new(Algorithm::HS256, "generator-secret-generator-secret")
        .with_validation_options(ValidationOptions::default().with_now(1_800_000_000));
    let claims = Claims::builder().expires_at(1_700_000_000).build().unwrap();
    let token = generator.token(&claims).unwrap();
    assert_eq!(generator.verify(&token).unwrap_err().kind(), ErrorKind::InvalidClaim);
}
