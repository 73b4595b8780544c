//! Property tests for the token codec and verifier

use hmac_jwt::{encode, verify, Algorithm, ErrorKind, SecretKey, ValidationOptions};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

const REGISTERED: [&str; 7] = ["exp", "nbf", "iat", "iss", "sub", "aud", "jti"];

fn algorithm() -> impl Strategy<Value = Algorithm> {
    prop::sample::select(Algorithm::ALL.to_vec())
}

fn payload() -> impl Strategy<Value = Map<String, Value>> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 _.-]{0,24}".prop_map(Value::from),
    ];
    prop::collection::btree_map("[a-z_]{1,8}", leaf, 0..8).prop_map(|entries| {
        entries
            .into_iter()
            // keep registered claim names out so no time or type checks apply
            .filter(|(k, _)| !REGISTERED.contains(&k.as_str()))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_round_trip(
        alg in algorithm(),
        key in prop::collection::vec(any::<u8>(), 1..96),
        payload in payload(),
    ) {
        let key = SecretKey::from_bytes(key);
        let token = encode(&payload, &key, alg.as_str(), None).unwrap();
        let options = ValidationOptions::default();
        let verified = verify(&token, &key, Some(&[alg.as_str()]), &options).unwrap();
        prop_assert_eq!(verified, payload);
    }

    #[test]
    fn prop_single_bit_tamper_is_rejected(
        alg in algorithm(),
        payload in payload(),
        position in any::<prop::sample::Index>(),
        bit in 0u8..7,
    ) {
        let key = SecretKey::from("tamper-test-key-tamper-test-key!");
        let token = encode(&payload, &key, alg.as_str(), None).unwrap();

        let mut bytes = token.into_bytes();
        let i = position.index(bytes.len());
        bytes[i] ^= 1 << bit;
        // flipping one of the low seven bits keeps the text ASCII
        let tampered = String::from_utf8(bytes).unwrap();

        // a corrupted `alg` must stop at the allow-list, never reach the registry
        let options = ValidationOptions::default();
        let err = verify(&tampered, &key, Some(&[alg.as_str()]), &options).unwrap_err();
        prop_assert!(
            matches!(err.kind(), ErrorKind::MalformedToken | ErrorKind::InvalidSignature),
            "unexpected error {:?}",
            err
        );
    }

    #[test]
    fn prop_wrong_key_is_rejected(
        alg in algorithm(),
        // non-zero bytes: HMAC pads short keys with zeros, so [1] and [1, 0] are the same key
        a in prop::collection::vec(1u8.., 1..64),
        b in prop::collection::vec(1u8.., 1..64),
    ) {
        prop_assume!(a != b);
        let payload = json!({"k": 1});
        let token = encode(&payload, &SecretKey::from_bytes(a), alg.as_str(), None).unwrap();
        let options = ValidationOptions::default();
        let err = verify(&token, &SecretKey::from_bytes(b), None, &options).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidSignature);
    }
}

#[test]
fn test_every_bit_flip_of_an_hs256_token_is_rejected() {
    let key = SecretKey::from("exhaustive-flip-key-exhaustive-01");
    let token = encode(&json!({"sub": "user-123", "n": 7}), &key, "HS256", None).unwrap();
    let options = ValidationOptions::default();

    for i in 0..token.len() {
        for bit in 0..7 {
            let mut bytes = token.clone().into_bytes();
            bytes[i] ^= 1 << bit;
            let tampered = String::from_utf8(bytes).unwrap();
            let err = verify(&tampered, &key, Some(&["HS256"]), &options).unwrap_err();
            assert!(
                matches!(err.kind(), ErrorKind::MalformedToken | ErrorKind::InvalidSignature),
                "flip {i}:{bit} gave {err:?}"
            );
        }
    }
}
