// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication tests.
//!
//! These tests verify that JWT tokens created by the login flow can be
//! decoded by the auth middleware, catching compatibility issues early.

use gameup::middleware::auth::{create_jwt, Claims};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

#[test]
fn test_jwt_roundtrip() {
    // A token created by the login flow must decode with the same Claims
    // structure and algorithm the middleware uses.
    let account_id = 42i64;

    let token = create_jwt(account_id, SIGNING_KEY).expect("Failed to create JWT");

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(&token, &key, &validation)
        .expect("Failed to decode JWT - check Claims struct compatibility");

    assert_eq!(token_data.claims.sub, account_id.to_string());
    assert!(token_data.claims.exp > token_data.claims.iat);
}

#[test]
fn test_jwt_account_id_parsing() {
    // The sub claim must parse back to the account ID.
    let account_id = 987i64;
    let token = create_jwt(account_id, SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(&token, &key, &validation).unwrap();

    let parsed_id: i64 = token_data
        .claims
        .sub
        .parse()
        .expect("sub claim should be parseable as i64");

    assert_eq!(parsed_id, account_id);
}

#[test]
fn test_jwt_expires_in_24_hours() {
    use std::time::{SystemTime, UNIX_EPOCH};

    let token = create_jwt(1, SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false; // We'll check manually

    let token_data = decode::<Claims>(&token, &key, &validation).unwrap();

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    // Expiry should be 24 hours out, allowing a little test slack.
    assert!(token_data.claims.exp > now + 86400 - 60);
    assert!(token_data.claims.exp <= now + 86400 + 60);
}

#[test]
fn test_expired_jwt_is_rejected() {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;

    let claims = Claims {
        sub: "1".to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .unwrap();

    let key = DecodingKey::from_secret(SIGNING_KEY);
    let validation = Validation::new(Algorithm::HS256);

    assert!(decode::<Claims>(&token, &key, &validation).is_err());
}

#[test]
fn test_jwt_with_wrong_key_is_rejected() {
    let token = create_jwt(1, SIGNING_KEY).unwrap();

    let key = DecodingKey::from_secret(b"a_completely_different_key_here!");
    let validation = Validation::new(Algorithm::HS256);

    assert!(decode::<Claims>(&token, &key, &validation).is_err());
}
