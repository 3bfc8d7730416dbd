//! End-to-end verification scenarios over decoded claim sets

use chrono::{Duration, TimeZone, Utc};
use cryypt_jwt_verify::*;
use serde_json::json;

const NOW: i64 = 1_700_000_000;

fn require() -> VerificationBuilder {
    let mut builder = Jwt::require();
    builder.with_clock(FixedClock::at_timestamp(NOW));
    builder
}

#[test]
fn test_identity_provider_token_passes() {
    let mut builder = require();
    builder
        .with_issuer(["https://idp"])
        .with_audience(["api1"])
        .accept_leeway(5)
        .expect("valid leeway");
    let verifier = builder.build();

    let token = json!({
        "iss": "https://idp",
        "sub": "u1",
        "aud": ["api1", "api2"],
        "exp": NOW + 60,
        "iat": NOW - 10,
    });
    assert_eq!(verifier.verify(&token), Ok(()));

    let token = json!({
        "iss": "https://idp",
        "sub": "u1",
        "aud": ["api2"],
        "exp": NOW + 60,
        "iat": NOW - 10,
    });
    assert_eq!(
        verifier.verify(&token),
        Err(VerificationError::AudienceMismatch)
    );
}

#[test]
fn test_expired_beyond_leeway() {
    let mut builder = require();
    builder.accept_leeway(30).expect("valid leeway");
    let verifier = builder.build();

    assert_eq!(
        verifier.verify(&json!({ "exp": NOW - 100 })),
        Err(VerificationError::TokenExpired)
    );
    assert_eq!(verifier.verify(&json!({ "exp": NOW - 30 })), Ok(()));
    assert_eq!(
        verifier.verify(&json!({ "exp": NOW - 31 })),
        Err(VerificationError::TokenExpired)
    );
}

#[test]
fn test_expires_at_override_applies_to_exp_only() {
    let mut builder = require();
    builder
        .accept_leeway(5)
        .and_then(|b| b.accept_expires_at(120))
        .expect("valid leeway");
    let verifier = builder.build();

    assert_eq!(verifier.verify(&json!({ "exp": NOW - 100 })), Ok(()));
    assert_eq!(
        verifier.verify(&json!({ "nbf": NOW + 100 })),
        Err(VerificationError::TokenNotYetValid)
    );
    assert_eq!(verifier.verify(&json!({ "nbf": NOW + 5 })), Ok(()));
}

#[test]
fn test_not_before_and_issued_at_windows() {
    let mut builder = require();
    builder
        .accept_not_before(10)
        .and_then(|b| b.accept_issued_at(20))
        .expect("valid leeway");
    let verifier = builder.build();

    assert_eq!(verifier.verify(&json!({ "nbf": NOW + 10 })), Ok(()));
    assert_eq!(
        verifier.verify(&json!({ "nbf": NOW + 11 })),
        Err(VerificationError::TokenNotYetValid)
    );
    assert_eq!(verifier.verify(&json!({ "iat": NOW + 20 })), Ok(()));
    assert_eq!(
        verifier.verify(&json!({ "iat": NOW + 21 })),
        Err(VerificationError::IssuedAtInFuture)
    );
}

#[test]
fn test_ignore_issued_at_makes_iat_leeway_inert() {
    let mut builder = require();
    builder
        .accept_issued_at(0)
        .expect("valid leeway")
        .ignore_issued_at();
    let verifier = builder.build();

    assert_eq!(verifier.verify(&json!({ "iat": NOW + 3_600 })), Ok(()));
    assert_eq!(verifier.verify(&json!({ "iat": "not a date" })), Ok(()));
}

#[test]
fn test_absent_time_claims_always_pass() {
    let mut builder = require();
    builder.accept_leeway(0).expect("valid leeway");
    let verifier = builder.build();

    assert_eq!(verifier.verify(&json!({})), Ok(()));
    assert!(verifier.verify_all(&json!({ "sub": "u1" })).is_empty());
}

#[test]
fn test_last_audience_rule_wins() {
    let mut builder = require();
    builder
        .with_audience(["a", "b"])
        .with_any_of_audience(["a"]);
    let verifier = builder.build();

    assert_eq!(verifier.verify(&json!({ "aud": ["a"] })), Ok(()));
    assert_eq!(
        verifier.verify(&json!({ "aud": ["b"] })),
        Err(VerificationError::AudienceMismatch)
    );

    builder.with_audience(["a", "b"]);
    let verifier = builder.build();
    assert_eq!(
        verifier.verify(&json!({ "aud": ["a"] })),
        Err(VerificationError::AudienceMismatch)
    );
    assert_eq!(verifier.verify(&json!({ "aud": ["b", "c", "a"] })), Ok(()));
}

#[test]
fn test_missing_audience_fails_both_rules() {
    let mut builder = require();
    builder.with_any_of_audience(["a"]);
    assert_eq!(
        builder.build().verify(&json!({})),
        Err(VerificationError::AudienceMismatch)
    );

    builder.with_audience(Vec::<String>::new());
    assert_eq!(
        builder.build().verify(&json!({})),
        Err(VerificationError::AudienceMismatch)
    );
    assert_eq!(builder.build().verify(&json!({ "aud": [] })), Ok(()));
}

#[test]
fn test_array_claim_contains_all_items() {
    let mut builder = require();
    builder
        .with_array_claim("roles", ["admin", "ops"])
        .expect("valid name");
    let verifier = builder.build();

    assert_eq!(
        verifier.verify(&json!({ "roles": ["viewer", "ops", "admin"] })),
        Ok(())
    );
    assert_eq!(
        verifier.verify(&json!({})),
        Err(VerificationError::missing_claim("roles"))
    );
    assert_eq!(
        verifier.verify(&json!({ "roles": ["admin"] })),
        Err(VerificationError::array_claim_mismatch("roles"))
    );
    assert_eq!(
        verifier.verify(&json!({ "roles": "admin ops" })),
        Err(VerificationError::type_mismatch("roles"))
    );
}

#[test]
fn test_numeric_array_claims() {
    let mut builder = require();
    builder
        .with_array_claim("groups", [7_i32, 9])
        .and_then(|b| b.with_array_claim("accounts", [5_000_000_000_i64]))
        .expect("valid names");
    let verifier = builder.build();

    let token = json!({ "groups": [9, 8, 7], "accounts": [5_000_000_000_i64] });
    assert_eq!(verifier.verify(&token), Ok(()));

    let token = json!({ "groups": ["7", "9"], "accounts": [5_000_000_000_i64] });
    assert_eq!(
        verifier.verify(&token),
        Err(VerificationError::array_claim_mismatch("groups"))
    );
}

#[test]
fn test_typed_claim_equality() {
    let issued = Utc.timestamp_opt(NOW - 60, 0).single().expect("instant");
    let mut builder = require();
    builder
        .with_claim("admin", true)
        .and_then(|b| b.with_claim("level", 3_i32))
        .and_then(|b| b.with_claim("account", 5_000_000_000_i64))
        .and_then(|b| b.with_claim("ratio", 0.25))
        .and_then(|b| b.with_claim("org", "acme"))
        .and_then(|b| b.with_claim("auth_time", issued))
        .expect("valid names");
    let verifier = builder.build();

    let token = json!({
        "admin": true,
        "level": 3,
        "account": 5_000_000_000_i64,
        "ratio": 0.25,
        "org": "acme",
        "auth_time": NOW - 60,
    });
    assert_eq!(verifier.verify(&token), Ok(()));

    let mut wrong_type = token.clone();
    wrong_type["admin"] = json!("true");
    assert_eq!(
        verifier.verify(&wrong_type),
        Err(VerificationError::claim_mismatch("admin"))
    );

    let mut later = token.clone();
    later["auth_time"] = json!(NOW);
    assert_eq!(
        verifier.verify(&later),
        Err(VerificationError::claim_mismatch("auth_time"))
    );

    let mut missing = token;
    missing.as_object_mut().expect("object").remove("org");
    assert_eq!(
        verifier.verify(&missing),
        Err(VerificationError::missing_claim("org"))
    );
}

#[test]
fn test_presence_accepts_null() {
    let mut builder = require();
    builder.with_claim_presence("nickname").expect("valid name");
    let verifier = builder.build();

    assert_eq!(verifier.verify(&json!({ "nickname": null })), Ok(()));
    assert_eq!(
        verifier.verify(&json!({})),
        Err(VerificationError::missing_claim("nickname"))
    );
}

#[test]
fn test_presence_accepts_null_registered_claim_in_claims() {
    let mut builder = require();
    builder.with_claim_presence("sub").expect("valid name");
    let verifier = builder.build();

    let payload = json!({ "sub": null });
    let claims: Claims = serde_json::from_value(payload.clone()).expect("claims");
    assert_eq!(verifier.verify(&payload), Ok(()));
    assert_eq!(verifier.verify(&claims), Ok(()));
    assert_eq!(
        verifier.verify(&Claims::default()),
        Err(VerificationError::missing_claim("sub"))
    );
}

#[test]
fn test_requirements_on_same_claim_are_conjunctive() {
    let mut builder = require();
    builder
        .with_claim("org", "acme")
        .and_then(|b| b.with_claim("org", "globex"))
        .expect("valid names");
    let verifier = builder.build();

    assert_eq!(
        verifier.verify(&json!({ "org": "acme" })),
        Err(VerificationError::claim_mismatch("org"))
    );
    assert_eq!(verifier.requirements().count(), 2);
}

#[test]
fn test_subject_and_jwt_id_mismatch_report_claim() {
    let mut builder = require();
    builder.with_subject("u1").with_jwt_id("token-1");
    let verifier = builder.build();

    assert_eq!(
        verifier.verify(&json!({ "jti": "token-1" })),
        Err(VerificationError::claim_mismatch("sub"))
    );
    assert_eq!(
        verifier.verify(&json!({ "sub": "u1", "jti": "token-2" })),
        Err(VerificationError::claim_mismatch("jti"))
    );
    assert_eq!(
        verifier.verify(&json!({ "sub": "U1", "jti": "token-1" })),
        Err(VerificationError::claim_mismatch("sub"))
    );
}

#[test]
fn test_issuer_is_one_of_a_set() {
    let mut builder = require();
    builder.with_issuer(["https://a", "https://b"]);
    let verifier = builder.build();

    assert_eq!(verifier.verify(&json!({ "iss": "https://b" })), Ok(()));
    assert_eq!(
        verifier.verify(&json!({ "iss": "https://B" })),
        Err(VerificationError::IssuerMismatch)
    );
    assert_eq!(
        verifier.verify(&json!({ "iss": 42 })),
        Err(VerificationError::IssuerMismatch)
    );
}

#[test]
fn test_typed_claims_struct_is_a_decoded_token() {
    let now = Utc.timestamp_opt(NOW, 0).single().expect("instant");
    let claims = ClaimsBuilder::new()
        .with_issuer("https://idp")
        .with_subject("u1")
        .with_audience(&["api1"])
        .expires_in(now, Duration::minutes(5))
        .with_issued_at(NOW)
        .with_generated_jwt_id()
        .with_claim("roles", json!(["admin", "ops"]))
        .build();

    let mut builder = require();
    builder
        .with_issuer(["https://idp"])
        .with_subject("u1")
        .with_any_of_audience(["api1", "api9"])
        .with_array_claim("roles", ["ops"])
        .and_then(|b| b.with_claim_presence("jti"))
        .expect("valid names");

    assert_eq!(builder.build().verify(&claims), Ok(()));
}

#[test]
fn test_verify_all_reports_every_failure_in_order() {
    let mut builder = require();
    builder
        .with_issuer(["https://idp"])
        .with_any_of_audience(["api1"])
        .with_claim_presence("tenant")
        .expect("valid name");
    let verifier = builder.build();

    let token = json!({ "iss": "https://idp", "exp": NOW - 1, "nbf": NOW + 1 });
    assert_eq!(
        verifier.verify_all(&token),
        vec![
            VerificationError::AudienceMismatch,
            VerificationError::TokenExpired,
            VerificationError::TokenNotYetValid,
            VerificationError::missing_claim("tenant"),
        ]
    );
    assert_eq!(
        verifier.verify(&token),
        Err(VerificationError::AudienceMismatch)
    );
}

#[test]
fn test_registered_claims_set_by_name_are_checked() {
    let claims = ClaimsBuilder::new()
        .with_claim("exp", json!(NOW - 10_000))
        .with_claim("iss", json!("https://evil"))
        .build();
    let payload = serde_json::to_value(&claims).expect("serialize");

    let verifier = require().build();
    assert_eq!(verifier.verify(&claims), Err(VerificationError::TokenExpired));
    assert_eq!(verifier.verify(&payload), Err(VerificationError::TokenExpired));

    let mut builder = require();
    builder.with_issuer(["https://idp"]);
    let verifier = builder.build();
    assert_eq!(verifier.verify(&claims), Err(VerificationError::IssuerMismatch));

    let mut builder = require();
    builder.with_claim_presence("iss").expect("valid name");
    assert_eq!(
        builder.build().verify_all(&claims),
        vec![VerificationError::TokenExpired]
    );
}

#[test]
fn test_claims_time_checks_match_json_view() {
    let payloads = [
        json!({ "exp": NOW as f64 - 0.5 }),
        json!({ "nbf": NOW as f64 + 1.5 }),
        json!({ "iat": "yesterday" }),
        json!({ "exp": null, "nbf": NOW }),
    ];
    let verifier = require().build();

    for payload in payloads {
        let claims: Claims = serde_json::from_value(payload.clone()).expect("claims");
        assert_eq!(verifier.verify(&claims), verifier.verify(&payload), "{payload}");
    }
    assert_eq!(
        verifier.verify(&json!({ "iat": "yesterday" })),
        Err(VerificationError::type_mismatch("iat"))
    );
}
