//! Claims Builder - fluent construction of decoded claim sets
//!
//! Produces [`Claims`] values to feed a [`crate::Verifier`], e.g. when a
//! token was decoded by another layer or when writing fixtures.

use super::standard_claims::{Claims, names};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Builder for [`Claims`]
#[derive(Debug, Clone, Default)]
pub struct ClaimsBuilder {
    claims: Claims,
}

impl ClaimsBuilder {
    /// Create new claims builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set issuer claim
    #[inline]
    #[must_use]
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.claims.insert(names::ISSUER, Value::from(issuer));
        self
    }

    /// Set subject claim
    #[inline]
    #[must_use]
    pub fn with_subject(mut self, subject: &str) -> Self {
        self.claims.insert(names::SUBJECT, Value::from(subject));
        self
    }

    /// Set audience claim
    #[inline]
    #[must_use]
    pub fn with_audience(mut self, audiences: &[&str]) -> Self {
        self.claims.insert(names::AUDIENCE, Value::from(audiences.to_vec()));
        self
    }

    /// Set expiration time (unix seconds)
    #[inline]
    #[must_use]
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.claims.insert(names::EXPIRES_AT, Value::from(exp));
        self
    }

    /// Set expiration time relative to `now`
    #[inline]
    #[must_use]
    pub fn expires_in(self, now: DateTime<Utc>, duration: Duration) -> Self {
        self.with_expiration((now + duration).timestamp())
    }

    /// Set not before time (unix seconds)
    #[inline]
    #[must_use]
    pub fn with_not_before(mut self, nbf: i64) -> Self {
        self.claims.insert(names::NOT_BEFORE, Value::from(nbf));
        self
    }

    /// Set issued at time (unix seconds)
    #[inline]
    #[must_use]
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.claims.insert(names::ISSUED_AT, Value::from(iat));
        self
    }

    /// Set JWT ID
    #[inline]
    #[must_use]
    pub fn with_jwt_id(mut self, jti: &str) -> Self {
        self.claims.insert(names::JWT_ID, Value::from(jti));
        self
    }

    /// Set a random (UUID v4) JWT ID
    #[inline]
    #[must_use]
    pub fn with_generated_jwt_id(mut self) -> Self {
        self.claims
            .insert(names::JWT_ID, Value::from(uuid::Uuid::new_v4().to_string()));
        self
    }

    /// Set a claim with any JSON value
    ///
    /// Registered names replace the value set by their typed setter.
    #[inline]
    #[must_use]
    pub fn with_claim(mut self, name: &str, value: Value) -> Self {
        self.claims.insert(name, value);
        self
    }

    /// Finish the claim set
    #[inline]
    #[must_use]
    pub fn build(self) -> Claims {
        self.claims
    }
}
