//! Error types for claim verification
//!
//! Two families: [`InvalidArgument`] is returned by the builder when a
//! configuration call is rejected, [`VerificationError`] is returned by
//! [`crate::Verifier::verify`] for the first requirement a token fails.

use thiserror::Error;

/// Result of a builder configuration call
pub type ConfigResult<T> = Result<T, InvalidArgument>;

/// Result of verifying a token against a [`crate::Verifier`]
pub type VerifyResult = Result<(), VerificationError>;

/// Configuration error raised synchronously by the builder
///
/// The rejected call leaves the builder unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    /// Claim name was empty
    #[error("claim name must not be empty")]
    EmptyClaimName,
    /// Leeway was negative
    #[error("leeway must be a non-negative number of seconds, got {0}")]
    NegativeLeeway(i64),
    /// Declarative option held a claim value with no typed equivalent
    #[error("unsupported value for claim '{0}'")]
    UnsupportedClaimValue(String),
}

/// Verification failure for a single requirement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The "iss" claim is absent or not one of the accepted issuers
    #[error("issuer is not accepted")]
    IssuerMismatch,
    /// The "aud" claim does not satisfy the configured audience rule
    #[error("audience does not match")]
    AudienceMismatch,
    /// Claim is present (or required) but holds a different value
    #[error("claim '{0}' does not match the expected value")]
    ClaimMismatch(String),
    /// Required claim is absent
    #[error("missing required claim: {0}")]
    MissingClaim(String),
    /// Claim holds a value of the wrong shape
    #[error("claim '{0}' has an unexpected type")]
    TypeMismatch(String),
    /// Array claim lacks one or more required items
    #[error("array claim '{0}' does not contain the required items")]
    ArrayClaimMismatch(String),
    /// The "exp" claim is in the past beyond the leeway
    #[error("token has expired")]
    TokenExpired,
    /// The "nbf" claim is in the future beyond the leeway
    #[error("token is not yet valid")]
    TokenNotYetValid,
    /// The "iat" claim is in the future beyond the leeway
    #[error("token was issued in the future")]
    IssuedAtInFuture,
}

impl VerificationError {
    /// Create a claim mismatch error
    #[inline]
    #[must_use]
    pub fn claim_mismatch(claim: &str) -> Self {
        VerificationError::ClaimMismatch(claim.to_string())
    }

    /// Create a missing claim error
    #[inline]
    #[must_use]
    pub fn missing_claim(claim: &str) -> Self {
        VerificationError::MissingClaim(claim.to_string())
    }

    /// Create a type mismatch error
    #[inline]
    #[must_use]
    pub fn type_mismatch(claim: &str) -> Self {
        VerificationError::TypeMismatch(claim.to_string())
    }

    /// Create an array claim mismatch error
    #[inline]
    #[must_use]
    pub fn array_claim_mismatch(claim: &str) -> Self {
        VerificationError::ArrayClaimMismatch(claim.to_string())
    }

    /// Name of the claim this failure concerns
    #[must_use]
    pub fn claim_name(&self) -> &str {
        match self {
            VerificationError::IssuerMismatch => "iss",
            VerificationError::AudienceMismatch => "aud",
            VerificationError::TokenExpired => "exp",
            VerificationError::TokenNotYetValid => "nbf",
            VerificationError::IssuedAtInFuture => "iat",
            VerificationError::ClaimMismatch(name)
            | VerificationError::MissingClaim(name)
            | VerificationError::TypeMismatch(name)
            | VerificationError::ArrayClaimMismatch(name) => name,
        }
    }
}
