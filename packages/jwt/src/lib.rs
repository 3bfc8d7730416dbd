//! JSON Web Token (JWT) claims verification
//!
//! This crate decides whether a decoded token's claim set satisfies a set of
//! requirements and reports the first one that fails:
//! - issuer, subject, audience (all-of or any-of) and JWT ID
//! - "exp", "nbf" and "iat" with a default leeway and per-claim overrides
//! - claim presence, typed equality, array containment and custom predicates
//!
//! Decoding and signature checks are left to the caller; any claim set that
//! implements [`DecodedToken`] can be verified.
//!
//! ```
//! use cryypt_jwt_verify::{FixedClock, Jwt, VerificationError};
//! use serde_json::json;
//!
//! let mut builder = Jwt::require();
//! builder
//!     .with_issuer(["https://idp"])
//!     .with_audience(["api1"])
//!     .with_clock(FixedClock::at_timestamp(1_700_000_000))
//!     .accept_leeway(5)?;
//! let verifier = builder.build();
//!
//! let token = json!({ "iss": "https://idp", "aud": ["api1", "api2"], "exp": 1_700_000_060 });
//! assert_eq!(verifier.verify(&token), Ok(()));
//!
//! let token = json!({ "iss": "https://idp", "aud": ["api2"] });
//! assert_eq!(verifier.verify(&token), Err(VerificationError::AudienceMismatch));
//! # Ok::<(), cryypt_jwt_verify::InvalidArgument>(())
//! ```

pub mod api;
mod clock;
mod error;
mod types;

pub use api::claims::{self, names};
pub use api::{
    ArrayItem, AudienceMode, ClaimPredicate, ClaimRequirement, ClaimValue, Claims,
    ClaimsBuilder, Jwt, LeewayConfig, TimeClaim, VerificationBuilder, VerificationOptions,
    Verifier,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::*;
pub use types::{Claim, DecodedToken};
