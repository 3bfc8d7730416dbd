//! Claim verification API
//!
//! Builder, verifier and supporting claim model, split into focused
//! submodules.

pub mod builder;
pub mod claims;
pub mod leeway;
pub mod options;
pub mod verifier;

pub use builder::{Jwt, VerificationBuilder};
pub use claims::{
    ArrayItem, ClaimPredicate, ClaimRequirement, ClaimValue, Claims, ClaimsBuilder,
};
pub use leeway::{LeewayConfig, TimeClaim};
pub use options::{AudienceMode, VerificationOptions};
pub use verifier::Verifier;
