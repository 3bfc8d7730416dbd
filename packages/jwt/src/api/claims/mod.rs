//! Claim model - requirements, expected values and decoded claim sets

pub mod builder;
pub mod requirement;
pub mod standard_claims;
pub mod value;

pub use builder::ClaimsBuilder;
pub use requirement::{ClaimPredicate, ClaimRequirement};
pub use standard_claims::{Claims, names};
pub use value::{ArrayItem, ClaimValue};
