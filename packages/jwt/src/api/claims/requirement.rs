//! Claim requirements collected by the builder

use super::value::{ArrayItem, ClaimValue};
use crate::types::{Claim, DecodedToken};
use std::fmt;
use std::sync::Arc;

/// Type alias for custom claim predicates
type PredicateFn = dyn Fn(&Claim<'_>, &dyn DecodedToken) -> bool + Send + Sync;

/// Caller-supplied check over a single claim and the whole token
#[derive(Clone)]
pub struct ClaimPredicate(Arc<PredicateFn>);

impl ClaimPredicate {
    /// Wrap a predicate
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Claim<'_>, &dyn DecodedToken) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    pub(crate) fn test(&self, claim: &Claim<'_>, token: &dyn DecodedToken) -> bool {
        (self.0)(claim, token)
    }
}

impl fmt::Debug for ClaimPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClaimPredicate(..)")
    }
}

/// One constraint a token must satisfy
#[derive(Debug, Clone)]
pub enum ClaimRequirement {
    /// "iss" equals one of the values
    IssuerIn(Vec<String>),
    /// "sub" equals the value
    Subject(String),
    /// "aud" contains every value
    AudienceAll(Vec<String>),
    /// "aud" contains at least one value
    AudienceAny(Vec<String>),
    /// "jti" equals the value
    JwtId(String),
    /// Claim exists, with any value including null
    ClaimPresence(String),
    /// Claim exists and equals the typed value
    ClaimEquals(String, ClaimValue),
    /// Claim is an array containing every item
    ArrayClaimContains(String, Vec<ArrayItem>),
    /// Claim exists and satisfies the predicate
    ClaimMatches(String, ClaimPredicate),
}

impl ClaimRequirement {
    /// Name of the claim this requirement reads
    #[must_use]
    pub fn claim_name(&self) -> &str {
        match self {
            ClaimRequirement::IssuerIn(_) => "iss",
            ClaimRequirement::Subject(_) => "sub",
            ClaimRequirement::AudienceAll(_) | ClaimRequirement::AudienceAny(_) => "aud",
            ClaimRequirement::JwtId(_) => "jti",
            ClaimRequirement::ClaimPresence(name)
            | ClaimRequirement::ClaimEquals(name, _)
            | ClaimRequirement::ArrayClaimContains(name, _)
            | ClaimRequirement::ClaimMatches(name, _) => name,
        }
    }
}
