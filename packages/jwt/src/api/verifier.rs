//! Claim Verifier - evaluates an immutable requirement set against tokens
//!
//! Requirements run in a fixed order so the reported failure is
//! deterministic: issuer, subject, audience, JWT ID, then "exp", "nbf" and
//! "iat", then the remaining claim requirements in the order they were added.

use super::builder::VerificationBuilder;
use super::claims::{ClaimRequirement, names};
use super::leeway::{LeewayConfig, TimeClaim};
use crate::clock::Clock;
use crate::error::{VerificationError, VerifyResult};
use crate::types::{Claim, DecodedToken};
use std::sync::Arc;
use tracing::{debug, trace};

/// Immutable, reusable set of claim requirements
///
/// A verifier holds no mutable state and may be shared across threads and
/// used for any number of concurrent [`Verifier::verify`] calls.
#[derive(Debug, Clone)]
pub struct Verifier {
    registered: Vec<ClaimRequirement>,
    leeway: LeewayConfig,
    claims: Vec<ClaimRequirement>,
    clock: Arc<dyn Clock>,
}

impl Verifier {
    pub(crate) fn new(
        registered: Vec<ClaimRequirement>,
        leeway: LeewayConfig,
        claims: Vec<ClaimRequirement>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registered,
            leeway,
            claims,
            clock,
        }
    }

    /// Start configuring a new verifier
    #[inline]
    #[must_use]
    pub fn builder() -> VerificationBuilder {
        VerificationBuilder::new()
    }

    /// Configured requirements in evaluation order (time claims excluded)
    pub fn requirements(&self) -> impl Iterator<Item = &ClaimRequirement> {
        self.registered.iter().chain(self.claims.iter())
    }

    /// Leeway applied to the time claims
    #[inline]
    #[must_use]
    pub fn leeway(&self) -> &LeewayConfig {
        &self.leeway
    }

    /// Check `token` against every requirement
    ///
    /// # Errors
    /// Returns the first failing requirement in evaluation order
    pub fn verify<T: DecodedToken>(&self, token: &T) -> VerifyResult {
        match self.checks(token).find_map(Result::err) {
            Some(error) => {
                debug!(claim = error.claim_name(), %error, "token failed claim verification");
                Err(error)
            }
            None => {
                trace!("token passed claim verification");
                Ok(())
            }
        }
    }

    /// Check `token` against every requirement and collect all failures
    ///
    /// Failures are reported in evaluation order; an empty list means the
    /// token passed.
    #[must_use]
    pub fn verify_all<T: DecodedToken>(&self, token: &T) -> Vec<VerificationError> {
        let failures: Vec<_> = self.checks(token).filter_map(Result::err).collect();
        if !failures.is_empty() {
            debug!(failures = failures.len(), "token failed claim verification");
        }
        failures
    }

    fn checks<'a>(
        &'a self,
        token: &'a dyn DecodedToken,
    ) -> impl Iterator<Item = VerifyResult> + 'a {
        let registered = self
            .registered
            .iter()
            .map(move |requirement| check_requirement(requirement, token));
        let time = TimeClaim::ALL
            .into_iter()
            .map(move |claim| self.check_time_claim(claim, token));
        let claims = self
            .claims
            .iter()
            .map(move |requirement| check_requirement(requirement, token));

        registered.chain(time).chain(claims)
    }

    fn check_time_claim(&self, claim: TimeClaim, token: &dyn DecodedToken) -> VerifyResult {
        if claim == TimeClaim::IssuedAt && self.leeway.ignores_issued_at() {
            return Ok(());
        }
        let Some(value) = token.claim(claim.name()).filter(|value| !value.is_null()) else {
            return Ok(());
        };
        let at = value
            .as_numeric_date()
            .ok_or_else(|| VerificationError::type_mismatch(claim.name()))?;

        let leeway = i64::try_from(self.leeway.leeway_for(claim)).unwrap_or(i64::MAX);
        let now = self.clock.now().timestamp();

        match claim {
            TimeClaim::ExpiresAt if at < now.saturating_sub(leeway) => {
                Err(VerificationError::TokenExpired)
            }
            TimeClaim::NotBefore if at > now.saturating_add(leeway) => {
                Err(VerificationError::TokenNotYetValid)
            }
            TimeClaim::IssuedAt if at > now.saturating_add(leeway) => {
                Err(VerificationError::IssuedAtInFuture)
            }
            _ => Ok(()),
        }
    }
}

fn check_requirement(requirement: &ClaimRequirement, token: &dyn DecodedToken) -> VerifyResult {
    match requirement {
        ClaimRequirement::IssuerIn(accepted) => {
            let issuer = token.claim(names::ISSUER);
            let is_accepted = issuer
                .as_ref()
                .and_then(Claim::as_str)
                .is_some_and(|issuer| accepted.iter().any(|value| value == issuer));
            ensure(is_accepted, || VerificationError::IssuerMismatch)
        }
        ClaimRequirement::Subject(expected) => check_exact(token, names::SUBJECT, expected),
        ClaimRequirement::JwtId(expected) => check_exact(token, names::JWT_ID, expected),
        ClaimRequirement::AudienceAll(required) => check_audience(token, |audience| {
            required
                .iter()
                .all(|value| audience.contains(&value.as_str()))
        }),
        ClaimRequirement::AudienceAny(accepted) => check_audience(token, |audience| {
            accepted
                .iter()
                .any(|value| audience.contains(&value.as_str()))
        }),
        ClaimRequirement::ClaimPresence(name) => {
            ensure(token.has_claim(name), || VerificationError::missing_claim(name))
        }
        ClaimRequirement::ClaimEquals(name, expected) => {
            let claim = require_claim(token, name)?;
            ensure(expected.matches(&claim), || {
                VerificationError::claim_mismatch(name)
            })
        }
        ClaimRequirement::ArrayClaimContains(name, items) => {
            let claim = require_claim(token, name)?;
            let elements = claim
                .as_list()
                .ok_or_else(|| VerificationError::type_mismatch(name))?;
            let contains_all = items
                .iter()
                .all(|item| elements.iter().any(|element| item.matches(element)));
            ensure(contains_all, || VerificationError::array_claim_mismatch(name))
        }
        ClaimRequirement::ClaimMatches(name, predicate) => {
            let claim = require_claim(token, name)?;
            ensure(predicate.test(&claim, token), || {
                VerificationError::claim_mismatch(name)
            })
        }
    }
}

#[inline]
fn ensure<F>(condition: bool, error: F) -> VerifyResult
where
    F: FnOnce() -> VerificationError,
{
    if condition { Ok(()) } else { Err(error()) }
}

fn require_claim<'t>(
    token: &'t dyn DecodedToken,
    name: &str,
) -> Result<Claim<'t>, VerificationError> {
    token
        .claim(name)
        .ok_or_else(|| VerificationError::missing_claim(name))
}

fn check_exact(token: &dyn DecodedToken, name: &str, expected: &str) -> VerifyResult {
    let claim = token.claim(name);
    let matches = claim.as_ref().and_then(Claim::as_str) == Some(expected);
    ensure(matches, || VerificationError::claim_mismatch(name))
}

/// "aud" may be a single string or an array of strings.
fn check_audience<F>(token: &dyn DecodedToken, rule: F) -> VerifyResult
where
    F: FnOnce(&[&str]) -> bool,
{
    let claim = token
        .claim(names::AUDIENCE)
        .ok_or(VerificationError::AudienceMismatch)?;
    let audience = match claim.as_str() {
        Some(single) => vec![single],
        None => claim
            .as_string_list()
            .ok_or(VerificationError::AudienceMismatch)?,
    };
    ensure(rule(&audience), || VerificationError::AudienceMismatch)
}
