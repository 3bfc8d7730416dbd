//! Verification Builder - accumulates claim requirements and leeway settings
//!
//! Every configuration call is validated when it is made. A rejected call
//! returns [`InvalidArgument`] and leaves the builder exactly as it was, so
//! [`VerificationBuilder::build`] itself never fails.
//!
//! The builder is meant for sequential configuration on one thread; it is
//! `Send` but callers must not share a builder for concurrent mutation.

use super::claims::{ArrayItem, ClaimPredicate, ClaimRequirement, ClaimValue};
use super::leeway::{LeewayConfig, TimeClaim};
use super::verifier::Verifier;
use crate::clock::{Clock, SystemClock};
use crate::error::{ConfigResult, InvalidArgument};
use crate::types::{Claim, DecodedToken};
use std::sync::Arc;
use tracing::{debug, trace};

/// Entry point for configuring a [`Verifier`]
pub struct Jwt;

impl Jwt {
    /// Start configuring the requirements a token must meet
    #[inline]
    #[must_use]
    pub fn require() -> VerificationBuilder {
        VerificationBuilder::new()
    }
}

/// Accumulating configuration for a [`Verifier`]
///
/// Issuer, subject, audience and JWT ID are single-valued: a later call
/// replaces the earlier one. Claim presence, equality, array and predicate
/// requirements are additive and are evaluated in the order they were added.
#[derive(Debug, Clone)]
pub struct VerificationBuilder {
    issuer: Option<ClaimRequirement>,
    subject: Option<ClaimRequirement>,
    audience: Option<ClaimRequirement>,
    jwt_id: Option<ClaimRequirement>,
    leeway: LeewayConfig,
    claims: Vec<ClaimRequirement>,
    clock: Arc<dyn Clock>,
}

impl Default for VerificationBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationBuilder {
    /// Create a builder with no requirements, zero leeway and the system clock
    #[must_use]
    pub fn new() -> Self {
        Self {
            issuer: None,
            subject: None,
            audience: None,
            jwt_id: None,
            leeway: LeewayConfig::default(),
            claims: Vec::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Require "iss" to equal one of `issuers`
    ///
    /// An empty set is installed as-is and no issuer can satisfy it.
    pub fn with_issuer<I, S>(&mut self, issuers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issuer = Some(ClaimRequirement::IssuerIn(collect_strings(issuers)));
        self
    }

    /// Require "sub" to equal `subject`
    pub fn with_subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.subject = Some(ClaimRequirement::Subject(subject.into()));
        self
    }

    /// Require "aud" to contain every one of `audiences`
    ///
    /// Replaces any audience rule configured before, including one set with
    /// [`Self::with_any_of_audience`].
    pub fn with_audience<I, S>(&mut self, audiences: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audience = Some(ClaimRequirement::AudienceAll(collect_strings(audiences)));
        self
    }

    /// Require "aud" to contain at least one of `audiences`
    ///
    /// Replaces any audience rule configured before, including one set with
    /// [`Self::with_audience`].
    pub fn with_any_of_audience<I, S>(&mut self, audiences: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audience = Some(ClaimRequirement::AudienceAny(collect_strings(audiences)));
        self
    }

    /// Require "jti" to equal `jwt_id`
    pub fn with_jwt_id(&mut self, jwt_id: impl Into<String>) -> &mut Self {
        self.jwt_id = Some(ClaimRequirement::JwtId(jwt_id.into()));
        self
    }

    /// Default leeway in seconds for "exp", "nbf" and "iat"
    ///
    /// # Errors
    /// Returns `InvalidArgument::NegativeLeeway` if `seconds` is negative
    pub fn accept_leeway(&mut self, seconds: i64) -> ConfigResult<&mut Self> {
        let seconds = leeway_seconds(seconds)?;
        self.leeway.set_default(seconds);
        Ok(self)
    }

    /// Leeway in seconds for "exp", overriding the default
    ///
    /// # Errors
    /// Returns `InvalidArgument::NegativeLeeway` if `seconds` is negative
    pub fn accept_expires_at(&mut self, seconds: i64) -> ConfigResult<&mut Self> {
        self.accept_time_claim(TimeClaim::ExpiresAt, seconds)
    }

    /// Leeway in seconds for "nbf", overriding the default
    ///
    /// # Errors
    /// Returns `InvalidArgument::NegativeLeeway` if `seconds` is negative
    pub fn accept_not_before(&mut self, seconds: i64) -> ConfigResult<&mut Self> {
        self.accept_time_claim(TimeClaim::NotBefore, seconds)
    }

    /// Leeway in seconds for "iat", overriding the default
    ///
    /// Has no effect once [`Self::ignore_issued_at`] is set.
    ///
    /// # Errors
    /// Returns `InvalidArgument::NegativeLeeway` if `seconds` is negative
    pub fn accept_issued_at(&mut self, seconds: i64) -> ConfigResult<&mut Self> {
        self.accept_time_claim(TimeClaim::IssuedAt, seconds)
    }

    /// Skip every "iat" check
    pub fn ignore_issued_at(&mut self) -> &mut Self {
        self.leeway.set_ignore_issued_at();
        self
    }

    /// Require the claim to be present, with any value including null
    ///
    /// # Errors
    /// Returns `InvalidArgument::EmptyClaimName` if `name` is empty
    pub fn with_claim_presence(&mut self, name: impl Into<String>) -> ConfigResult<&mut Self> {
        let name = claim_name(name)?;
        Ok(self.push(ClaimRequirement::ClaimPresence(name)))
    }

    /// Require the claim to be present and equal `value`
    ///
    /// # Errors
    /// Returns `InvalidArgument::EmptyClaimName` if `name` is empty
    pub fn with_claim(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> ConfigResult<&mut Self> {
        let name = claim_name(name)?;
        Ok(self.push(ClaimRequirement::ClaimEquals(name, value.into())))
    }

    /// Require the claim to be an array containing every one of `items`
    ///
    /// # Errors
    /// Returns `InvalidArgument::EmptyClaimName` if `name` is empty
    pub fn with_array_claim<I, T>(
        &mut self,
        name: impl Into<String>,
        items: I,
    ) -> ConfigResult<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<ArrayItem>,
    {
        let name = claim_name(name)?;
        let items = items.into_iter().map(Into::into).collect();
        Ok(self.push(ClaimRequirement::ArrayClaimContains(name, items)))
    }

    /// Require the claim to be present and satisfy `predicate`
    ///
    /// The predicate receives the claim and the whole token.
    ///
    /// # Errors
    /// Returns `InvalidArgument::EmptyClaimName` if `name` is empty
    pub fn with_claim_predicate<F>(
        &mut self,
        name: impl Into<String>,
        predicate: F,
    ) -> ConfigResult<&mut Self>
    where
        F: Fn(&Claim<'_>, &dyn DecodedToken) -> bool + Send + Sync + 'static,
    {
        let name = claim_name(name)?;
        Ok(self.push(ClaimRequirement::ClaimMatches(
            name,
            ClaimPredicate::new(predicate),
        )))
    }

    /// Use `clock` as the current-time source
    pub fn with_clock(&mut self, clock: impl Clock + 'static) -> &mut Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Snapshot the configuration into an immutable [`Verifier`]
    ///
    /// The builder stays usable; each call yields an independent verifier.
    #[must_use]
    pub fn build(&self) -> Verifier {
        let registered: Vec<ClaimRequirement> = [
            &self.issuer,
            &self.subject,
            &self.audience,
            &self.jwt_id,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect();

        trace!(
            registered = registered.len(),
            claims = self.claims.len(),
            leeway = self.leeway.default_leeway(),
            "built claim verifier"
        );

        Verifier::new(
            registered,
            self.leeway,
            self.claims.clone(),
            Arc::clone(&self.clock),
        )
    }

    fn accept_time_claim(&mut self, claim: TimeClaim, seconds: i64) -> ConfigResult<&mut Self> {
        let seconds = leeway_seconds(seconds)?;
        self.leeway.set_override(claim, seconds);
        Ok(self)
    }

    fn push(&mut self, requirement: ClaimRequirement) -> &mut Self {
        self.claims.push(requirement);
        self
    }
}

fn collect_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

fn claim_name(name: impl Into<String>) -> ConfigResult<String> {
    let name = name.into();
    if name.is_empty() {
        debug!("rejected requirement with empty claim name");
        return Err(InvalidArgument::EmptyClaimName);
    }
    Ok(name)
}

fn leeway_seconds(seconds: i64) -> ConfigResult<u64> {
    u64::try_from(seconds).map_err(|_| {
        debug!(seconds, "rejected negative leeway");
        InvalidArgument::NegativeLeeway(seconds)
    })
}
