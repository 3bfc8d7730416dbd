//! Declarative verification options.
//!
//! Options are plain data (typically deserialized from the caller's own
//! configuration) and are applied through [`VerificationBuilder`], so the
//! same argument validation holds.

use super::builder::VerificationBuilder;
use super::claims::{ArrayItem, ClaimValue};
use crate::error::{ConfigResult, InvalidArgument};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How the configured audiences are matched against "aud".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudienceMode {
    /// Every configured audience must be present.
    #[default]
    All,
    /// At least one configured audience must be present.
    Any,
}

/// Claim verification options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationOptions {
    /// Accepted issuers.
    pub issuers: Option<Vec<String>>,
    /// Expected subject.
    pub subject: Option<String>,
    /// Expected audiences.
    pub audience: Option<Vec<String>>,
    /// Audience matching mode.
    pub audience_mode: AudienceMode,
    /// Expected JWT ID.
    pub jwt_id: Option<String>,
    /// Default leeway in seconds.
    pub leeway: Option<i64>,
    /// Leeway in seconds for "exp".
    pub expires_at_leeway: Option<i64>,
    /// Leeway in seconds for "nbf".
    pub not_before_leeway: Option<i64>,
    /// Leeway in seconds for "iat".
    pub issued_at_leeway: Option<i64>,
    /// Skip "iat" checks.
    pub ignore_issued_at: bool,
    /// Claims that must be present.
    pub required_claims: Vec<String>,
    /// Claims that must equal a JSON scalar.
    pub claims: BTreeMap<String, Value>,
    /// Array claims that must contain the listed strings or integers.
    pub array_claims: BTreeMap<String, Vec<Value>>,
}

impl VerificationOptions {
    /// Strict options: no leeway on any time claim.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            leeway: Some(0),
            ..Self::default()
        }
    }

    /// Set the default leeway.
    #[must_use]
    pub fn with_leeway(mut self, seconds: i64) -> Self {
        self.leeway = Some(seconds);
        self
    }

    /// Accept one more issuer.
    #[must_use]
    pub fn expect_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuers.get_or_insert_with(Vec::new).push(issuer.into());
        self
    }

    /// Set expected audiences and how they are matched.
    #[must_use]
    pub fn expect_audience(mut self, audience: Vec<String>, mode: AudienceMode) -> Self {
        self.audience = Some(audience);
        self.audience_mode = mode;
        self
    }

    /// Add a required claim.
    #[must_use]
    pub fn require_claim(mut self, claim: impl Into<String>) -> Self {
        self.required_claims.push(claim.into());
        self
    }

    /// Build a verification builder from these options.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for an empty claim name, a negative leeway
    /// or a claim value with no typed equivalent
    pub fn into_builder(self) -> ConfigResult<VerificationBuilder> {
        let mut builder = VerificationBuilder::new();
        self.apply(&mut builder)?;
        Ok(builder)
    }

    /// Apply these options on top of an existing builder.
    ///
    /// Options are validated up front; on error the builder is unchanged.
    ///
    /// # Errors
    /// Same as [`Self::into_builder`]
    pub fn apply(self, builder: &mut VerificationBuilder) -> ConfigResult<()> {
        let mut staged = builder.clone();

        if let Some(issuers) = self.issuers {
            staged.with_issuer(issuers);
        }
        if let Some(subject) = self.subject {
            staged.with_subject(subject);
        }
        if let Some(audience) = self.audience {
            match self.audience_mode {
                AudienceMode::All => staged.with_audience(audience),
                AudienceMode::Any => staged.with_any_of_audience(audience),
            };
        }
        if let Some(jwt_id) = self.jwt_id {
            staged.with_jwt_id(jwt_id);
        }
        if let Some(seconds) = self.leeway {
            staged.accept_leeway(seconds)?;
        }
        if let Some(seconds) = self.expires_at_leeway {
            staged.accept_expires_at(seconds)?;
        }
        if let Some(seconds) = self.not_before_leeway {
            staged.accept_not_before(seconds)?;
        }
        if let Some(seconds) = self.issued_at_leeway {
            staged.accept_issued_at(seconds)?;
        }
        if self.ignore_issued_at {
            staged.ignore_issued_at();
        }
        for name in self.required_claims {
            staged.with_claim_presence(name)?;
        }
        for (name, value) in self.claims {
            let value = claim_value(&name, value)?;
            staged.with_claim(name, value)?;
        }
        for (name, items) in self.array_claims {
            let items = items
                .into_iter()
                .map(|item| array_item(&name, item))
                .collect::<ConfigResult<Vec<_>>>()?;
            staged.with_array_claim(name, items)?;
        }

        *builder = staged;
        Ok(())
    }
}

fn claim_value(name: &str, value: Value) -> ConfigResult<ClaimValue> {
    match value {
        Value::Bool(value) => Ok(ClaimValue::Bool(value)),
        Value::String(value) => Ok(ClaimValue::Str(value)),
        Value::Number(number) => number
            .as_i64()
            .map(ClaimValue::Long)
            .or_else(|| number.as_f64().map(ClaimValue::Double))
            .ok_or_else(|| unsupported(name)),
        _ => Err(unsupported(name)),
    }
}

fn array_item(name: &str, item: Value) -> ConfigResult<ArrayItem> {
    match item {
        Value::String(value) => Ok(ArrayItem::Str(value)),
        Value::Number(number) => number
            .as_i64()
            .map(ArrayItem::Long)
            .ok_or_else(|| unsupported(name)),
        _ => Err(unsupported(name)),
    }
}

fn unsupported(name: &str) -> InvalidArgument {
    InvalidArgument::UnsupportedClaimValue(name.to_string())
}
