//! Registered claim names and the decoded claim set struct.
//!
//! A registered claim lives in its typed field when its value has the
//! registered shape; any other value (including `null`) is kept verbatim in
//! `extra` so lookups see exactly what the token carried.

use crate::types::{Claim, DecodedToken};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Registered claim names (RFC 7519 section 4.1).
pub mod names {
    /// Issuer.
    pub const ISSUER: &str = "iss";
    /// Subject.
    pub const SUBJECT: &str = "sub";
    /// Audience.
    pub const AUDIENCE: &str = "aud";
    /// Expiration time.
    pub const EXPIRES_AT: &str = "exp";
    /// Not before.
    pub const NOT_BEFORE: &str = "nbf";
    /// Issued at.
    pub const ISSUED_AT: &str = "iat";
    /// JWT ID.
    pub const JWT_ID: &str = "jti";
}

/// Decoded JWT claim set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Claims {
    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience. A single string is read as a one-element list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Vec<String>>,
    /// Expiry (unix seconds, fractional part truncated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Not before (unix seconds, fractional part truncated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued-at (unix seconds, fractional part truncated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// JWT ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Private claims, plus registered claims whose value does not have the
    /// registered shape.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Claims {
    /// Set a claim, replacing any earlier value under the same name.
    ///
    /// Registered names go to their typed field when the value fits it and to
    /// `extra` otherwise.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        self.remove(&name);

        let rest = match name.as_str() {
            names::ISSUER => string_field(&mut self.iss, value),
            names::SUBJECT => string_field(&mut self.sub, value),
            names::JWT_ID => string_field(&mut self.jti, value),
            names::AUDIENCE => audience_field(&mut self.aud, value),
            names::EXPIRES_AT => date_field(&mut self.exp, value),
            names::NOT_BEFORE => date_field(&mut self.nbf, value),
            names::ISSUED_AT => date_field(&mut self.iat, value),
            _ => Some(value),
        };
        if let Some(value) = rest {
            self.extra.insert(name, value);
        }
    }

    /// Remove a claim, whether typed or private.
    pub fn remove(&mut self, name: &str) {
        match name {
            names::ISSUER => self.iss = None,
            names::SUBJECT => self.sub = None,
            names::JWT_ID => self.jti = None,
            names::AUDIENCE => self.aud = None,
            names::EXPIRES_AT => self.exp = None,
            names::NOT_BEFORE => self.nbf = None,
            names::ISSUED_AT => self.iat = None,
            _ => {}
        }
        self.extra.remove(name);
    }
}

fn string_field(slot: &mut Option<String>, value: Value) -> Option<Value> {
    match value {
        Value::String(value) => {
            *slot = Some(value);
            None
        }
        other => Some(other),
    }
}

fn audience_field(slot: &mut Option<Vec<String>>, value: Value) -> Option<Value> {
    match value {
        Value::String(value) => {
            *slot = Some(vec![value]);
            None
        }
        Value::Array(items) if items.iter().all(Value::is_string) => {
            *slot = Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(item) => Some(item),
                        _ => None,
                    })
                    .collect(),
            );
            None
        }
        other => Some(other),
    }
}

fn date_field(slot: &mut Option<i64>, value: Value) -> Option<Value> {
    match Claim::borrowed(&value).as_numeric_date() {
        Some(secs) => {
            *slot = Some(secs);
            None
        }
        None => Some(value),
    }
}

impl FromIterator<(String, Value)> for Claims {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut claims = Claims::default();
        for (name, value) in iter {
            claims.insert(name, value);
        }
        claims
    }
}

impl<'de> Deserialize<'de> for Claims {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Map::<String, Value>::deserialize(deserializer)?
            .into_iter()
            .collect())
    }
}

impl DecodedToken for Claims {
    fn claim(&self, name: &str) -> Option<Claim<'_>> {
        let string = |value: &Option<String>| value.clone().map(Value::String);
        let number = |value: &Option<i64>| value.map(Value::from);

        let registered = match name {
            names::ISSUER => string(&self.iss),
            names::SUBJECT => string(&self.sub),
            names::JWT_ID => string(&self.jti),
            names::EXPIRES_AT => number(&self.exp),
            names::NOT_BEFORE => number(&self.nbf),
            names::ISSUED_AT => number(&self.iat),
            names::AUDIENCE => self.aud.as_ref().map(|aud| Value::from(aud.clone())),
            _ => None,
        };
        match registered {
            Some(value) => Some(Claim::owned(value)),
            None => self.extra.get(name).map(Claim::borrowed),
        }
    }
}
