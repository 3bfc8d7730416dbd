//! Decoded token contract and typed claim access
//!
//! Decoding (base64url + JSON) and signature checks happen before a token
//! reaches this crate. The verifier only needs name-keyed lookup of the claim
//! set, which [`DecodedToken`] provides.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Read-only view over a decoded token's claim set
pub trait DecodedToken {
    /// Look up a claim by name. `None` means the claim is absent; a claim
    /// holding JSON `null` is present.
    fn claim(&self, name: &str) -> Option<Claim<'_>>;

    /// Whether the claim is present, with any value
    #[inline]
    fn has_claim(&self, name: &str) -> bool {
        self.claim(name).is_some()
    }
}

/// Single claim value with typed accessors
///
/// Accessors return `None` when the value does not have the requested shape;
/// they never coerce between strings and numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim<'a>(Cow<'a, Value>);

impl<'a> Claim<'a> {
    /// Wrap a borrowed JSON value
    #[inline]
    #[must_use]
    pub fn borrowed(value: &'a Value) -> Self {
        Self(Cow::Borrowed(value))
    }

    /// Wrap an owned JSON value
    #[inline]
    #[must_use]
    pub fn owned(value: Value) -> Self {
        Self(Cow::Owned(value))
    }

    /// Raw JSON value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Claim is present with a JSON `null` value
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Boolean value
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.0.as_bool()
    }

    /// Integral value that fits in 32 bits
    #[inline]
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|v| i32::try_from(v).ok())
    }

    /// Integral value that fits in 64 bits
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_i64()
    }

    /// Any numeric value as a double
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }

    /// String value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// NumericDate as whole seconds since the unix epoch
    ///
    /// Fractional seconds are truncated.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_numeric_date(&self) -> Option<i64> {
        match self.0.as_i64() {
            Some(secs) => Some(secs),
            None => self.0.as_f64().map(|secs| secs.trunc() as i64),
        }
    }

    /// NumericDate as an instant
    #[must_use]
    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.as_numeric_date()?, 0).single()
    }

    /// Array elements, each as a claim borrowing from this one
    #[must_use]
    pub fn as_list(&self) -> Option<Vec<Claim<'_>>> {
        self.0
            .as_array()
            .map(|items| items.iter().map(Claim::borrowed).collect())
    }

    /// Array of strings. `None` if the value is not an array or any element
    /// is not a string.
    #[must_use]
    pub fn as_string_list(&self) -> Option<Vec<&str>> {
        self.0
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect::<Option<Vec<_>>>()
    }
}

impl DecodedToken for Map<String, Value> {
    #[inline]
    fn claim(&self, name: &str) -> Option<Claim<'_>> {
        self.get(name).map(Claim::borrowed)
    }
}

impl<S: BuildHasher> DecodedToken for HashMap<String, Value, S> {
    #[inline]
    fn claim(&self, name: &str) -> Option<Claim<'_>> {
        self.get(name).map(Claim::borrowed)
    }
}

/// A JSON payload; anything other than an object has no claims.
impl DecodedToken for Value {
    #[inline]
    fn claim(&self, name: &str) -> Option<Claim<'_>> {
        self.as_object()?.get(name).map(Claim::borrowed)
    }
}

impl<T: DecodedToken + ?Sized> DecodedToken for &T {
    #[inline]
    fn claim(&self, name: &str) -> Option<Claim<'_>> {
        (**self).claim(name)
    }
}
