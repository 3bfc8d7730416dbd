//! Typed expected values for claim equality and array containment

use crate::types::Claim;
use chrono::{DateTime, Utc};

/// Expected value of a claim
///
/// Equality is type-aware: a claim holding a value of a different shape than
/// the expected one never matches.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    /// JSON boolean
    Bool(bool),
    /// Integral number within 32 bits
    Int(i32),
    /// Integral number within 64 bits
    Long(i64),
    /// Any JSON number, compared as a double
    Double(f64),
    /// JSON string
    Str(String),
    /// NumericDate, compared at whole-second precision
    Instant(DateTime<Utc>),
}

impl ClaimValue {
    /// Whether `claim` holds this value
    #[allow(clippy::float_cmp)]
    pub(crate) fn matches(&self, claim: &Claim<'_>) -> bool {
        match self {
            ClaimValue::Bool(expected) => claim.as_bool() == Some(*expected),
            ClaimValue::Int(expected) => claim.as_i32() == Some(*expected),
            ClaimValue::Long(expected) => claim.as_i64() == Some(*expected),
            ClaimValue::Double(expected) => claim.as_f64() == Some(*expected),
            ClaimValue::Str(expected) => claim.as_str() == Some(expected.as_str()),
            ClaimValue::Instant(expected) => claim
                .as_instant()
                .is_some_and(|actual| actual.timestamp() == expected.timestamp()),
        }
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Bool(value)
    }
}

impl From<i32> for ClaimValue {
    fn from(value: i32) -> Self {
        ClaimValue::Int(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Long(value)
    }
}

impl From<f64> for ClaimValue {
    fn from(value: f64) -> Self {
        ClaimValue::Double(value)
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::Str(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::Str(value)
    }
}

impl From<DateTime<Utc>> for ClaimValue {
    fn from(value: DateTime<Utc>) -> Self {
        ClaimValue::Instant(value)
    }
}

/// Item an array claim must contain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayItem {
    /// String element
    Str(String),
    /// Integral element within 32 bits
    Int(i32),
    /// Integral element within 64 bits
    Long(i64),
}

impl ArrayItem {
    pub(crate) fn matches(&self, element: &Claim<'_>) -> bool {
        match self {
            ArrayItem::Str(expected) => element.as_str() == Some(expected.as_str()),
            ArrayItem::Int(expected) => element.as_i32() == Some(*expected),
            ArrayItem::Long(expected) => element.as_i64() == Some(*expected),
        }
    }
}

impl From<&str> for ArrayItem {
    fn from(value: &str) -> Self {
        ArrayItem::Str(value.to_string())
    }
}

impl From<String> for ArrayItem {
    fn from(value: String) -> Self {
        ArrayItem::Str(value)
    }
}

impl From<i32> for ArrayItem {
    fn from(value: i32) -> Self {
        ArrayItem::Int(value)
    }
}

impl From<i64> for ArrayItem {
    fn from(value: i64) -> Self {
        ArrayItem::Long(value)
    }
}
