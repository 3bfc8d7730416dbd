//! Leeway windows for the time claims

use super::claims::names;

/// Time claims checked against the clock, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeClaim {
    /// "exp"
    ExpiresAt,
    /// "nbf"
    NotBefore,
    /// "iat"
    IssuedAt,
}

impl TimeClaim {
    /// All time claims in evaluation order.
    pub const ALL: [TimeClaim; 3] = [
        TimeClaim::ExpiresAt,
        TimeClaim::NotBefore,
        TimeClaim::IssuedAt,
    ];

    /// Registered claim name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TimeClaim::ExpiresAt => names::EXPIRES_AT,
            TimeClaim::NotBefore => names::NOT_BEFORE,
            TimeClaim::IssuedAt => names::ISSUED_AT,
        }
    }
}

/// Default leeway plus per-claim overrides, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeewayConfig {
    default_leeway: u64,
    expires_at: Option<u64>,
    not_before: Option<u64>,
    issued_at: Option<u64>,
    ignore_issued_at: bool,
}

impl LeewayConfig {
    /// Leeway applied to claims without an override.
    #[must_use]
    pub fn default_leeway(&self) -> u64 {
        self.default_leeway
    }

    /// Effective leeway for `claim`: its override, else the default.
    #[must_use]
    pub fn leeway_for(&self, claim: TimeClaim) -> u64 {
        let custom = match claim {
            TimeClaim::ExpiresAt => self.expires_at,
            TimeClaim::NotBefore => self.not_before,
            TimeClaim::IssuedAt => self.issued_at,
        };
        custom.unwrap_or(self.default_leeway)
    }

    /// Whether "iat" checking is suppressed.
    #[must_use]
    pub fn ignores_issued_at(&self) -> bool {
        self.ignore_issued_at
    }

    pub(crate) fn set_default(&mut self, seconds: u64) {
        self.default_leeway = seconds;
    }

    pub(crate) fn set_override(&mut self, claim: TimeClaim, seconds: u64) {
        let slot = match claim {
            TimeClaim::ExpiresAt => &mut self.expires_at,
            TimeClaim::NotBefore => &mut self.not_before,
            TimeClaim::IssuedAt => &mut self.issued_at,
        };
        *slot = Some(seconds);
    }

    pub(crate) fn set_ignore_issued_at(&mut self) {
        self.ignore_issued_at = true;
    }
}
