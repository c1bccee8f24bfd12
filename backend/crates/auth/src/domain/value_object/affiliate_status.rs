//! Affiliate Status Value Object
//!
//! Review state of an affiliate application. Lives in the auth crate
//! because login and the request guard both gate on it.
//!
//! Pending affiliates may sign in (so they can see their review status)
//! but are rejected by the API guard until an admin activates them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum AffiliateStatus {
    #[default]
    Pending = 0,
    Active = 1,
    Rejected = 2,
    Disabled = 3,
}

impl AffiliateStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use AffiliateStatus::*;
        match self {
            Pending => "pending",
            Active => "active",
            Rejected => "rejected",
            Disabled => "disabled",
        }
    }

    /// Pending and active affiliates may sign in
    #[inline]
    pub const fn can_login(&self) -> bool {
        use AffiliateStatus::*;
        matches!(self, Pending | Active)
    }

    /// Only active affiliates pass the API guard
    #[inline]
    pub const fn can_use_api(&self) -> bool {
        matches!(self, AffiliateStatus::Active)
    }

    /// Only active affiliates generate referrals
    #[inline]
    pub const fn can_refer(&self) -> bool {
        matches!(self, AffiliateStatus::Active)
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        use AffiliateStatus::*;
        match id {
            0 => Pending,
            1 => Active,
            2 => Rejected,
            3 => Disabled,
            _ => {
                tracing::error!("Invalid AffiliateStatus id: {}", id);
                unreachable!("Invalid AffiliateStatus id: {}", id)
            }
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Self {
        use AffiliateStatus::*;
        match code {
            "pending" => Pending,
            "active" => Active,
            "rejected" => Rejected,
            "disabled" => Disabled,
            _ => {
                tracing::error!("Invalid AffiliateStatus code: {}", code);
                unreachable!("Invalid AffiliateStatus code: {}", code)
            }
        }
    }
}

impl fmt::Display for AffiliateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_id() {
        assert_eq!(AffiliateStatus::from_id(0), AffiliateStatus::Pending);
        assert_eq!(AffiliateStatus::from_id(1), AffiliateStatus::Active);
        assert_eq!(AffiliateStatus::from_id(2), AffiliateStatus::Rejected);
        assert_eq!(AffiliateStatus::from_id(3), AffiliateStatus::Disabled);
    }

    #[test]
    fn test_pending_can_login_but_not_use_api() {
        assert!(AffiliateStatus::Pending.can_login());
        assert!(!AffiliateStatus::Pending.can_use_api());
        assert!(!AffiliateStatus::Pending.can_refer());
    }

    #[test]
    fn test_active_has_full_access() {
        assert!(AffiliateStatus::Active.can_login());
        assert!(AffiliateStatus::Active.can_use_api());
        assert!(AffiliateStatus::Active.can_refer());
    }

    #[test]
    fn test_rejected_and_disabled_locked_out() {
        for status in [AffiliateStatus::Rejected, AffiliateStatus::Disabled] {
            assert!(!status.can_login());
            assert!(!status.can_use_api());
            assert!(!status.can_refer());
        }
    }

    #[test]
    fn test_default_is_pending() {
        assert_eq!(AffiliateStatus::default(), AffiliateStatus::Pending);
    }
}
