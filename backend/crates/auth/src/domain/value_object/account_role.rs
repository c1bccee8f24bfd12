use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum AccountRole {
    #[default]
    Affiliate = 0,
    Support = 1,
    Manager = 2,
    Admin = 3,
    SuperAdmin = 4,
}

/// What a request is trying to do, independent of who is doing it.
///
/// Every authorization decision in the system goes through
/// `AccountRole::allows` so the role/permission matrix lives in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Read the caller's own affiliate profile and referrals
    ReadOwn,
    /// Read any affiliate's data
    ReadAll,
    /// Modify the caller's own data
    WriteOwn,
    /// Modify any affiliate's data (status changes, payouts)
    WriteAll,
    /// Manage accounts themselves (create, block, delete)
    AdminManage,
}

impl AccountRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use AccountRole::*;
        match self {
            Affiliate => "affiliate",
            Support => "support",
            Manager => "manager",
            Admin => "admin",
            SuperAdmin => "super_admin",
        }
    }

    /// Single authorization predicate for the whole system
    #[inline]
    pub const fn allows(&self, capability: Capability) -> bool {
        use AccountRole::*;
        use Capability::*;
        match capability {
            ReadOwn | WriteOwn => true,
            ReadAll => matches!(self, Support | Manager | Admin | SuperAdmin),
            WriteAll => matches!(self, Manager | Admin | SuperAdmin),
            AdminManage => matches!(self, Admin | SuperAdmin),
        }
    }

    #[inline]
    pub const fn is_staff(&self) -> bool {
        !matches!(self, AccountRole::Affiliate)
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        use AccountRole::*;
        match id {
            0 => Affiliate,
            1 => Support,
            2 => Manager,
            3 => Admin,
            4 => SuperAdmin,
            _ => {
                tracing::error!("Invalid AccountRole id: {}", id);
                unreachable!("Invalid AccountRole id: {}", id)
            }
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Self {
        use AccountRole::*;
        match code {
            "affiliate" => Affiliate,
            "support" => Support,
            "manager" => Manager,
            "admin" => Admin,
            "super_admin" => SuperAdmin,
            _ => {
                tracing::error!("Invalid AccountRole code: {}", code);
                unreachable!("Invalid AccountRole code: {}", code)
            }
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_id() {
        assert_eq!(AccountRole::from_id(0), AccountRole::Affiliate);
        assert_eq!(AccountRole::from_id(1), AccountRole::Support);
        assert_eq!(AccountRole::from_id(2), AccountRole::Manager);
        assert_eq!(AccountRole::from_id(3), AccountRole::Admin);
        assert_eq!(AccountRole::from_id(4), AccountRole::SuperAdmin);
    }

    #[test]
    fn test_role_from_code() {
        assert_eq!(AccountRole::from_code("affiliate"), AccountRole::Affiliate);
        assert_eq!(AccountRole::from_code("support"), AccountRole::Support);
        assert_eq!(AccountRole::from_code("manager"), AccountRole::Manager);
        assert_eq!(AccountRole::from_code("admin"), AccountRole::Admin);
        assert_eq!(
            AccountRole::from_code("super_admin"),
            AccountRole::SuperAdmin
        );
    }

    #[test]
    fn test_everyone_can_touch_own_data() {
        for role in [
            AccountRole::Affiliate,
            AccountRole::Support,
            AccountRole::Manager,
            AccountRole::Admin,
            AccountRole::SuperAdmin,
        ] {
            assert!(role.allows(Capability::ReadOwn));
            assert!(role.allows(Capability::WriteOwn));
        }
    }

    #[test]
    fn test_support_reads_all_but_writes_own_only() {
        assert!(AccountRole::Support.allows(Capability::ReadAll));
        assert!(!AccountRole::Support.allows(Capability::WriteAll));
        assert!(!AccountRole::Support.allows(Capability::AdminManage));
    }

    #[test]
    fn test_manager_writes_all_but_cannot_manage_accounts() {
        assert!(AccountRole::Manager.allows(Capability::WriteAll));
        assert!(!AccountRole::Manager.allows(Capability::AdminManage));
    }

    #[test]
    fn test_admin_tiers_manage_accounts() {
        assert!(AccountRole::Admin.allows(Capability::AdminManage));
        assert!(AccountRole::SuperAdmin.allows(Capability::AdminManage));
        assert!(!AccountRole::Affiliate.allows(Capability::AdminManage));
    }

    #[test]
    fn test_affiliate_is_not_staff() {
        assert!(!AccountRole::Affiliate.is_staff());
        assert!(AccountRole::Support.is_staff());
        assert!(AccountRole::SuperAdmin.is_staff());
    }
}
