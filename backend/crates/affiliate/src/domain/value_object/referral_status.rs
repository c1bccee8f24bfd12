//! Referral Status Value Objects
//!
//! Two independent axes: review status and payment status.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum ReferralStatus {
    #[default]
    Pending = 0,
    Approved = 1,
    Rejected = 2,
}

impl ReferralStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use ReferralStatus::*;
        match self {
            Pending => "pending",
            Approved => "approved",
            Rejected => "rejected",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        use ReferralStatus::*;
        match id {
            0 => Pending,
            1 => Approved,
            2 => Rejected,
            _ => {
                tracing::error!("Invalid ReferralStatus id: {}", id);
                unreachable!("Invalid ReferralStatus id: {}", id)
            }
        }
    }
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum PaymentStatus {
    #[default]
    Unpaid = 0,
    Paid = 1,
    Rejected = 2,
}

impl PaymentStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use PaymentStatus::*;
        match self {
            Unpaid => "unpaid",
            Paid => "paid",
            Rejected => "rejected",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        use PaymentStatus::*;
        match id {
            0 => Unpaid,
            1 => Paid,
            2 => Rejected,
            _ => {
                tracing::error!("Invalid PaymentStatus id: {}", id);
                unreachable!("Invalid PaymentStatus id: {}", id)
            }
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referral_status_roundtrip() {
        for status in [
            ReferralStatus::Pending,
            ReferralStatus::Approved,
            ReferralStatus::Rejected,
        ] {
            assert_eq!(ReferralStatus::from_id(status.id()), status);
        }
    }

    #[test]
    fn test_payment_status_roundtrip() {
        for status in [
            PaymentStatus::Unpaid,
            PaymentStatus::Paid,
            PaymentStatus::Rejected,
        ] {
            assert_eq!(PaymentStatus::from_id(status.id()), status);
        }
    }
}
