//! Referral Entity
//!
//! A lead submitted under an affiliate's attribution. Review status and
//! payment status are independent axes; the payment timestamp is written
//! exactly once, on the first unpaid-to-paid transition.

use chrono::{DateTime, Utc};
use kernel::id::{AffiliateId, ReferralId};

use crate::domain::value_object::{
    referral_status::{PaymentStatus, ReferralStatus},
    referred_party::ReferredParty,
};

/// Referral entity
#[derive(Debug, Clone)]
pub struct Referral {
    pub referral_id: ReferralId,
    pub affiliate_id: AffiliateId,
    pub party: ReferredParty,
    pub status: ReferralStatus,
    pub payment_status: PaymentStatus,
    /// When the lead entered the system
    pub entered_at: DateTime<Utc>,
    /// Stamped on the first unpaid-to-paid transition, never overwritten
    pub paid_at: Option<DateTime<Utc>>,
    /// Admin-only note, never exposed to the affiliate
    pub internal_note: Option<String>,
    /// Note visible to the owning affiliate
    pub public_note: Option<String>,
    /// Soft-delete marker; referrals are never hard-deleted
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Referral {
    pub fn new(affiliate_id: AffiliateId, party: ReferredParty) -> Self {
        let now = Utc::now();

        Self {
            referral_id: ReferralId::new(),
            affiliate_id,
            party,
            status: ReferralStatus::default(),
            payment_status: PaymentStatus::default(),
            entered_at: now,
            paid_at: None,
            internal_note: None,
            public_note: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn set_status(&mut self, status: ReferralStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Move the payment axis; returns true on the first unpaid-to-paid
    /// transition, which is the only event that stamps `paid_at` and
    /// triggers the payment notification.
    pub fn set_payment_status(&mut self, payment_status: PaymentStatus) -> bool {
        let now = Utc::now();
        let first_paid = payment_status == PaymentStatus::Paid
            && self.payment_status == PaymentStatus::Unpaid
            && self.paid_at.is_none();

        if first_paid {
            self.paid_at = Some(now);
        }
        self.payment_status = payment_status;
        self.updated_at = now;

        first_paid
    }

    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}
