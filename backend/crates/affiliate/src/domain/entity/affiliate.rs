//! Affiliate Entity
//!
//! 1:1 extension of an Account with the affiliate role. The slug is
//! immutable once assigned; the review status has its own operation and
//! is never touched by profile updates.

use auth::domain::value_object::affiliate_status::AffiliateStatus;
use chrono::{DateTime, Utc};
use kernel::id::{AccountId, AffiliateId};

use crate::domain::value_object::{commission::CommissionConfig, slug::Slug};

/// Affiliate profile entity
#[derive(Debug, Clone)]
pub struct Affiliate {
    pub affiliate_id: AffiliateId,
    /// Owning account (unique, one profile per account)
    pub account_id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    /// Unique tracking slug, immutable once assigned
    pub slug: Slug,
    /// Review state (pending/active/rejected/disabled)
    pub status: AffiliateStatus,
    pub commission: CommissionConfig,
    /// Soft-delete marker
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Affiliate {
    /// Create a new profile
    ///
    /// Self-registration passes `Pending`; admin creation passes `Active`.
    pub fn new(
        account_id: AccountId,
        first_name: String,
        last_name: String,
        company: Option<String>,
        slug: Slug,
        status: AffiliateStatus,
        commission: CommissionConfig,
    ) -> Self {
        let now = Utc::now();

        Self {
            affiliate_id: AffiliateId::new(),
            account_id,
            first_name,
            last_name,
            company,
            slug,
            status,
            commission,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn set_status(&mut self, status: AffiliateStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Replace the slug with the next collision candidate (pre-insert only)
    pub fn with_slug(mut self, slug: Slug) -> Self {
        self.slug = slug;
        self
    }

    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}
