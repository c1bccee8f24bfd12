//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use auth::domain::entity::account::Account;
use kernel::id::{AccountId, AffiliateId, ReferralId};

use crate::domain::entity::{affiliate::Affiliate, referral::Referral};
use crate::domain::value_object::slug::Slug;
use crate::error::AffiliateResult;

/// Outcome of an atomic account + profile insert
///
/// The two uniqueness constraints the registration loop cares about are
/// surfaced as distinct variants so the caller can tell "email taken, stop"
/// from "slug taken, retry with the next candidate".
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    #[error("Email is already registered")]
    EmailTaken,

    #[error("Slug is already claimed")]
    SlugTaken,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Affiliate profile repository trait
#[trait_variant::make(AffiliateRepository: Send)]
pub trait LocalAffiliateRepository {
    /// Find a live profile by ID
    async fn find_by_id(&self, affiliate_id: &AffiliateId) -> AffiliateResult<Option<Affiliate>>;

    /// Find a live profile by owning account
    async fn find_by_account_id(&self, account_id: &AccountId)
    -> AffiliateResult<Option<Affiliate>>;

    /// Resolve an attribution slug to a live profile
    async fn find_by_slug(&self, slug: &Slug) -> AffiliateResult<Option<Affiliate>>;

    /// Persist mutable profile fields
    async fn update(&self, affiliate: &Affiliate) -> AffiliateResult<()>;
}

/// Referral repository trait
#[trait_variant::make(ReferralRepository: Send)]
pub trait LocalReferralRepository {
    async fn create(&self, referral: &Referral) -> AffiliateResult<()>;

    /// Find a live referral by ID
    async fn find_by_id(&self, referral_id: &ReferralId) -> AffiliateResult<Option<Referral>>;

    /// Persist mutable referral fields (including the soft-delete marker)
    async fn update(&self, referral: &Referral) -> AffiliateResult<()>;

    /// All live referrals, newest first
    async fn list_all(&self) -> AffiliateResult<Vec<Referral>>;

    /// Live referrals owned by one affiliate, newest first
    async fn list_by_affiliate(&self, affiliate_id: &AffiliateId)
    -> AffiliateResult<Vec<Referral>>;
}

/// Atomic account + profile lifecycle operations
///
/// Registration must create both rows or neither; deletion must
/// soft-delete the referrals, the profile, and the account together.
#[trait_variant::make(EnrollmentRepository: Send)]
pub trait LocalEnrollmentRepository {
    /// Insert the account and its profile in one transaction
    async fn create_enrollment(
        &self,
        account: &Account,
        affiliate: &Affiliate,
    ) -> Result<(), EnrollmentError>;

    /// Soft-delete the profile, its referrals, and the owning account in
    /// one transaction
    async fn delete_enrollment(&self, affiliate: &Affiliate) -> AffiliateResult<()>;
}
