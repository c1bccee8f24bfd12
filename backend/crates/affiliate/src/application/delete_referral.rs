//! Referral Deletion Use Case
//!
//! Soft delete only; the row survives for bookkeeping and drops out of all
//! live listings.

use std::sync::Arc;

use kernel::id::ReferralId;

use crate::domain::repository::ReferralRepository;
use crate::error::{AffiliateError, AffiliateResult};

/// Referral deletion use case
pub struct DeleteReferralUseCase<R>
where
    R: ReferralRepository,
{
    referrals: Arc<R>,
}

impl<R> DeleteReferralUseCase<R>
where
    R: ReferralRepository,
{
    pub fn new(referrals: Arc<R>) -> Self {
        Self { referrals }
    }

    pub async fn execute(&self, referral_id: &ReferralId) -> AffiliateResult<()> {
        let mut referral = self
            .referrals
            .find_by_id(referral_id)
            .await?
            .ok_or(AffiliateError::NotFound)?;

        referral.soft_delete();
        self.referrals.update(&referral).await?;

        tracing::info!(referral_id = %referral.referral_id, "Referral soft-deleted");

        Ok(())
    }
}
