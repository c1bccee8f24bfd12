//! Affiliate Deletion Use Case
//!
//! Soft-deletes the profile, its referrals, and the owning account in one
//! transaction. The rows stay, so the email can never be re-registered and
//! the referral history survives for bookkeeping.

use std::sync::Arc;

use kernel::id::AffiliateId;

use crate::domain::repository::{AffiliateRepository, EnrollmentRepository};
use crate::error::{AffiliateError, AffiliateResult};

/// Affiliate deletion use case
pub struct DeleteAffiliateUseCase<P, E>
where
    P: AffiliateRepository,
    E: EnrollmentRepository,
{
    affiliates: Arc<P>,
    enrollment: Arc<E>,
}

impl<P, E> DeleteAffiliateUseCase<P, E>
where
    P: AffiliateRepository,
    E: EnrollmentRepository,
{
    pub fn new(affiliates: Arc<P>, enrollment: Arc<E>) -> Self {
        Self {
            affiliates,
            enrollment,
        }
    }

    pub async fn execute(&self, affiliate_id: &AffiliateId) -> AffiliateResult<()> {
        let affiliate = self
            .affiliates
            .find_by_id(affiliate_id)
            .await?
            .ok_or(AffiliateError::NotFound)?;

        self.enrollment.delete_enrollment(&affiliate).await?;

        tracing::info!(
            affiliate_id = %affiliate.affiliate_id,
            account_id = %affiliate.account_id,
            "Affiliate soft-deleted"
        );

        Ok(())
    }
}
