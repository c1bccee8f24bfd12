//! Referral Listing Use Case
//!
//! Staff with the read-all capability see every live referral; an affiliate
//! sees only their own. Internal notes are stripped at the DTO layer, not
//! here.

use std::sync::Arc;

use auth::application::guard::AuthContext;
use auth::domain::value_object::account_role::Capability;

use crate::domain::entity::referral::Referral;
use crate::domain::repository::{AffiliateRepository, ReferralRepository};
use crate::error::{AffiliateError, AffiliateResult};

/// Referral listing use case
pub struct ListReferralsUseCase<R, P>
where
    R: ReferralRepository,
    P: AffiliateRepository,
{
    referrals: Arc<R>,
    affiliates: Arc<P>,
}

impl<R, P> ListReferralsUseCase<R, P>
where
    R: ReferralRepository,
    P: AffiliateRepository,
{
    pub fn new(referrals: Arc<R>, affiliates: Arc<P>) -> Self {
        Self {
            referrals,
            affiliates,
        }
    }

    pub async fn execute(&self, context: &AuthContext) -> AffiliateResult<Vec<Referral>> {
        if context.allows(Capability::ReadAll) {
            return Ok(self.referrals.list_all().await?);
        }

        let affiliate = self
            .affiliates
            .find_by_account_id(&context.account_id)
            .await?
            .ok_or(AffiliateError::NotFound)?;

        self.referrals.list_by_affiliate(&affiliate.affiliate_id).await
    }
}
