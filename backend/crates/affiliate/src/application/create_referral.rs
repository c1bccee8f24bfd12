//! Referral Creation Use Case
//!
//! Two entry points share the same core: an authenticated affiliate
//! submitting under their own profile, and an anonymous visitor arriving
//! through a tracking link. Anonymous attribution takes the explicit slug
//! parameter first and falls back to the attribution cookie; with neither,
//! the submission is refused.
//!
//! Only active affiliates generate referrals, on both paths.

use std::sync::Arc;

use kernel::id::AccountId;

use crate::domain::entity::{affiliate::Affiliate, referral::Referral};
use crate::domain::repository::{AffiliateRepository, ReferralRepository};
use crate::domain::value_object::{referred_party::ReferredParty, slug::Slug};
use crate::error::{AffiliateError, AffiliateResult};

/// Attribution carried by an anonymous submission
#[derive(Debug, Default)]
pub struct Attribution {
    /// Explicit `?ref=` style slug parameter; wins over the cookie
    pub slug_param: Option<String>,
    /// Value of the attribution cookie, if present
    pub cookie: Option<String>,
}

impl Attribution {
    fn slug(&self) -> Option<&str> {
        self.slug_param.as_deref().or(self.cookie.as_deref())
    }
}

/// Referral creation use case
pub struct CreateReferralUseCase<P, R>
where
    P: AffiliateRepository,
    R: ReferralRepository,
{
    affiliates: Arc<P>,
    referrals: Arc<R>,
}

impl<P, R> CreateReferralUseCase<P, R>
where
    P: AffiliateRepository,
    R: ReferralRepository,
{
    pub fn new(affiliates: Arc<P>, referrals: Arc<R>) -> Self {
        Self {
            affiliates,
            referrals,
        }
    }

    /// Submission by a signed-in affiliate under their own profile
    pub async fn execute_authenticated(
        &self,
        account_id: &AccountId,
        party: ReferredParty,
    ) -> AffiliateResult<Referral> {
        let affiliate = self
            .affiliates
            .find_by_account_id(account_id)
            .await?
            .ok_or(AffiliateError::NotFound)?;

        self.submit(&affiliate, party).await
    }

    /// Anonymous submission attributed through a tracking slug
    pub async fn execute_anonymous(
        &self,
        attribution: &Attribution,
        party: ReferredParty,
    ) -> AffiliateResult<Referral> {
        let slug = attribution
            .slug()
            .ok_or(AffiliateError::MissingAttribution)?;
        let slug = Slug::new(slug).map_err(|_| AffiliateError::NotFound)?;

        let affiliate = self
            .affiliates
            .find_by_slug(&slug)
            .await?
            .ok_or(AffiliateError::NotFound)?;

        self.submit(&affiliate, party).await
    }

    async fn submit(
        &self,
        affiliate: &Affiliate,
        party: ReferredParty,
    ) -> AffiliateResult<Referral> {
        if !affiliate.status.can_refer() {
            return Err(AffiliateError::AffiliateNotActive);
        }

        let referral = Referral::new(affiliate.affiliate_id, party);
        self.referrals.create(&referral).await?;

        tracing::info!(
            referral_id = %referral.referral_id,
            affiliate_id = %affiliate.affiliate_id,
            "Referral created"
        );

        Ok(referral)
    }
}
