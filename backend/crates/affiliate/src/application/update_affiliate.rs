//! Affiliate Profile Update Use Case
//!
//! Partial update of profile and commission fields. The slug and the review
//! status are deliberately absent from [`AffiliateUpdate`]: the slug is
//! immutable once assigned and status has its own transition operation.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::AffiliateId;

use crate::domain::entity::affiliate::Affiliate;
use crate::domain::repository::AffiliateRepository;
use crate::domain::value_object::commission::RateType;
use crate::error::{AffiliateError, AffiliateResult};

/// Partial profile update; `None` leaves the field as is
#[derive(Debug, Default)]
pub struct AffiliateUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `Some(None)` clears the company
    pub company: Option<Option<String>>,
    pub rate_type: Option<RateType>,
    pub rate_value: Option<f64>,
    pub payment_term_days: Option<i32>,
    pub currency: Option<String>,
}

/// Affiliate profile update use case
pub struct UpdateAffiliateUseCase<P>
where
    P: AffiliateRepository,
{
    affiliates: Arc<P>,
}

impl<P> UpdateAffiliateUseCase<P>
where
    P: AffiliateRepository,
{
    pub fn new(affiliates: Arc<P>) -> Self {
        Self { affiliates }
    }

    pub async fn execute(
        &self,
        affiliate_id: &AffiliateId,
        update: AffiliateUpdate,
    ) -> AffiliateResult<Affiliate> {
        let mut affiliate = self
            .affiliates
            .find_by_id(affiliate_id)
            .await?
            .ok_or(AffiliateError::NotFound)?;

        if let Some(first_name) = update.first_name {
            affiliate.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            affiliate.last_name = last_name;
        }
        if let Some(company) = update.company {
            affiliate.company = company;
        }
        if let Some(rate_type) = update.rate_type {
            affiliate.commission.rate_type = rate_type;
        }
        if let Some(rate_value) = update.rate_value {
            if !rate_value.is_finite() || rate_value < 0.0 {
                return Err(AffiliateError::Validation(
                    "Commission rate must be a non-negative number".to_string(),
                ));
            }
            affiliate.commission.rate_value = rate_value;
        }
        if let Some(days) = update.payment_term_days {
            if days < 0 {
                return Err(AffiliateError::Validation(
                    "Payment term cannot be negative".to_string(),
                ));
            }
            affiliate.commission.payment_term_days = days;
        }
        if let Some(currency) = update.currency {
            affiliate.commission.currency = currency;
        }
        affiliate.updated_at = Utc::now();

        self.affiliates.update(&affiliate).await?;

        tracing::info!(affiliate_id = %affiliate.affiliate_id, "Affiliate profile updated");

        Ok(affiliate)
    }
}
