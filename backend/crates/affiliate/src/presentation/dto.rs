//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use auth::domain::value_object::affiliate_status::AffiliateStatus;

use crate::application::{AffiliateUpdate, ReferralUpdate};
use crate::domain::entity::{affiliate::Affiliate, referral::Referral};
use crate::domain::value_object::{
    commission::RateType,
    referral_status::{PaymentStatus, ReferralStatus},
    referred_party::ReferredParty,
};

// ============================================================================
// Registration
// ============================================================================

/// Self-registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub email: String,
    pub password: String,
    pub captcha_token: Option<String>,
}

/// Self-registration response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub account_id: Uuid,
    pub affiliate_id: Uuid,
    pub slug: String,
}

// ============================================================================
// Affiliate Profiles
// ============================================================================

/// Staff-side affiliate creation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAffiliateRequest {
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub email: String,
    pub password: String,
    pub rate_type: Option<String>,
    pub rate_value: Option<f64>,
    pub payment_term_days: Option<i32>,
    pub currency: Option<String>,
}

/// Partial profile update
///
/// A field that is absent stays untouched; `company` sent as `null`
/// clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAffiliateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub company: Option<Option<String>>,
    pub rate_type: Option<String>,
    pub rate_value: Option<f64>,
    pub payment_term_days: Option<i32>,
    pub currency: Option<String>,
}

impl UpdateAffiliateRequest {
    pub fn into_update(self) -> Result<AffiliateUpdate, String> {
        let rate_type = self
            .rate_type
            .as_deref()
            .map(parse_rate_type)
            .transpose()?;

        Ok(AffiliateUpdate {
            first_name: self.first_name,
            last_name: self.last_name,
            company: self.company,
            rate_type,
            rate_value: self.rate_value,
            payment_term_days: self.payment_term_days,
            currency: self.currency,
        })
    }
}

/// Status transition request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Affiliate profile response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateResponse {
    pub affiliate_id: Uuid,
    pub account_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub slug: String,
    pub status: String,
    pub rate_type: String,
    pub rate_value: f64,
    pub payment_term_days: i32,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl From<Affiliate> for AffiliateResponse {
    fn from(affiliate: Affiliate) -> Self {
        Self {
            affiliate_id: *affiliate.affiliate_id.as_uuid(),
            account_id: *affiliate.account_id.as_uuid(),
            first_name: affiliate.first_name,
            last_name: affiliate.last_name,
            company: affiliate.company,
            slug: affiliate.slug.as_str().to_string(),
            status: affiliate.status.code().to_string(),
            rate_type: affiliate.commission.rate_type.code().to_string(),
            rate_value: affiliate.commission.rate_value,
            payment_term_days: affiliate.commission.payment_term_days,
            currency: affiliate.commission.currency,
            created_at: affiliate.created_at,
        }
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// Block toggle request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBlockedRequest {
    pub blocked: bool,
}

// ============================================================================
// Referrals
// ============================================================================

/// Referral submission request (both authenticated and anonymous)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReferralRequest {
    pub party: ReferredParty,
}

/// Attribution carried in the query string of anonymous submissions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributionQuery {
    /// Tracking slug, `?ref=jane-doe`
    #[serde(rename = "ref")]
    pub slug: Option<String>,
}

/// Partial referral update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReferralRequest {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub internal_note: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub public_note: Option<Option<String>>,
}

impl UpdateReferralRequest {
    pub fn into_update(self) -> Result<ReferralUpdate, String> {
        let status = self
            .status
            .as_deref()
            .map(parse_referral_status)
            .transpose()?;
        let payment_status = self
            .payment_status
            .as_deref()
            .map(parse_payment_status)
            .transpose()?;

        Ok(ReferralUpdate {
            status,
            payment_status,
            internal_note: self.internal_note,
            public_note: self.public_note,
        })
    }
}

/// Referral response
///
/// `internal_note` is only populated for staff readers; the affiliate view
/// strips it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralResponse {
    pub referral_id: Uuid,
    pub affiliate_id: Uuid,
    pub party: ReferredParty,
    pub status: String,
    pub payment_status: String,
    pub entered_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub public_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_note: Option<String>,
}

impl ReferralResponse {
    pub fn from_referral(referral: Referral, include_internal: bool) -> Self {
        Self {
            referral_id: *referral.referral_id.as_uuid(),
            affiliate_id: *referral.affiliate_id.as_uuid(),
            party: referral.party,
            status: referral.status.code().to_string(),
            payment_status: referral.payment_status.code().to_string(),
            entered_at: referral.entered_at,
            paid_at: referral.paid_at,
            public_note: referral.public_note,
            internal_note: if include_internal {
                referral.internal_note
            } else {
                None
            },
        }
    }
}

// ============================================================================
// Code Parsing
// ============================================================================

pub fn parse_affiliate_status(code: &str) -> Result<AffiliateStatus, String> {
    match code {
        "pending" => Ok(AffiliateStatus::Pending),
        "active" => Ok(AffiliateStatus::Active),
        "rejected" => Ok(AffiliateStatus::Rejected),
        "disabled" => Ok(AffiliateStatus::Disabled),
        other => Err(format!("Unknown affiliate status: {}", other)),
    }
}

pub fn parse_referral_status(code: &str) -> Result<ReferralStatus, String> {
    match code {
        "pending" => Ok(ReferralStatus::Pending),
        "approved" => Ok(ReferralStatus::Approved),
        "rejected" => Ok(ReferralStatus::Rejected),
        other => Err(format!("Unknown referral status: {}", other)),
    }
}

pub fn parse_payment_status(code: &str) -> Result<PaymentStatus, String> {
    match code {
        "unpaid" => Ok(PaymentStatus::Unpaid),
        "paid" => Ok(PaymentStatus::Paid),
        "rejected" => Ok(PaymentStatus::Rejected),
        other => Err(format!("Unknown payment status: {}", other)),
    }
}

pub fn parse_rate_type(code: &str) -> Result<RateType, String> {
    match code {
        "percentage" => Ok(RateType::Percentage),
        "fixed" => Ok(RateType::Fixed),
        other => Err(format!("Unknown rate type: {}", other)),
    }
}

/// Distinguish an absent field from an explicit `null`
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
