//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod create_affiliate;
pub mod create_referral;
pub mod delete_affiliate;
pub mod delete_referral;
pub mod list_referrals;
pub mod register;
pub mod set_blocked;
pub mod update_affiliate;
pub mod update_referral;
pub mod update_status;

// Re-exports
pub use config::AffiliateConfig;
pub use create_affiliate::{CreateAffiliateInput, CreateAffiliateUseCase};
pub use create_referral::{Attribution, CreateReferralUseCase};
pub use delete_affiliate::DeleteAffiliateUseCase;
pub use delete_referral::DeleteReferralUseCase;
pub use list_referrals::ListReferralsUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use set_blocked::SetBlockedUseCase;
pub use update_affiliate::{AffiliateUpdate, UpdateAffiliateUseCase};
pub use update_referral::{ReferralUpdate, UpdateReferralUseCase};
pub use update_status::UpdateAffiliateStatusUseCase;
