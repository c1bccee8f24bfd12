//! Value Object Module

pub mod commission;
pub mod referral_status;
pub mod referred_party;
pub mod slug;
