//! Entity Module

pub mod affiliate;
pub mod referral;
