//! Value Object Module

pub mod account_id;
pub mod account_password;
pub mod account_role;
pub mod affiliate_status;
pub mod email;
