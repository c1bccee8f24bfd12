//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Opaque one-time token generation
//! - Password hashing (Argon2id)
//! - Notification gateway (SMTP) and email template store
//! - Captcha verification client
//! - Attribution cookie helpers

pub mod captcha;
pub mod cookie;
pub mod crypto;
pub mod notify;
pub mod password;
