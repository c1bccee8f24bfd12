//! Affiliate Backend Module
//!
//! Affiliate approval workflow and referral lifecycle:
//! - Self-registration (account + pending profile created atomically)
//! - Admin review: status transitions with edge-triggered emails
//! - Referral submission (authenticated or anonymous with attribution)
//! - Payment lifecycle with a write-once payment timestamp
//!
//! Clean Architecture structure mirrors the auth crate:
//! `domain/`, `application/`, `infra/`, `presentation/`.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use error::{AffiliateError, AffiliateResult};
pub use infra::postgres::PgPartnerRepository;
pub use presentation::router::affiliate_router;
