//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::account::Account;
use crate::domain::value_object::{
    account_id::AccountId, affiliate_status::AffiliateStatus, email::Email,
};
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Create a new account
    async fn create(&self, account: &Account) -> AuthResult<()>;

    /// Find account by ID (soft-deleted rows included; callers check `deleted_at`)
    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>>;

    /// Find account by email (exact match)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    /// Check if an email is taken, soft-deleted accounts included
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Find by outstanding verification token, expiry checked against `now`
    async fn find_by_verification_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Account>>;

    /// Find by outstanding reset token, expiry checked against `now`
    async fn find_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Account>>;

    /// Persist all mutable account fields
    async fn update(&self, account: &Account) -> AuthResult<()>;

    /// Affiliate review status for this account, if it has an affiliate profile
    ///
    /// Staff accounts have no profile and return `None`; the guard treats
    /// that as "no affiliate gate applies".
    async fn affiliate_status(&self, account_id: &AccountId)
    -> AuthResult<Option<AffiliateStatus>>;
}
