//! Account Entity
//!
//! Credential and lifecycle state for one portal login. Affiliate profile
//! data (slug, commission config) lives in the affiliate crate; this entity
//! only carries what login, verification, and the guard need.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    account_id::AccountId, account_password::AccountPassword, account_role::AccountRole,
    email::Email,
};

/// Account entity
///
/// Soft-deleted accounts keep their row (and their email) so a deleted
/// email can never be re-registered.
#[derive(Debug, Clone)]
pub struct Account {
    /// Internal UUID identifier
    pub account_id: AccountId,
    /// Login email, stored exactly as provided
    pub email: Email,
    /// Argon2id PHC hash
    pub password_hash: AccountPassword,
    /// Role (Affiliate, Support, Manager, Admin, SuperAdmin)
    pub role: AccountRole,
    /// Whether the email address has been confirmed
    pub email_verified: bool,
    /// Administrative block, checked at login and on every guarded request
    pub blocked: bool,
    /// Soft-delete marker
    pub deleted_at: Option<DateTime<Utc>>,
    /// Outstanding email-verification token (opaque, single use)
    pub verification_token: Option<String>,
    pub verification_token_expires_at: Option<DateTime<Utc>>,
    /// Outstanding password-reset token (opaque, single use)
    pub reset_token: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new unverified account
    pub fn new(email: Email, password_hash: AccountPassword, role: AccountRole) -> Self {
        let now = Utc::now();

        Self {
            account_id: AccountId::new(),
            email,
            password_hash,
            role,
            email_verified: false,
            blocked: false,
            deleted_at: None,
            verification_token: None,
            verification_token_expires_at: None,
            reset_token: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an account that is verified from the start
    ///
    /// Used for admin-provisioned accounts, which skip the email loop.
    pub fn new_verified(email: Email, password_hash: AccountPassword, role: AccountRole) -> Self {
        let mut account = Self::new(email, password_hash, role);
        account.email_verified = true;
        account
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Issue a fresh verification token, replacing any outstanding one
    pub fn issue_verification_token(&mut self, token: String, expires_at: DateTime<Utc>) {
        self.verification_token = Some(token);
        self.verification_token_expires_at = Some(expires_at);
        self.updated_at = Utc::now();
    }

    /// Consume the verification token and mark the email verified
    pub fn mark_verified(&mut self) {
        self.email_verified = true;
        self.verification_token = None;
        self.verification_token_expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Issue a fresh password-reset token, replacing any outstanding one
    pub fn issue_reset_token(&mut self, token: String, expires_at: DateTime<Utc>) {
        self.reset_token = Some(token);
        self.reset_token_expires_at = Some(expires_at);
        self.updated_at = Utc::now();
    }

    /// Replace the password hash and consume any outstanding reset token
    pub fn set_password(&mut self, password_hash: AccountPassword) {
        self.password_hash = password_hash;
        self.reset_token = None;
        self.reset_token_expires_at = None;
        self.updated_at = Utc::now();
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
        self.updated_at = Utc::now();
    }

    /// Soft-delete: the row stays, the email stays occupied
    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}
