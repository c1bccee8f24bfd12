//! Sign In Use Case
//!
//! Authenticates an account and issues a token pair.
//!
//! Unknown email, soft-deleted account, and wrong password all produce the
//! same `InvalidCredentials` error so the endpoint cannot be used to probe
//! which emails are registered.

use std::sync::Arc;

use kernel::id::AccountId;

use crate::application::token::{TokenPair, TokenService};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_password::RawPassword, account_role::AccountRole,
    affiliate_status::AffiliateStatus, email::Email,
};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output: token pair plus a summary of the signed-in account
///
/// The summary lets the portal render the session header (and a pending
/// affiliate's review status) without a follow-up request.
#[derive(Debug)]
pub struct SignInOutput {
    pub tokens: TokenPair,
    pub account_id: AccountId,
    pub email: String,
    pub role: AccountRole,
    /// None for staff accounts without an affiliate profile
    pub affiliate_status: Option<AffiliateStatus>,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> SignInUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let account = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if account.is_deleted() {
            return Err(AuthError::InvalidCredentials);
        }

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;
        if !account.password_hash.verify(&raw_password) {
            return Err(AuthError::InvalidCredentials);
        }

        if account.blocked {
            return Err(AuthError::Blocked);
        }
        if !account.email_verified {
            return Err(AuthError::EmailNotVerified);
        }

        // Pending affiliates may sign in; they are held back by the request
        // guard instead, so the portal can show them their review status.
        let affiliate_status = self.repo.affiliate_status(&account.account_id).await?;
        match affiliate_status {
            Some(AffiliateStatus::Rejected) => return Err(AuthError::ApplicationRejected),
            Some(AffiliateStatus::Disabled) => return Err(AuthError::AccountDisabled),
            Some(AffiliateStatus::Pending | AffiliateStatus::Active) | None => {}
        }

        let tokens = self.tokens.issue(&account)?;

        tracing::info!(account_id = %account.account_id, "Account signed in");

        Ok(SignInOutput {
            tokens,
            account_id: account.account_id,
            email: account.email.as_str().to_string(),
            role: account.role,
            affiliate_status,
        })
    }
}
