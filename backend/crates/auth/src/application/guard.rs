//! Request Guard
//!
//! Per-request authentication and state check. Runs on every guarded
//! endpoint: a valid token is necessary but never sufficient, the live
//! account and affiliate state decide.
//!
//! Check order (first failure wins):
//! 1. token signature and expiry
//! 2. account exists and is not soft-deleted
//! 3. account not blocked
//! 4. email verified
//! 5. affiliate status: rejected, pending, disabled all refuse
//!
//! Note the asymmetry with sign-in: pending affiliates can log in to see
//! their review status, but the guard holds them out of the API proper.

use std::sync::Arc;

use crate::application::token::TokenService;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_id::AccountId,
    account_role::{AccountRole, Capability},
    affiliate_status::AffiliateStatus,
};
use crate::error::{AuthError, AuthResult};

/// Authenticated request context, inserted as an axum extension
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub account_id: AccountId,
    pub role: AccountRole,
    pub email: String,
}

impl AuthContext {
    pub fn allows(&self, capability: Capability) -> bool {
        self.role.allows(capability)
    }
}

/// Per-request guard over token service + account repository
pub struct RequestGuard<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> RequestGuard<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    /// Authenticate a bearer access token and re-check live state
    pub async fn authenticate(&self, access_token: &str) -> AuthResult<AuthContext> {
        let claims = self.tokens.verify_access(access_token)?;
        let account_id = claims.account_id();

        let account = self
            .repo
            .find_by_id(&account_id)
            .await?
            .filter(|a| !a.is_deleted())
            .ok_or(AuthError::NotFound)?;

        if account.blocked {
            return Err(AuthError::Blocked);
        }
        if !account.email_verified {
            return Err(AuthError::EmailNotVerified);
        }

        match self.repo.affiliate_status(&account.account_id).await? {
            Some(AffiliateStatus::Rejected) => return Err(AuthError::ApplicationRejected),
            Some(AffiliateStatus::Pending) => return Err(AuthError::RegistrationPending),
            Some(AffiliateStatus::Disabled) => return Err(AuthError::AccountDisabled),
            Some(AffiliateStatus::Active) | None => {}
        }

        Ok(AuthContext {
            account_id: account.account_id,
            // Live role from the database, not the token
            role: account.role,
            email: account.email.as_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::domain::entity::account::Account;
    use crate::domain::value_object::{
        account_password::{AccountPassword, RawPassword},
        email::Email,
    };
    use crate::test_support::InMemoryAccountRepository;

    fn account(role: AccountRole) -> Account {
        let raw = RawPassword::new("Password123!".to_string()).unwrap();
        Account::new_verified(
            Email::new("user@example.com").unwrap(),
            AccountPassword::from_raw(&raw).unwrap(),
            role,
        )
    }

    fn setup() -> (
        Arc<InMemoryAccountRepository>,
        Arc<TokenService>,
        RequestGuard<InMemoryAccountRepository>,
    ) {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let tokens = Arc::new(TokenService::new(&AuthConfig::development()));
        let guard = RequestGuard::new(repo.clone(), tokens.clone());
        (repo, tokens, guard)
    }

    #[tokio::test]
    async fn test_active_affiliate_passes() {
        let (repo, tokens, guard) = setup();
        let account = account(AccountRole::Affiliate);
        repo.insert(account.clone());
        repo.set_affiliate_status(&account.account_id, AffiliateStatus::Active);

        let pair = tokens.issue(&account).unwrap();
        let ctx = guard.authenticate(&pair.access_token).await.unwrap();
        assert_eq!(ctx.account_id, account.account_id);
        assert!(ctx.allows(Capability::ReadOwn));
        assert!(!ctx.allows(Capability::ReadAll));
    }

    #[tokio::test]
    async fn test_pending_affiliate_rejected_despite_valid_token() {
        let (repo, tokens, guard) = setup();
        let account = account(AccountRole::Affiliate);
        repo.insert(account.clone());
        repo.set_affiliate_status(&account.account_id, AffiliateStatus::Pending);

        let pair = tokens.issue(&account).unwrap();
        let err = guard.authenticate(&pair.access_token).await.unwrap_err();
        assert!(matches!(err, AuthError::RegistrationPending));
    }

    #[tokio::test]
    async fn test_rejected_and_disabled_affiliates_refused() {
        let (repo, tokens, guard) = setup();
        let account = account(AccountRole::Affiliate);
        repo.insert(account.clone());
        let pair = tokens.issue(&account).unwrap();

        repo.set_affiliate_status(&account.account_id, AffiliateStatus::Rejected);
        assert!(matches!(
            guard.authenticate(&pair.access_token).await.unwrap_err(),
            AuthError::ApplicationRejected
        ));

        repo.set_affiliate_status(&account.account_id, AffiliateStatus::Disabled);
        assert!(matches!(
            guard.authenticate(&pair.access_token).await.unwrap_err(),
            AuthError::AccountDisabled
        ));
    }

    #[tokio::test]
    async fn test_token_outlives_account_deletion() {
        let (repo, tokens, guard) = setup();
        let mut account = account(AccountRole::Affiliate);
        repo.insert(account.clone());
        let pair = tokens.issue(&account).unwrap();

        account.soft_delete();
        repo.insert(account);

        let err = guard.authenticate(&pair.access_token).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn test_block_takes_effect_immediately() {
        let (repo, tokens, guard) = setup();
        let mut account = account(AccountRole::Affiliate);
        repo.insert(account.clone());
        repo.set_affiliate_status(&account.account_id, AffiliateStatus::Active);
        let pair = tokens.issue(&account).unwrap();

        account.set_blocked(true);
        repo.insert(account);

        let err = guard.authenticate(&pair.access_token).await.unwrap_err();
        assert!(matches!(err, AuthError::Blocked));
    }

    #[tokio::test]
    async fn test_role_comes_from_live_account_not_token() {
        let (repo, tokens, guard) = setup();
        let mut account = account(AccountRole::Support);
        repo.insert(account.clone());
        let pair = tokens.issue(&account).unwrap();

        account.role = AccountRole::Manager;
        repo.insert(account.clone());

        let ctx = guard.authenticate(&pair.access_token).await.unwrap();
        assert_eq!(ctx.role, AccountRole::Manager);
    }

    // Pins the sign-in/guard asymmetry for pending affiliates: login works,
    // the first guarded call does not. Flagged for product sign-off.
    #[tokio::test]
    async fn test_pending_affiliate_can_sign_in_but_guard_rejects() {
        use crate::application::sign_in::{SignInInput, SignInUseCase};

        let (repo, tokens, guard) = setup();
        let account = account(AccountRole::Affiliate);
        repo.insert(account.clone());
        repo.set_affiliate_status(&account.account_id, AffiliateStatus::Pending);

        let output = SignInUseCase::new(repo.clone(), tokens.clone())
            .execute(SignInInput {
                email: "user@example.com".to_string(),
                password: "Password123!".to_string(),
            })
            .await
            .unwrap();

        let err = guard
            .authenticate(&output.tokens.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RegistrationPending));
    }

    #[tokio::test]
    async fn test_staff_without_profile_passes() {
        let (repo, tokens, guard) = setup();
        let account = account(AccountRole::Admin);
        repo.insert(account.clone());

        let pair = tokens.issue(&account).unwrap();
        let ctx = guard.authenticate(&pair.access_token).await.unwrap();
        assert!(ctx.allows(Capability::AdminManage));
    }
}
