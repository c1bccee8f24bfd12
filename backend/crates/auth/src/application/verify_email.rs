//! Email Verification Use Case
//!
//! Consumes an opaque verification token from the emailed link. Tokens
//! are single use: the lookup only matches outstanding tokens, and
//! `mark_verified` clears the token.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

/// Email verification use case
pub struct VerifyEmailUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> VerifyEmailUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<()> {
        let mut account = self
            .repo
            .find_by_verification_token(token, Utc::now())
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        account.mark_verified();
        self.repo.update(&account).await?;

        tracing::info!(account_id = %account.account_id, "Email verified");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::account::Account;
    use crate::domain::value_object::{
        account_password::{AccountPassword, RawPassword},
        account_role::AccountRole,
        email::Email,
    };
    use crate::test_support::InMemoryAccountRepository;
    use chrono::Duration;

    fn account_with_token(token: &str, expires_in: Duration) -> Account {
        let raw = RawPassword::new("Password123!".to_string()).unwrap();
        let mut account = Account::new(
            Email::new("user@example.com").unwrap(),
            AccountPassword::from_raw(&raw).unwrap(),
            AccountRole::Affiliate,
        );
        account.issue_verification_token(token.to_string(), Utc::now() + expires_in);
        account
    }

    #[tokio::test]
    async fn test_valid_token_verifies_account() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let account = account_with_token("tok-1", Duration::hours(24));
        repo.insert(account.clone());

        VerifyEmailUseCase::new(repo.clone())
            .execute("tok-1")
            .await
            .unwrap();

        let stored = repo.get(&account.account_id).unwrap();
        assert!(stored.email_verified);
        assert!(stored.verification_token.is_none());
    }

    #[tokio::test]
    async fn test_token_is_single_use() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        repo.insert(account_with_token("tok-1", Duration::hours(24)));
        let use_case = VerifyEmailUseCase::new(repo);

        use_case.execute("tok-1").await.unwrap();
        let err = use_case.execute("tok-1").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        repo.insert(account_with_token("tok-1", Duration::hours(-1)));

        let err = VerifyEmailUseCase::new(repo)
            .execute("tok-1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let err = VerifyEmailUseCase::new(repo)
            .execute("nope")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidOrExpiredToken));
    }
}
