//! Password Reset Use Cases
//!
//! Two halves: requesting a reset link by email, and consuming the link.
//!
//! The request half always reports success, whether or not the email is
//! registered, and the mail itself is best-effort. The consume half is the
//! only place the opaque reset token is accepted.

use std::sync::Arc;

use chrono::{Duration, Utc};
use platform::crypto::one_time_token;
use platform::notify::{NotificationGateway, TemplateStore, template};

use crate::application::config::AuthConfig;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{account_password::RawPassword, email::Email};
use crate::error::{AuthError, AuthResult};

/// Request-a-reset-link use case
pub struct RequestPasswordResetUseCase<R, N>
where
    R: AccountRepository,
    N: NotificationGateway,
{
    repo: Arc<R>,
    gateway: Arc<N>,
    templates: Arc<TemplateStore>,
    config: Arc<AuthConfig>,
}

impl<R, N> RequestPasswordResetUseCase<R, N>
where
    R: AccountRepository,
    N: NotificationGateway,
{
    pub fn new(
        repo: Arc<R>,
        gateway: Arc<N>,
        templates: Arc<TemplateStore>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            repo,
            gateway,
            templates,
            config,
        }
    }

    /// Always returns Ok so the endpoint cannot be used to probe which
    /// emails are registered.
    pub async fn execute(&self, email: &str) -> AuthResult<()> {
        let Ok(email) = Email::new(email) else {
            return Ok(());
        };

        let Some(mut account) = self.repo.find_by_email(&email).await? else {
            return Ok(());
        };
        if account.is_deleted() {
            return Ok(());
        }

        let token = one_time_token();
        let ttl = Duration::from_std(self.config.reset_token_ttl)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        account.issue_reset_token(token.clone(), Utc::now() + ttl);
        self.repo.update(&account).await?;

        let reset_url = format!("{}/reset-password?token={}", self.config.portal_base_url, token);
        self.send_reset_mail(account.email.as_str(), &reset_url).await;

        Ok(())
    }

    async fn send_reset_mail(&self, to: &str, reset_url: &str) {
        let mail = match self
            .templates
            .render(template::PASSWORD_RESET, &[("reset_url", reset_url)])
        {
            Ok(mail) => mail,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to render password reset email");
                return;
            }
        };

        if let Err(e) = self
            .gateway
            .send(&[to.to_string()], &mail.subject, &mail.body)
            .await
        {
            tracing::warn!(error = %e, "Failed to send password reset email");
        }
    }
}

/// Consume-a-reset-link use case
pub struct ResetPasswordUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> ResetPasswordUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, token: &str, new_password: String) -> AuthResult<()> {
        let mut account = self
            .repo
            .find_by_reset_token(token, Utc::now())
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        let raw = RawPassword::new(new_password)?;
        let hash = crate::domain::value_object::account_password::AccountPassword::from_raw(&raw)?;

        account.set_password(hash);
        self.repo.update(&account).await?;

        tracing::info!(account_id = %account.account_id, "Password reset completed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::account::Account;
    use crate::domain::value_object::{
        account_password::AccountPassword, account_role::AccountRole,
    };
    use crate::test_support::{InMemoryAccountRepository, RecordingGateway};

    fn account(email: &str) -> Account {
        let raw = RawPassword::new("Password123!".to_string()).unwrap();
        Account::new_verified(
            Email::new(email).unwrap(),
            AccountPassword::from_raw(&raw).unwrap(),
            AccountRole::Affiliate,
        )
    }

    fn request_use_case(
        repo: Arc<InMemoryAccountRepository>,
        gateway: Arc<RecordingGateway>,
    ) -> RequestPasswordResetUseCase<InMemoryAccountRepository, RecordingGateway> {
        RequestPasswordResetUseCase::new(
            repo,
            gateway,
            Arc::new(TemplateStore::with_defaults()),
            Arc::new(AuthConfig::development()),
        )
    }

    #[tokio::test]
    async fn test_request_stores_token_and_sends_mail() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let gateway = Arc::new(RecordingGateway::new());
        let account = account("user@example.com");
        repo.insert(account.clone());

        request_use_case(repo.clone(), gateway.clone())
            .execute("user@example.com")
            .await
            .unwrap();

        let stored = repo.get(&account.account_id).unwrap();
        let token = stored.reset_token.clone().unwrap();

        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["user@example.com".to_string()]);
        assert!(sent[0].body.contains(&token));
    }

    #[tokio::test]
    async fn test_request_for_unknown_email_still_succeeds_silently() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let gateway = Arc::new(RecordingGateway::new());

        request_use_case(repo, gateway.clone())
            .execute("nobody@example.com")
            .await
            .unwrap();

        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_request_succeeds_even_when_mail_fails() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let gateway = Arc::new(RecordingGateway::failing());
        let account = account("user@example.com");
        repo.insert(account.clone());

        request_use_case(repo.clone(), gateway)
            .execute("user@example.com")
            .await
            .unwrap();

        // Token was still stored; only delivery failed
        assert!(repo.get(&account.account_id).unwrap().reset_token.is_some());
    }

    #[tokio::test]
    async fn test_reset_replaces_password_and_consumes_token() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let mut account = account("user@example.com");
        account.issue_reset_token("tok-1".into(), Utc::now() + chrono::Duration::hours(1));
        repo.insert(account.clone());

        ResetPasswordUseCase::new(repo.clone())
            .execute("tok-1", "NewPassword456!".to_string())
            .await
            .unwrap();

        let stored = repo.get(&account.account_id).unwrap();
        assert!(stored.reset_token.is_none());

        let new_raw = RawPassword::new("NewPassword456!".to_string()).unwrap();
        assert!(stored.password_hash.verify(&new_raw));
    }

    #[tokio::test]
    async fn test_reset_with_expired_token_rejected() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let mut account = account("user@example.com");
        account.issue_reset_token("tok-1".into(), Utc::now() - chrono::Duration::minutes(5));
        repo.insert(account);

        let err = ResetPasswordUseCase::new(repo)
            .execute("tok-1", "NewPassword456!".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn test_reset_rejects_weak_password() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let mut account = account("user@example.com");
        account.issue_reset_token("tok-1".into(), Utc::now() + chrono::Duration::hours(1));
        repo.insert(account.clone());

        let result = ResetPasswordUseCase::new(repo.clone())
            .execute("tok-1", "short".to_string())
            .await;
        assert!(result.is_err());

        // Token survives a failed attempt
        assert!(repo.get(&account.account_id).unwrap().reset_token.is_some());
    }
}
