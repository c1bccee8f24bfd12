//! Change Password Use Case
//!
//! Authenticated password change; requires the current password even
//! though the caller already holds a valid access token.

use std::sync::Arc;

use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_id::AccountId,
    account_password::{AccountPassword, RawPassword},
};
use crate::error::{AuthError, AuthResult};

/// Change password use case
pub struct ChangePasswordUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> ChangePasswordUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        account_id: &AccountId,
        current_password: String,
        new_password: String,
    ) -> AuthResult<()> {
        let mut account = self
            .repo
            .find_by_id(account_id)
            .await?
            .filter(|a| !a.is_deleted())
            .ok_or(AuthError::NotFound)?;

        let current =
            RawPassword::new(current_password).map_err(|_| AuthError::IncorrectCurrentPassword)?;
        if !account.password_hash.verify(&current) {
            return Err(AuthError::IncorrectCurrentPassword);
        }

        let new_raw = RawPassword::new(new_password)?;
        account.set_password(AccountPassword::from_raw(&new_raw)?);
        self.repo.update(&account).await?;

        tracing::info!(account_id = %account.account_id, "Password changed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::account::Account;
    use crate::domain::value_object::{account_role::AccountRole, email::Email};
    use crate::test_support::InMemoryAccountRepository;

    fn account() -> Account {
        let raw = RawPassword::new("Password123!".to_string()).unwrap();
        Account::new_verified(
            Email::new("user@example.com").unwrap(),
            AccountPassword::from_raw(&raw).unwrap(),
            AccountRole::Affiliate,
        )
    }

    #[tokio::test]
    async fn test_change_password_success() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let account = account();
        repo.insert(account.clone());

        ChangePasswordUseCase::new(repo.clone())
            .execute(
                &account.account_id,
                "Password123!".to_string(),
                "NewPassword456!".to_string(),
            )
            .await
            .unwrap();

        let stored = repo.get(&account.account_id).unwrap();
        let new_raw = RawPassword::new("NewPassword456!".to_string()).unwrap();
        assert!(stored.password_hash.verify(&new_raw));
    }

    #[tokio::test]
    async fn test_wrong_current_password_rejected() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let account = account();
        repo.insert(account.clone());

        let err = ChangePasswordUseCase::new(repo)
            .execute(
                &account.account_id,
                "WrongPassword1!".to_string(),
                "NewPassword456!".to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::IncorrectCurrentPassword));
    }

    #[tokio::test]
    async fn test_deleted_account_rejected() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let mut account = account();
        account.soft_delete();
        repo.insert(account.clone());

        let err = ChangePasswordUseCase::new(repo)
            .execute(
                &account.account_id,
                "Password123!".to_string(),
                "NewPassword456!".to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }
}
