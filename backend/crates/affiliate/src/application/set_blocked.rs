//! Account Block Toggle Use Case
//!
//! Administrative block on the login account. Takes effect on the next
//! guarded request because the guard re-checks the live account row.

use std::sync::Arc;

use auth::domain::repository::AccountRepository;
use auth::error::AuthError;
use kernel::id::AccountId;

use crate::error::AffiliateResult;

/// Account block toggle use case
pub struct SetBlockedUseCase<A>
where
    A: AccountRepository,
{
    accounts: Arc<A>,
}

impl<A> SetBlockedUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }

    pub async fn execute(&self, account_id: &AccountId, blocked: bool) -> AffiliateResult<()> {
        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .filter(|a| !a.is_deleted())
            .ok_or(AuthError::NotFound)?;

        account.set_blocked(blocked);
        self.accounts.update(&account).await?;

        tracing::info!(account_id = %account.account_id, blocked, "Account block flag changed");

        Ok(())
    }
}
