//! Token Refresh Use Case
//!
//! Exchanges a valid refresh token for a fresh pair. The account is
//! reloaded so tokens issued before a block or deletion stop working at
//! the next refresh even without a revocation list.

use std::sync::Arc;

use crate::application::token::{TokenPair, TokenService};
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

/// Token refresh use case
pub struct RefreshUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> RefreshUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self.tokens.verify_refresh(refresh_token)?;
        let account_id = claims.account_id();

        let account = self
            .repo
            .find_by_id(&account_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if account.is_deleted() {
            return Err(AuthError::InvalidToken);
        }
        if account.blocked {
            return Err(AuthError::Blocked);
        }

        // New claims come from the live account, not the old token, so a
        // role change takes effect here.
        self.tokens.issue(&account)
    }
}
