//! Token Service
//!
//! Stateless signed access/refresh tokens. There is no revocation list:
//! a token is valid while its signature and expiry hold, and the guard
//! re-checks live account state on every request anyway.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::account::Account;
use crate::domain::value_object::{account_id::AccountId, account_role::AccountRole};
use crate::error::{AuthError, AuthResult};

/// Claims carried by both access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account UUID
    pub sub: Uuid,
    /// Login email at issue time (informational; guard reloads the account)
    pub email: String,
    /// Role id at issue time
    pub role: i16,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn account_id(&self) -> AccountId {
        AccountId::from_uuid(self.sub)
    }

    pub fn account_role(&self) -> AccountRole {
        AccountRole::from_id(self.role)
    }
}

/// Access + refresh token pair returned on login and refresh
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Issues and verifies signed tokens
///
/// Access and refresh tokens use independent HS256 secrets, so one kind
/// can never be presented where the other is expected.
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(&config.access_token_secret),
            access_decoding: DecodingKey::from_secret(&config.access_token_secret),
            refresh_encoding: EncodingKey::from_secret(&config.refresh_token_secret),
            refresh_decoding: DecodingKey::from_secret(&config.refresh_token_secret),
            access_ttl_secs: config.access_token_ttl.as_secs() as i64,
            refresh_ttl_secs: config.refresh_token_ttl.as_secs() as i64,
        }
    }

    /// Issue a fresh access/refresh pair for an account
    pub fn issue(&self, account: &Account) -> AuthResult<TokenPair> {
        let now = Utc::now().timestamp();

        let access_claims = Claims {
            sub: *account.account_id.as_uuid(),
            email: account.email.as_str().to_string(),
            role: account.role.id(),
            iat: now,
            exp: now + self.access_ttl_secs,
        };
        let refresh_claims = Claims {
            exp: now + self.refresh_ttl_secs,
            ..access_claims.clone()
        };

        let access_token = encode(&Header::default(), &access_claims, &self.access_encoding)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {}", e)))?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &self.refresh_encoding)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {}", e)))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl_secs,
        })
    }

    /// Verify an access token's signature and expiry
    pub fn verify_access(&self, token: &str) -> AuthResult<Claims> {
        Self::verify(token, &self.access_decoding)
    }

    /// Verify a refresh token's signature and expiry
    pub fn verify_refresh(&self, token: &str) -> AuthResult<Claims> {
        Self::verify(token, &self.refresh_decoding)
    }

    fn verify(token: &str, key: &DecodingKey) -> AuthResult<Claims> {
        let validation = Validation::default();
        decode::<Claims>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        account_password::{AccountPassword, RawPassword},
        email::Email,
    };

    fn service() -> TokenService {
        TokenService::new(&AuthConfig::development())
    }

    fn account() -> Account {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        Account::new(
            Email::new("user@example.com").unwrap(),
            AccountPassword::from_raw(&raw).unwrap(),
            AccountRole::Affiliate,
        )
    }

    #[test]
    fn test_issue_and_verify_access() {
        let service = service();
        let account = account();

        let pair = service.issue(&account).unwrap();
        let claims = service.verify_access(&pair.access_token).unwrap();

        assert_eq!(claims.sub, *account.account_id.as_uuid());
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.account_role(), AccountRole::Affiliate);
    }

    #[test]
    fn test_token_kinds_not_interchangeable() {
        let service = service();
        let pair = service.issue(&account()).unwrap();

        // A refresh token must not pass access verification, and vice versa
        assert!(service.verify_access(&pair.refresh_token).is_err());
        assert!(service.verify_refresh(&pair.access_token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = service();
        assert!(matches!(
            service.verify_access("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tokens_from_other_secret_rejected() {
        let a = TokenService::new(&AuthConfig::development());
        let b = TokenService::new(&AuthConfig::development());

        let pair = a.issue(&account()).unwrap();
        assert!(b.verify_access(&pair.access_token).is_err());
    }
}
