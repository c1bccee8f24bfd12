//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_id::AccountId, account_password::AccountPassword, account_role::AccountRole,
    affiliate_status::AffiliateStatus, email::Email,
};
use crate::error::{AuthError, AuthResult};

const ACCOUNT_COLUMNS: &str = r#"
    account_id,
    email,
    password_hash,
    role,
    email_verified,
    blocked,
    deleted_at,
    verification_token,
    verification_token_expires_at,
    reset_token,
    reset_token_expires_at,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                email,
                password_hash,
                role,
                email_verified,
                blocked,
                deleted_at,
                verification_token,
                verification_token_expires_at,
                reset_token,
                reset_token_expires_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.role.id())
        .bind(account.email_verified)
        .bind(account.blocked)
        .bind(account.deleted_at)
        .bind(&account.verification_token)
        .bind(account.verification_token_expires_at)
        .bind(&account.reset_token)
        .bind(account.reset_token_expires_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = $1"
        ))
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        // Soft-deleted rows keep their email occupied on purpose
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS} FROM accounts
            WHERE verification_token = $1
              AND verification_token_expires_at > $2
              AND deleted_at IS NULL
            "#
        ))
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS} FROM accounts
            WHERE reset_token = $1
              AND reset_token_expires_at > $2
              AND deleted_at IS NULL
            "#
        ))
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                email = $2,
                password_hash = $3,
                role = $4,
                email_verified = $5,
                blocked = $6,
                deleted_at = $7,
                verification_token = $8,
                verification_token_expires_at = $9,
                reset_token = $10,
                reset_token_expires_at = $11,
                updated_at = $12
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.role.id())
        .bind(account.email_verified)
        .bind(account.blocked)
        .bind(account.deleted_at)
        .bind(&account.verification_token)
        .bind(account.verification_token_expires_at)
        .bind(&account.reset_token)
        .bind(account.reset_token_expires_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn affiliate_status(
        &self,
        account_id: &AccountId,
    ) -> AuthResult<Option<AffiliateStatus>> {
        let status = sqlx::query_scalar::<_, i16>(
            "SELECT status FROM affiliates WHERE account_id = $1 AND deleted_at IS NULL",
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(status.map(AffiliateStatus::from_id))
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    email: String,
    password_hash: String,
    role: i16,
    email_verified: bool,
    blocked: bool,
    deleted_at: Option<DateTime<Utc>>,
    verification_token: Option<String>,
    verification_token_expires_at: Option<DateTime<Utc>>,
    reset_token: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        let password_hash = AccountPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            email: Email::from_db(self.email),
            password_hash,
            role: AccountRole::from_id(self.role),
            email_verified: self.email_verified,
            blocked: self.blocked,
            deleted_at: self.deleted_at,
            verification_token: self.verification_token,
            verification_token_expires_at: self.verification_token_expires_at,
            reset_token: self.reset_token,
            reset_token_expires_at: self.reset_token_expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
