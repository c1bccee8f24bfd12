//! PostgreSQL Repository Implementations
//!
//! One pool-backed type implements all three partner repository traits so
//! the enrollment transaction can span accounts and affiliates.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use auth::domain::entity::account::Account;
use auth::domain::value_object::affiliate_status::AffiliateStatus;
use kernel::id::{AccountId, AffiliateId, ReferralId};

use crate::domain::entity::{affiliate::Affiliate, referral::Referral};
use crate::domain::repository::{
    AffiliateRepository, EnrollmentError, EnrollmentRepository, ReferralRepository,
};
use crate::domain::value_object::{
    commission::{CommissionConfig, RateType},
    referral_status::{PaymentStatus, ReferralStatus},
    referred_party::ReferredParty,
    slug::Slug,
};
use crate::error::{AffiliateError, AffiliateResult};

const AFFILIATE_COLUMNS: &str = r#"
    affiliate_id,
    account_id,
    first_name,
    last_name,
    company,
    slug,
    status,
    rate_type,
    rate_value,
    payment_term_days,
    currency,
    deleted_at,
    created_at,
    updated_at
"#;

const REFERRAL_COLUMNS: &str = r#"
    referral_id,
    affiliate_id,
    party_kind,
    first_name,
    last_name,
    company_name,
    email,
    phone,
    status,
    payment_status,
    entered_at,
    paid_at,
    internal_note,
    public_note,
    deleted_at,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed partner repository
#[derive(Clone)]
pub struct PgPartnerRepository {
    pool: PgPool,
}

impl PgPartnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AffiliateRepository for PgPartnerRepository {
    async fn find_by_id(&self, affiliate_id: &AffiliateId) -> AffiliateResult<Option<Affiliate>> {
        let row = sqlx::query_as::<_, AffiliateRow>(&format!(
            "SELECT {AFFILIATE_COLUMNS} FROM affiliates WHERE affiliate_id = $1 AND deleted_at IS NULL"
        ))
        .bind(affiliate_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_affiliate()))
    }

    async fn find_by_account_id(
        &self,
        account_id: &AccountId,
    ) -> AffiliateResult<Option<Affiliate>> {
        let row = sqlx::query_as::<_, AffiliateRow>(&format!(
            "SELECT {AFFILIATE_COLUMNS} FROM affiliates WHERE account_id = $1 AND deleted_at IS NULL"
        ))
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_affiliate()))
    }

    async fn find_by_slug(&self, slug: &Slug) -> AffiliateResult<Option<Affiliate>> {
        let row = sqlx::query_as::<_, AffiliateRow>(&format!(
            "SELECT {AFFILIATE_COLUMNS} FROM affiliates WHERE slug = $1 AND deleted_at IS NULL"
        ))
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_affiliate()))
    }

    async fn update(&self, affiliate: &Affiliate) -> AffiliateResult<()> {
        sqlx::query(
            r#"
            UPDATE affiliates SET
                first_name = $2,
                last_name = $3,
                company = $4,
                status = $5,
                rate_type = $6,
                rate_value = $7,
                payment_term_days = $8,
                currency = $9,
                deleted_at = $10,
                updated_at = $11
            WHERE affiliate_id = $1
            "#,
        )
        .bind(affiliate.affiliate_id.as_uuid())
        .bind(&affiliate.first_name)
        .bind(&affiliate.last_name)
        .bind(&affiliate.company)
        .bind(affiliate.status.id())
        .bind(affiliate.commission.rate_type.id())
        .bind(affiliate.commission.rate_value)
        .bind(affiliate.commission.payment_term_days)
        .bind(&affiliate.commission.currency)
        .bind(affiliate.deleted_at)
        .bind(affiliate.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl ReferralRepository for PgPartnerRepository {
    async fn create(&self, referral: &Referral) -> AffiliateResult<()> {
        let fields = PartyFields::from_party(&referral.party);

        sqlx::query(
            r#"
            INSERT INTO referrals (
                referral_id,
                affiliate_id,
                party_kind,
                first_name,
                last_name,
                company_name,
                email,
                phone,
                status,
                payment_status,
                entered_at,
                paid_at,
                internal_note,
                public_note,
                deleted_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(referral.referral_id.as_uuid())
        .bind(referral.affiliate_id.as_uuid())
        .bind(fields.kind)
        .bind(fields.first_name)
        .bind(fields.last_name)
        .bind(fields.company_name)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(referral.status.id())
        .bind(referral.payment_status.id())
        .bind(referral.entered_at)
        .bind(referral.paid_at)
        .bind(&referral.internal_note)
        .bind(&referral.public_note)
        .bind(referral.deleted_at)
        .bind(referral.created_at)
        .bind(referral.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, referral_id: &ReferralId) -> AffiliateResult<Option<Referral>> {
        let row = sqlx::query_as::<_, ReferralRow>(&format!(
            "SELECT {REFERRAL_COLUMNS} FROM referrals WHERE referral_id = $1 AND deleted_at IS NULL"
        ))
        .bind(referral_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_referral()).transpose()
    }

    async fn update(&self, referral: &Referral) -> AffiliateResult<()> {
        sqlx::query(
            r#"
            UPDATE referrals SET
                status = $2,
                payment_status = $3,
                paid_at = $4,
                internal_note = $5,
                public_note = $6,
                deleted_at = $7,
                updated_at = $8
            WHERE referral_id = $1
            "#,
        )
        .bind(referral.referral_id.as_uuid())
        .bind(referral.status.id())
        .bind(referral.payment_status.id())
        .bind(referral.paid_at)
        .bind(&referral.internal_note)
        .bind(&referral.public_note)
        .bind(referral.deleted_at)
        .bind(referral.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_all(&self) -> AffiliateResult<Vec<Referral>> {
        let rows = sqlx::query_as::<_, ReferralRow>(&format!(
            "SELECT {REFERRAL_COLUMNS} FROM referrals WHERE deleted_at IS NULL ORDER BY entered_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_referral()).collect()
    }

    async fn list_by_affiliate(
        &self,
        affiliate_id: &AffiliateId,
    ) -> AffiliateResult<Vec<Referral>> {
        let rows = sqlx::query_as::<_, ReferralRow>(&format!(
            r#"
            SELECT {REFERRAL_COLUMNS} FROM referrals
            WHERE affiliate_id = $1 AND deleted_at IS NULL
            ORDER BY entered_at DESC
            "#
        ))
        .bind(affiliate_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_referral()).collect()
    }
}

impl EnrollmentRepository for PgPartnerRepository {
    async fn create_enrollment(
        &self,
        account: &Account,
        affiliate: &Affiliate,
    ) -> Result<(), EnrollmentError> {
        let mut tx = self.pool.begin().await?;

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
        .execute(&mut *tx)
        .await
        .map_err(classify_enrollment_error)?;

        sqlx::query(
            r#"
            INSERT INTO affiliates (
                affiliate_id,
                account_id,
                first_name,
                last_name,
                company,
                slug,
                status,
                rate_type,
                rate_value,
                payment_term_days,
                currency,
                deleted_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(affiliate.affiliate_id.as_uuid())
        .bind(affiliate.account_id.as_uuid())
        .bind(&affiliate.first_name)
        .bind(&affiliate.last_name)
        .bind(&affiliate.company)
        .bind(affiliate.slug.as_str())
        .bind(affiliate.status.id())
        .bind(affiliate.commission.rate_type.id())
        .bind(affiliate.commission.rate_value)
        .bind(affiliate.commission.payment_term_days)
        .bind(&affiliate.commission.currency)
        .bind(affiliate.deleted_at)
        .bind(affiliate.created_at)
        .bind(affiliate.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(classify_enrollment_error)?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_enrollment(&self, affiliate: &Affiliate) -> AffiliateResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE referrals SET deleted_at = $2, updated_at = $2
            WHERE affiliate_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(affiliate.affiliate_id.as_uuid())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE affiliates SET deleted_at = $2, updated_at = $2
            WHERE affiliate_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(affiliate.affiliate_id.as_uuid())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE accounts SET deleted_at = $2, updated_at = $2
            WHERE account_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(affiliate.account_id.as_uuid())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Map the two unique constraints the registration loop retries on
fn classify_enrollment_error(e: sqlx::Error) -> EnrollmentError {
    if let sqlx::Error::Database(ref db_err) = e {
        match db_err.constraint() {
            Some("accounts_email_key") => return EnrollmentError::EmailTaken,
            Some("affiliates_slug_key") => return EnrollmentError::SlugTaken,
            _ => {}
        }
    }
    EnrollmentError::Database(e)
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AffiliateRow {
    affiliate_id: Uuid,
    account_id: Uuid,
    first_name: String,
    last_name: String,
    company: Option<String>,
    slug: String,
    status: i16,
    rate_type: i16,
    rate_value: f64,
    payment_term_days: i32,
    currency: String,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AffiliateRow {
    fn into_affiliate(self) -> Affiliate {
        Affiliate {
            affiliate_id: AffiliateId::from_uuid(self.affiliate_id),
            account_id: AccountId::from_uuid(self.account_id),
            first_name: self.first_name,
            last_name: self.last_name,
            company: self.company,
            slug: Slug::from_db(self.slug),
            status: AffiliateStatus::from_id(self.status),
            commission: CommissionConfig {
                rate_type: RateType::from_id(self.rate_type),
                rate_value: self.rate_value,
                payment_term_days: self.payment_term_days,
                currency: self.currency,
            },
            deleted_at: self.deleted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

struct PartyFields {
    kind: i16,
    first_name: Option<String>,
    last_name: Option<String>,
    company_name: Option<String>,
    email: String,
    phone: Option<String>,
}

impl PartyFields {
    fn from_party(party: &ReferredParty) -> Self {
        match party {
            ReferredParty::Individual {
                first_name,
                last_name,
                email,
                phone,
            } => Self {
                kind: party.kind(),
                first_name: Some(first_name.clone()),
                last_name: Some(last_name.clone()),
                company_name: None,
                email: email.clone(),
                phone: phone.clone(),
            },
            ReferredParty::Company {
                company_name,
                email,
                phone,
            } => Self {
                kind: party.kind(),
                first_name: None,
                last_name: None,
                company_name: Some(company_name.clone()),
                email: email.clone(),
                phone: phone.clone(),
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReferralRow {
    referral_id: Uuid,
    affiliate_id: Uuid,
    party_kind: i16,
    first_name: Option<String>,
    last_name: Option<String>,
    company_name: Option<String>,
    email: String,
    phone: Option<String>,
    status: i16,
    payment_status: i16,
    entered_at: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
    internal_note: Option<String>,
    public_note: Option<String>,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReferralRow {
    fn into_referral(self) -> AffiliateResult<Referral> {
        let party = match self.party_kind {
            0 => ReferredParty::Individual {
                first_name: self.first_name.unwrap_or_default(),
                last_name: self.last_name.unwrap_or_default(),
                email: self.email,
                phone: self.phone,
            },
            1 => ReferredParty::Company {
                company_name: self.company_name.unwrap_or_default(),
                email: self.email,
                phone: self.phone,
            },
            other => {
                return Err(AffiliateError::Internal(format!(
                    "Invalid referral party kind: {}",
                    other
                )));
            }
        };

        Ok(Referral {
            referral_id: ReferralId::from_uuid(self.referral_id),
            affiliate_id: AffiliateId::from_uuid(self.affiliate_id),
            party,
            status: ReferralStatus::from_id(self.status),
            payment_status: PaymentStatus::from_id(self.payment_status),
            entered_at: self.entered_at,
            paid_at: self.paid_at,
            internal_note: self.internal_note,
            public_note: self.public_note,
            deleted_at: self.deleted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
