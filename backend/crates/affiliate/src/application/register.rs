//! Affiliate Self-Registration Use Case
//!
//! Creates the account and its pending profile atomically, then fires the
//! best-effort notifications (verification email to the applicant, internal
//! notice to the admin address).
//!
//! Slug collisions are resolved against the database unique constraint:
//! each `SlugTaken` answer moves to the next candidate, bounded by
//! `max_slug_attempts`. No application-level lock is ever taken.

use std::sync::Arc;

use auth::application::config::AuthConfig;
use auth::domain::entity::account::Account;
use auth::domain::repository::AccountRepository;
use auth::domain::value_object::{
    account_password::{AccountPassword, RawPassword},
    account_role::AccountRole,
    affiliate_status::AffiliateStatus,
    email::Email,
};
use auth::error::AuthError;
use chrono::{Duration, Utc};
use kernel::id::{AccountId, AffiliateId};
use platform::captcha::CaptchaVerifier;
use platform::crypto::one_time_token;
use platform::notify::{NotificationGateway, TemplateStore, template};

use crate::application::config::AffiliateConfig;
use crate::domain::entity::affiliate::Affiliate;
use crate::domain::repository::{EnrollmentError, EnrollmentRepository};
use crate::domain::value_object::{commission::CommissionConfig, slug::Slug};
use crate::error::{AffiliateError, AffiliateResult};

/// Registration input
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub email: String,
    pub password: String,
    pub captcha_token: Option<String>,
    pub remote_addr: Option<String>,
}

/// Registration output
#[derive(Debug)]
pub struct RegisterOutput {
    pub account_id: AccountId,
    pub affiliate_id: AffiliateId,
    pub slug: Slug,
}

/// Affiliate self-registration use case
pub struct RegisterUseCase<E, A, N>
where
    E: EnrollmentRepository,
    A: AccountRepository,
    N: NotificationGateway,
{
    enrollment: Arc<E>,
    accounts: Arc<A>,
    gateway: Arc<N>,
    templates: Arc<TemplateStore>,
    captcha: Arc<CaptchaVerifier>,
    auth_config: Arc<AuthConfig>,
    config: Arc<AffiliateConfig>,
}

impl<E, A, N> RegisterUseCase<E, A, N>
where
    E: EnrollmentRepository,
    A: AccountRepository,
    N: NotificationGateway,
{
    pub fn new(
        enrollment: Arc<E>,
        accounts: Arc<A>,
        gateway: Arc<N>,
        templates: Arc<TemplateStore>,
        captcha: Arc<CaptchaVerifier>,
        auth_config: Arc<AuthConfig>,
        config: Arc<AffiliateConfig>,
    ) -> Self {
        Self {
            enrollment,
            accounts,
            gateway,
            templates,
            captcha,
            auth_config,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AffiliateResult<RegisterOutput> {
        let token = input.captcha_token.as_deref().unwrap_or_default();
        if !self.captcha.verify(token, input.remote_addr.as_deref()).await {
            return Err(AuthError::CaptchaFailed.into());
        }

        let email =
            Email::new(&input.email).map_err(|e| AffiliateError::Validation(e.to_string()))?;

        // Uniqueness includes soft-deleted rows: a deleted email stays taken
        if self.accounts.exists_by_email(&email).await? {
            return Err(AuthError::DuplicateEmail.into());
        }

        let raw = RawPassword::new(input.password)
            .map_err(|e| AffiliateError::Validation(e.to_string()))?;
        let password_hash = AccountPassword::from_raw(&raw)
            .map_err(|e| AffiliateError::Internal(e.to_string()))?;

        let mut account = Account::new(email, password_hash, AccountRole::Affiliate);
        let verification_token = one_time_token();
        let verification_ttl = Duration::from_std(self.auth_config.verification_token_ttl)
            .map_err(|e| AffiliateError::Internal(e.to_string()))?;
        account
            .issue_verification_token(verification_token.clone(), Utc::now() + verification_ttl);

        let base = Slug::base_from_name(&input.first_name, &input.last_name);
        let affiliate = Affiliate::new(
            account.account_id,
            input.first_name.clone(),
            input.last_name.clone(),
            input.company.clone(),
            Slug::from_db(&base),
            AffiliateStatus::Pending,
            CommissionConfig::default(),
        );

        let affiliate = self.claim_slug(&account, affiliate, &base).await?;

        self.send_verification_mail(&account, &affiliate, &verification_token)
            .await;
        self.send_admin_notice(&account, &affiliate).await;

        tracing::info!(
            account_id = %account.account_id,
            affiliate_id = %affiliate.affiliate_id,
            slug = %affiliate.slug,
            "Affiliate registered"
        );

        Ok(RegisterOutput {
            account_id: account.account_id,
            affiliate_id: affiliate.affiliate_id,
            slug: affiliate.slug,
        })
    }

    /// Bounded candidate walk; the DB unique constraint is the arbiter
    async fn claim_slug(
        &self,
        account: &Account,
        affiliate: Affiliate,
        base: &str,
    ) -> AffiliateResult<Affiliate> {
        let mut affiliate = affiliate;

        for candidate in Slug::candidates(base).take(self.config.max_slug_attempts as usize) {
            affiliate = affiliate.with_slug(candidate);

            match self.enrollment.create_enrollment(account, &affiliate).await {
                Ok(()) => return Ok(affiliate),
                Err(EnrollmentError::SlugTaken) => continue,
                // Lost a concurrent race on the email constraint
                Err(EnrollmentError::EmailTaken) => return Err(AuthError::DuplicateEmail.into()),
                Err(EnrollmentError::Database(e)) => return Err(e.into()),
            }
        }

        Err(AffiliateError::SlugExhausted)
    }

    async fn send_verification_mail(
        &self,
        account: &Account,
        affiliate: &Affiliate,
        token: &str,
    ) {
        let verify_url = format!(
            "{}/verify-email?token={}",
            self.auth_config.portal_base_url, token
        );
        let vars = [
            ("first_name", affiliate.first_name.as_str()),
            ("verify_url", verify_url.as_str()),
        ];

        let mail = match self.templates.render(template::VERIFY_EMAIL, &vars) {
            Ok(mail) => mail,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to render verification email");
                return;
            }
        };

        if let Err(e) = self
            .gateway
            .send(
                &[account.email.as_str().to_string()],
                &mail.subject,
                &mail.body,
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to send verification email");
        }
    }

    async fn send_admin_notice(&self, account: &Account, affiliate: &Affiliate) {
        let Some(admin_address) = self.config.admin_notice_address.clone() else {
            return;
        };

        let vars = [
            ("first_name", affiliate.first_name.as_str()),
            ("last_name", affiliate.last_name.as_str()),
            ("email", account.email.as_str()),
        ];

        let mail = match self.templates.render(template::NEW_AFFILIATE_NOTICE, &vars) {
            Ok(mail) => mail,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to render new-affiliate notice");
                return;
            }
        };

        if let Err(e) = self
            .gateway
            .send(&[admin_address], &mail.subject, &mail.body)
            .await
        {
            tracing::warn!(error = %e, "Failed to send new-affiliate notice");
        }
    }
}
