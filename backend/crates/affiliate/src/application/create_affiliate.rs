//! Admin Affiliate Creation Use Case
//!
//! Staff-provisioned affiliates skip the review queue entirely: the account
//! is verified from the start and the profile begins in `Active`. The slug
//! walk is the same bounded loop self-registration uses.

use std::sync::Arc;

use auth::domain::entity::account::Account;
use auth::domain::repository::AccountRepository;
use auth::domain::value_object::{
    account_password::{AccountPassword, RawPassword},
    account_role::AccountRole,
    affiliate_status::AffiliateStatus,
    email::Email,
};
use auth::error::AuthError;
use platform::notify::{NotificationGateway, TemplateStore, template};

use crate::application::config::AffiliateConfig;
use crate::domain::entity::affiliate::Affiliate;
use crate::domain::repository::{EnrollmentError, EnrollmentRepository};
use crate::domain::value_object::{commission::CommissionConfig, slug::Slug};
use crate::error::{AffiliateError, AffiliateResult};

/// Admin creation input
pub struct CreateAffiliateInput {
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub email: String,
    pub password: String,
    pub commission: CommissionConfig,
}

/// Admin affiliate creation use case
pub struct CreateAffiliateUseCase<E, A, N>
where
    E: EnrollmentRepository,
    A: AccountRepository,
    N: NotificationGateway,
{
    enrollment: Arc<E>,
    accounts: Arc<A>,
    gateway: Arc<N>,
    templates: Arc<TemplateStore>,
    config: Arc<AffiliateConfig>,
}

impl<E, A, N> CreateAffiliateUseCase<E, A, N>
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
        config: Arc<AffiliateConfig>,
    ) -> Self {
        Self {
            enrollment,
            accounts,
            gateway,
            templates,
            config,
        }
    }

    pub async fn execute(&self, input: CreateAffiliateInput) -> AffiliateResult<Affiliate> {
        let email =
            Email::new(&input.email).map_err(|e| AffiliateError::Validation(e.to_string()))?;

        if self.accounts.exists_by_email(&email).await? {
            return Err(AuthError::DuplicateEmail.into());
        }

        let raw = RawPassword::new(input.password)
            .map_err(|e| AffiliateError::Validation(e.to_string()))?;
        let password_hash = AccountPassword::from_raw(&raw)
            .map_err(|e| AffiliateError::Internal(e.to_string()))?;

        let account = Account::new_verified(email, password_hash, AccountRole::Affiliate);

        let base = Slug::base_from_name(&input.first_name, &input.last_name);
        let mut affiliate = Affiliate::new(
            account.account_id,
            input.first_name,
            input.last_name,
            input.company,
            Slug::from_db(&base),
            AffiliateStatus::Active,
            input.commission,
        );

        let mut claimed = false;
        for candidate in Slug::candidates(&base).take(self.config.max_slug_attempts as usize) {
            affiliate = affiliate.with_slug(candidate);

            match self.enrollment.create_enrollment(&account, &affiliate).await {
                Ok(()) => {
                    claimed = true;
                    break;
                }
                Err(EnrollmentError::SlugTaken) => continue,
                Err(EnrollmentError::EmailTaken) => return Err(AuthError::DuplicateEmail.into()),
                Err(EnrollmentError::Database(e)) => return Err(e.into()),
            }
        }
        if !claimed {
            return Err(AffiliateError::SlugExhausted);
        }

        self.send_welcome(&account, &affiliate).await;

        tracing::info!(
            account_id = %account.account_id,
            affiliate_id = %affiliate.affiliate_id,
            slug = %affiliate.slug,
            "Affiliate created by staff"
        );

        Ok(affiliate)
    }

    async fn send_welcome(&self, account: &Account, affiliate: &Affiliate) {
        let vars = [("first_name", affiliate.first_name.as_str())];

        let mail = match self.templates.render(template::APPLICATION_ACCEPTED, &vars) {
            Ok(mail) => mail,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to render welcome email");
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
            tracing::warn!(error = %e, "Failed to send welcome email");
        }
    }
}
