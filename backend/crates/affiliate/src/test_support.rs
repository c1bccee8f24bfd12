//! In-memory test doubles shared by the use-case tests.
//!
//! One shared state backs both the partner store and the account repository,
//! so an enrollment created through [`InMemoryPartnerStore`] is visible to
//! auth-side lookups the way it would be with one database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use auth::domain::entity::account::Account;
use auth::domain::repository::AccountRepository;
use auth::domain::value_object::{
    account_password::{AccountPassword, RawPassword},
    account_role::AccountRole,
    affiliate_status::AffiliateStatus,
    email::Email,
};
use auth::error::AuthResult;
use chrono::{DateTime, Utc};
use kernel::id::{AccountId, AffiliateId, ReferralId};
use platform::notify::{NotificationGateway, NotifyError};

use crate::domain::entity::{affiliate::Affiliate, referral::Referral};
use crate::domain::repository::{
    AffiliateRepository, EnrollmentError, EnrollmentRepository, ReferralRepository,
};
use crate::domain::value_object::{commission::CommissionConfig, slug::Slug};
use crate::error::AffiliateResult;

#[derive(Default)]
struct PartnerState {
    accounts: HashMap<AccountId, Account>,
    affiliates: HashMap<AffiliateId, Affiliate>,
    referrals: Vec<Referral>,
}

/// In-memory store implementing all three partner repository traits
pub struct InMemoryPartnerStore {
    state: Arc<Mutex<PartnerState>>,
}

impl InMemoryPartnerStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PartnerState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PartnerState> {
        self.state.lock().unwrap()
    }

    /// Raw lookup, soft-deleted rows included
    pub fn get_affiliate(&self, affiliate_id: &AffiliateId) -> Option<Affiliate> {
        self.lock().affiliates.get(affiliate_id).cloned()
    }

    /// Raw lookup, soft-deleted rows included
    pub fn get_account(&self, account_id: &AccountId) -> Option<Account> {
        self.lock().accounts.get(account_id).cloned()
    }

    /// Resolve a slug to a live affiliate
    pub fn resolve_slug(&self, slug: &str) -> Option<AffiliateId> {
        self.lock()
            .affiliates
            .values()
            .find(|a| !a.is_deleted() && a.slug.as_str() == slug)
            .map(|a| a.affiliate_id)
    }

    pub fn insert_referral(&self, referral: Referral) -> Referral {
        self.lock().referrals.push(referral.clone());
        referral
    }

    pub fn live_referrals(&self, affiliate_id: &AffiliateId) -> Vec<Referral> {
        self.lock()
            .referrals
            .iter()
            .filter(|r| !r.is_deleted() && r.affiliate_id == *affiliate_id)
            .cloned()
            .collect()
    }
}

impl AffiliateRepository for InMemoryPartnerStore {
    async fn find_by_id(&self, affiliate_id: &AffiliateId) -> AffiliateResult<Option<Affiliate>> {
        Ok(self
            .lock()
            .affiliates
            .get(affiliate_id)
            .filter(|a| !a.is_deleted())
            .cloned())
    }

    async fn find_by_account_id(
        &self,
        account_id: &AccountId,
    ) -> AffiliateResult<Option<Affiliate>> {
        Ok(self
            .lock()
            .affiliates
            .values()
            .find(|a| !a.is_deleted() && a.account_id == *account_id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> AffiliateResult<Option<Affiliate>> {
        Ok(self
            .lock()
            .affiliates
            .values()
            .find(|a| !a.is_deleted() && a.slug == *slug)
            .cloned())
    }

    async fn update(&self, affiliate: &Affiliate) -> AffiliateResult<()> {
        self.lock()
            .affiliates
            .insert(affiliate.affiliate_id, affiliate.clone());
        Ok(())
    }
}

impl ReferralRepository for InMemoryPartnerStore {
    async fn create(&self, referral: &Referral) -> AffiliateResult<()> {
        self.lock().referrals.push(referral.clone());
        Ok(())
    }

    async fn find_by_id(&self, referral_id: &ReferralId) -> AffiliateResult<Option<Referral>> {
        Ok(self
            .lock()
            .referrals
            .iter()
            .find(|r| !r.is_deleted() && r.referral_id == *referral_id)
            .cloned())
    }

    async fn update(&self, referral: &Referral) -> AffiliateResult<()> {
        let mut state = self.lock();
        if let Some(slot) = state
            .referrals
            .iter_mut()
            .find(|r| r.referral_id == referral.referral_id)
        {
            *slot = referral.clone();
        }
        Ok(())
    }

    async fn list_all(&self) -> AffiliateResult<Vec<Referral>> {
        let mut listed: Vec<Referral> = self
            .lock()
            .referrals
            .iter()
            .filter(|r| !r.is_deleted())
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.entered_at.cmp(&a.entered_at));
        Ok(listed)
    }

    async fn list_by_affiliate(
        &self,
        affiliate_id: &AffiliateId,
    ) -> AffiliateResult<Vec<Referral>> {
        let mut listed = self.live_referrals(affiliate_id);
        listed.sort_by(|a, b| b.entered_at.cmp(&a.entered_at));
        Ok(listed)
    }
}

impl EnrollmentRepository for InMemoryPartnerStore {
    async fn create_enrollment(
        &self,
        account: &Account,
        affiliate: &Affiliate,
    ) -> Result<(), EnrollmentError> {
        let mut state = self.lock();

        // Unique constraints cover soft-deleted rows too
        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(EnrollmentError::EmailTaken);
        }
        if state.affiliates.values().any(|a| a.slug == affiliate.slug) {
            return Err(EnrollmentError::SlugTaken);
        }

        state.accounts.insert(account.account_id, account.clone());
        state
            .affiliates
            .insert(affiliate.affiliate_id, affiliate.clone());
        Ok(())
    }

    async fn delete_enrollment(&self, affiliate: &Affiliate) -> AffiliateResult<()> {
        let mut state = self.lock();

        for referral in state
            .referrals
            .iter_mut()
            .filter(|r| r.affiliate_id == affiliate.affiliate_id)
        {
            referral.soft_delete();
        }
        if let Some(profile) = state.affiliates.get_mut(&affiliate.affiliate_id) {
            profile.soft_delete();
        }
        if let Some(account) = state.accounts.get_mut(&affiliate.account_id) {
            account.soft_delete();
        }
        Ok(())
    }
}

/// Account repository view over the same shared state
pub struct InMemoryAccounts {
    state: Arc<Mutex<PartnerState>>,
}

impl InMemoryAccounts {
    pub fn shared_with(store: &Arc<InMemoryPartnerStore>) -> Self {
        Self {
            state: store.state.clone(),
        }
    }

    pub fn soft_delete_all(&self) {
        let mut state = self.state.lock().unwrap();
        for account in state.accounts.values_mut() {
            account.soft_delete();
        }
        for affiliate in state.affiliates.values_mut() {
            affiliate.soft_delete();
        }
    }
}

impl AccountRepository for InMemoryAccounts {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(account.account_id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        Ok(self.state.lock().unwrap().accounts.get(account_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .accounts
            .values()
            .find(|a| a.email == *email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .accounts
            .values()
            .any(|a| a.email == *email))
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Account>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .accounts
            .values()
            .find(|a| {
                a.verification_token.as_deref() == Some(token)
                    && a.verification_token_expires_at.is_some_and(|exp| exp > now)
            })
            .cloned())
    }

    async fn find_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Account>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .accounts
            .values()
            .find(|a| {
                a.reset_token.as_deref() == Some(token)
                    && a.reset_token_expires_at.is_some_and(|exp| exp > now)
            })
            .cloned())
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(account.account_id, account.clone());
        Ok(())
    }

    async fn affiliate_status(
        &self,
        account_id: &AccountId,
    ) -> AuthResult<Option<AffiliateStatus>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .affiliates
            .values()
            .find(|a| !a.is_deleted() && a.account_id == *account_id)
            .map(|a| a.status))
    }
}

/// One captured outbound email
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Recording notification gateway; optionally fails every send
pub struct RecordingGateway {
    sent: Mutex<Vec<SentMail>>,
    fail: bool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationGateway for RecordingGateway {
    async fn send(&self, to: &[String], subject: &str, body: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport("test transport down".to_string()));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_vec(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Seed a verified account plus profile directly into the store
pub fn enroll(
    store: &Arc<InMemoryPartnerStore>,
    email: &str,
    status: AffiliateStatus,
) -> Affiliate {
    enroll_full(store, email, status, CommissionConfig::default())
}

/// Seed an active affiliate with a specific commission setup
pub fn enroll_with_commission(
    store: &Arc<InMemoryPartnerStore>,
    email: &str,
    commission: CommissionConfig,
) -> Affiliate {
    enroll_full(store, email, AffiliateStatus::Active, commission)
}

fn enroll_full(
    store: &Arc<InMemoryPartnerStore>,
    email: &str,
    status: AffiliateStatus,
    commission: CommissionConfig,
) -> Affiliate {
    let raw = RawPassword::new("Password123!".to_string()).unwrap();
    let account = Account::new_verified(
        Email::new(email).unwrap(),
        AccountPassword::from_raw(&raw).unwrap(),
        AccountRole::Affiliate,
    );

    // Distinct emails give distinct slugs, so seeding never collides
    let local = email.split('@').next().unwrap_or("jane");
    let base = Slug::base_from_name(local, "test");
    let affiliate = Affiliate::new(
        account.account_id,
        "Jane".to_string(),
        "Doe".to_string(),
        None,
        Slug::from_db(base),
        status,
        commission,
    );

    let mut state = store.lock();
    state.accounts.insert(account.account_id, account);
    state
        .affiliates
        .insert(affiliate.affiliate_id, affiliate.clone());
    affiliate
}
