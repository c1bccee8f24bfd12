//! In-memory test doubles shared by the use-case tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use platform::notify::{NotificationGateway, NotifyError};
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_id::AccountId, affiliate_status::AffiliateStatus, email::Email,
};
use crate::error::AuthResult;

/// In-memory account repository
///
/// `insert` doubles as upsert so tests can mutate an account and write it
/// back, simulating what another request would observe.
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<Uuid, Account>>,
    statuses: Mutex<HashMap<Uuid, AffiliateStatus>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, account: Account) {
        self.accounts
            .lock()
            .unwrap()
            .insert(*account.account_id.as_uuid(), account);
    }

    pub fn get(&self, account_id: &AccountId) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .get(account_id.as_uuid())
            .cloned()
    }

    pub fn set_affiliate_status(&self, account_id: &AccountId, status: AffiliateStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert(*account_id.as_uuid(), status);
    }
}

impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        self.insert(account.clone());
        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        Ok(self.get(account_id))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == *email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .any(|a| a.email == *email))
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
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
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| {
                a.reset_token.as_deref() == Some(token)
                    && a.reset_token_expires_at.is_some_and(|exp| exp > now)
            })
            .cloned())
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        self.insert(account.clone());
        Ok(())
    }

    async fn affiliate_status(
        &self,
        account_id: &AccountId,
    ) -> AuthResult<Option<AffiliateStatus>> {
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(account_id.as_uuid())
            .copied())
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
