//! Affiliate Status Transition Use Case
//!
//! Moves the review status and fires edge-triggered notifications: only the
//! pending-to-active and pending-to-rejected transitions email the affiliate.
//! Re-applying the current status, or moving between non-pending states,
//! sends nothing.

use std::sync::Arc;

use auth::domain::repository::AccountRepository;
use auth::domain::value_object::affiliate_status::AffiliateStatus;
use kernel::id::AffiliateId;
use platform::notify::{NotificationGateway, TemplateStore, template};

use crate::domain::entity::affiliate::Affiliate;
use crate::domain::repository::AffiliateRepository;
use crate::error::{AffiliateError, AffiliateResult};

/// Affiliate status transition use case
pub struct UpdateAffiliateStatusUseCase<P, A, N>
where
    P: AffiliateRepository,
    A: AccountRepository,
    N: NotificationGateway,
{
    affiliates: Arc<P>,
    accounts: Arc<A>,
    gateway: Arc<N>,
    templates: Arc<TemplateStore>,
}

impl<P, A, N> UpdateAffiliateStatusUseCase<P, A, N>
where
    P: AffiliateRepository,
    A: AccountRepository,
    N: NotificationGateway,
{
    pub fn new(
        affiliates: Arc<P>,
        accounts: Arc<A>,
        gateway: Arc<N>,
        templates: Arc<TemplateStore>,
    ) -> Self {
        Self {
            affiliates,
            accounts,
            gateway,
            templates,
        }
    }

    pub async fn execute(
        &self,
        affiliate_id: &AffiliateId,
        status: AffiliateStatus,
    ) -> AffiliateResult<Affiliate> {
        let mut affiliate = self
            .affiliates
            .find_by_id(affiliate_id)
            .await?
            .ok_or(AffiliateError::NotFound)?;

        let previous = affiliate.status;
        if previous == status {
            return Ok(affiliate);
        }

        affiliate.set_status(status);
        self.affiliates.update(&affiliate).await?;

        tracing::info!(
            affiliate_id = %affiliate.affiliate_id,
            from = %previous,
            to = %status,
            "Affiliate status changed"
        );

        // Only the two decisions out of the review queue notify
        match (previous, status) {
            (AffiliateStatus::Pending, AffiliateStatus::Active) => {
                self.notify(&affiliate, template::APPLICATION_ACCEPTED).await;
            }
            (AffiliateStatus::Pending, AffiliateStatus::Rejected) => {
                self.notify(&affiliate, template::APPLICATION_REJECTED).await;
            }
            _ => {}
        }

        Ok(affiliate)
    }

    async fn notify(&self, affiliate: &Affiliate, template_name: &str) {
        let email = match self.accounts.find_by_id(&affiliate.account_id).await {
            Ok(Some(account)) => account.email.as_str().to_string(),
            Ok(None) => {
                tracing::warn!(
                    affiliate_id = %affiliate.affiliate_id,
                    "No account for affiliate, skipping status notification"
                );
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load account for status notification");
                return;
            }
        };

        let vars = [("first_name", affiliate.first_name.as_str())];
        let mail = match self.templates.render(template_name, &vars) {
            Ok(mail) => mail,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to render status notification");
                return;
            }
        };

        if let Err(e) = self.gateway.send(&[email], &mail.subject, &mail.body).await {
            tracing::warn!(error = %e, "Failed to send status notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryAccounts, InMemoryPartnerStore, RecordingGateway, enroll};

    struct Fixture {
        store: Arc<InMemoryPartnerStore>,
        gateway: Arc<RecordingGateway>,
        use_case:
            UpdateAffiliateStatusUseCase<InMemoryPartnerStore, InMemoryAccounts, RecordingGateway>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryPartnerStore::new());
        let gateway = Arc::new(RecordingGateway::new());
        let use_case = UpdateAffiliateStatusUseCase::new(
            store.clone(),
            Arc::new(InMemoryAccounts::shared_with(&store)),
            gateway.clone(),
            Arc::new(TemplateStore::with_defaults()),
        );
        Fixture {
            store,
            gateway,
            use_case,
        }
    }

    #[tokio::test]
    async fn test_pending_to_active_notifies_once() {
        let f = fixture();
        let affiliate = enroll(&f.store, "jane@example.com", AffiliateStatus::Pending);

        let updated = f
            .use_case
            .execute(&affiliate.affiliate_id, AffiliateStatus::Active)
            .await
            .unwrap();
        assert_eq!(updated.status, AffiliateStatus::Active);

        let sent = f.gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["jane@example.com".to_string()]);
        assert!(sent[0].subject.contains("accepted"));
    }

    #[tokio::test]
    async fn test_pending_to_rejected_notifies_once() {
        let f = fixture();
        let affiliate = enroll(&f.store, "jane@example.com", AffiliateStatus::Pending);

        f.use_case
            .execute(&affiliate.affiliate_id, AffiliateStatus::Rejected)
            .await
            .unwrap();

        let sent = f.gateway.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].subject.contains("rejected"));
    }

    #[tokio::test]
    async fn test_accept_edge_fires_once_per_crossing() {
        let f = fixture();
        let affiliate = enroll(&f.store, "jane@example.com", AffiliateStatus::Pending);

        // accepted, sent back to review, accepted again
        f.use_case
            .execute(&affiliate.affiliate_id, AffiliateStatus::Active)
            .await
            .unwrap();
        f.use_case
            .execute(&affiliate.affiliate_id, AffiliateStatus::Pending)
            .await
            .unwrap();
        f.use_case
            .execute(&affiliate.affiliate_id, AffiliateStatus::Active)
            .await
            .unwrap();

        // two pending->active crossings, nothing on the way back
        let sent = f.gateway.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|mail| mail.subject.contains("accepted")));
    }

    #[tokio::test]
    async fn test_reapplying_current_status_is_silent() {
        let f = fixture();
        let affiliate = enroll(&f.store, "jane@example.com", AffiliateStatus::Pending);

        f.use_case
            .execute(&affiliate.affiliate_id, AffiliateStatus::Pending)
            .await
            .unwrap();
        assert!(f.gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_non_pending_transitions_are_silent() {
        let f = fixture();
        let affiliate = enroll(&f.store, "jane@example.com", AffiliateStatus::Active);

        // active -> disabled -> active: administrative moves, no email
        f.use_case
            .execute(&affiliate.affiliate_id, AffiliateStatus::Disabled)
            .await
            .unwrap();
        f.use_case
            .execute(&affiliate.affiliate_id, AffiliateStatus::Active)
            .await
            .unwrap();

        assert!(f.gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_affiliate() {
        let f = fixture();
        let err = f
            .use_case
            .execute(&AffiliateId::new(), AffiliateStatus::Active)
            .await
            .unwrap_err();
        assert!(matches!(err, AffiliateError::NotFound));
    }

    #[tokio::test]
    async fn test_mail_failure_does_not_block_transition() {
        let store = Arc::new(InMemoryPartnerStore::new());
        let use_case = UpdateAffiliateStatusUseCase::new(
            store.clone(),
            Arc::new(InMemoryAccounts::shared_with(&store)),
            Arc::new(RecordingGateway::failing()),
            Arc::new(TemplateStore::with_defaults()),
        );
        let affiliate = enroll(&store, "jane@example.com", AffiliateStatus::Pending);

        let updated = use_case
            .execute(&affiliate.affiliate_id, AffiliateStatus::Active)
            .await
            .unwrap();
        assert_eq!(updated.status, AffiliateStatus::Active);
    }
}
