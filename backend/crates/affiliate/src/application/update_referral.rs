//! Referral Update Use Case
//!
//! Staff review of a referral: the review status and the payment status are
//! independent axes, plus the two note fields. The first unpaid-to-paid
//! transition stamps the payment date and sends the payout notification;
//! repeated "paid" updates do neither again.

use std::sync::Arc;

use auth::domain::repository::AccountRepository;
use kernel::id::ReferralId;
use platform::notify::{NotificationGateway, TemplateStore, template};

use crate::domain::entity::{affiliate::Affiliate, referral::Referral};
use crate::domain::repository::{AffiliateRepository, ReferralRepository};
use crate::domain::value_object::referral_status::{PaymentStatus, ReferralStatus};
use crate::error::{AffiliateError, AffiliateResult};

/// Partial referral update; `None` leaves the field as is
#[derive(Debug, Default)]
pub struct ReferralUpdate {
    pub status: Option<ReferralStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// `Some(None)` clears the note
    pub internal_note: Option<Option<String>>,
    pub public_note: Option<Option<String>>,
}

/// Referral update use case
pub struct UpdateReferralUseCase<R, P, A, N>
where
    R: ReferralRepository,
    P: AffiliateRepository,
    A: AccountRepository,
    N: NotificationGateway,
{
    referrals: Arc<R>,
    affiliates: Arc<P>,
    accounts: Arc<A>,
    gateway: Arc<N>,
    templates: Arc<TemplateStore>,
}

impl<R, P, A, N> UpdateReferralUseCase<R, P, A, N>
where
    R: ReferralRepository,
    P: AffiliateRepository,
    A: AccountRepository,
    N: NotificationGateway,
{
    pub fn new(
        referrals: Arc<R>,
        affiliates: Arc<P>,
        accounts: Arc<A>,
        gateway: Arc<N>,
        templates: Arc<TemplateStore>,
    ) -> Self {
        Self {
            referrals,
            affiliates,
            accounts,
            gateway,
            templates,
        }
    }

    pub async fn execute(
        &self,
        referral_id: &ReferralId,
        update: ReferralUpdate,
    ) -> AffiliateResult<Referral> {
        let mut referral = self
            .referrals
            .find_by_id(referral_id)
            .await?
            .ok_or(AffiliateError::NotFound)?;

        if let Some(status) = update.status {
            referral.set_status(status);
        }

        let mut first_paid = false;
        if let Some(payment_status) = update.payment_status {
            first_paid = referral.set_payment_status(payment_status);
        }

        if let Some(internal_note) = update.internal_note {
            referral.internal_note = internal_note;
        }
        if let Some(public_note) = update.public_note {
            referral.public_note = public_note;
        }

        self.referrals.update(&referral).await?;

        tracing::info!(
            referral_id = %referral.referral_id,
            status = %referral.status,
            payment_status = %referral.payment_status,
            "Referral updated"
        );

        if first_paid {
            self.notify_payout(&referral).await;
        }

        Ok(referral)
    }

    async fn notify_payout(&self, referral: &Referral) {
        let affiliate = match self.affiliates.find_by_id(&referral.affiliate_id).await {
            Ok(Some(affiliate)) => affiliate,
            Ok(None) => {
                tracing::warn!(
                    referral_id = %referral.referral_id,
                    "No affiliate for referral, skipping payout notification"
                );
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load affiliate for payout notification");
                return;
            }
        };

        let email = match self.accounts.find_by_id(&affiliate.account_id).await {
            Ok(Some(account)) => account.email.as_str().to_string(),
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load account for payout notification");
                return;
            }
        };

        self.send_payout_mail(&affiliate, &email).await;
    }

    async fn send_payout_mail(&self, affiliate: &Affiliate, email: &str) {
        let amount = format!("{:.2}", affiliate.commission.paid_amount());
        let vars = [
            ("first_name", affiliate.first_name.as_str()),
            ("amount", amount.as_str()),
            ("currency", affiliate.commission.currency.as_str()),
        ];

        let mail = match self.templates.render(template::PAYMENT_DONE, &vars) {
            Ok(mail) => mail,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to render payout notification");
                return;
            }
        };

        if let Err(e) = self
            .gateway
            .send(&[email.to_string()], &mail.subject, &mail.body)
            .await
        {
            tracing::warn!(error = %e, "Failed to send payout notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::commission::{CommissionConfig, RateType};
    use crate::domain::value_object::referred_party::ReferredParty;
    use crate::test_support::{
        InMemoryAccounts, InMemoryPartnerStore, RecordingGateway, enroll, enroll_with_commission,
    };
    use auth::domain::value_object::affiliate_status::AffiliateStatus;

    fn party() -> ReferredParty {
        ReferredParty::Individual {
            first_name: "Max".into(),
            last_name: "Muster".into(),
            email: "max@example.com".into(),
            phone: None,
        }
    }

    struct Fixture {
        store: Arc<InMemoryPartnerStore>,
        gateway: Arc<RecordingGateway>,
        use_case: UpdateReferralUseCase<
            InMemoryPartnerStore,
            InMemoryPartnerStore,
            InMemoryAccounts,
            RecordingGateway,
        >,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryPartnerStore::new());
        let gateway = Arc::new(RecordingGateway::new());
        let use_case = UpdateReferralUseCase::new(
            store.clone(),
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
    async fn test_review_and_payment_axes_are_independent() {
        let f = fixture();
        let affiliate = enroll(&f.store, "jane@example.com", AffiliateStatus::Active);
        let referral = f.store.insert_referral(Referral::new(affiliate.affiliate_id, party()));

        let updated = f
            .use_case
            .execute(
                &referral.referral_id,
                ReferralUpdate {
                    status: Some(ReferralStatus::Approved),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, ReferralStatus::Approved);
        assert_eq!(updated.payment_status, PaymentStatus::Unpaid);
    }

    #[tokio::test]
    async fn test_first_paid_sends_fixed_amount_notification() {
        let f = fixture();
        let affiliate = enroll_with_commission(
            &f.store,
            "jane@example.com",
            CommissionConfig {
                rate_type: RateType::Fixed,
                rate_value: 50.0,
                payment_term_days: 30,
                currency: "EUR".to_string(),
            },
        );
        let referral = f.store.insert_referral(Referral::new(affiliate.affiliate_id, party()));

        let updated = f
            .use_case
            .execute(
                &referral.referral_id,
                ReferralUpdate {
                    payment_status: Some(PaymentStatus::Paid),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.paid_at.is_some());

        let sent = f.gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["jane@example.com".to_string()]);
        assert!(sent[0].body.contains("50.00 EUR"));
    }

    #[tokio::test]
    async fn test_percentage_commission_pays_zero() {
        let f = fixture();
        let affiliate = enroll_with_commission(
            &f.store,
            "jane@example.com",
            CommissionConfig {
                rate_type: RateType::Percentage,
                rate_value: 10.0,
                payment_term_days: 30,
                currency: "EUR".to_string(),
            },
        );
        let referral = f.store.insert_referral(Referral::new(affiliate.affiliate_id, party()));

        f.use_case
            .execute(
                &referral.referral_id,
                ReferralUpdate {
                    payment_status: Some(PaymentStatus::Paid),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let sent = f.gateway.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("0.00 EUR"));
    }

    #[tokio::test]
    async fn test_repeated_paid_updates_notify_once() {
        let f = fixture();
        let affiliate = enroll(&f.store, "jane@example.com", AffiliateStatus::Active);
        let referral = f.store.insert_referral(Referral::new(affiliate.affiliate_id, party()));

        for _ in 0..3 {
            f.use_case
                .execute(
                    &referral.referral_id,
                    ReferralUpdate {
                        payment_status: Some(PaymentStatus::Paid),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        assert_eq!(f.gateway.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_paid_at_survives_bounce_through_unpaid() {
        let f = fixture();
        let affiliate = enroll(&f.store, "jane@example.com", AffiliateStatus::Active);
        let referral = f.store.insert_referral(Referral::new(affiliate.affiliate_id, party()));

        let paid = f
            .use_case
            .execute(
                &referral.referral_id,
                ReferralUpdate {
                    payment_status: Some(PaymentStatus::Paid),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let first = paid.paid_at;

        f.use_case
            .execute(
                &referral.referral_id,
                ReferralUpdate {
                    payment_status: Some(PaymentStatus::Unpaid),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let again = f
            .use_case
            .execute(
                &referral.referral_id,
                ReferralUpdate {
                    payment_status: Some(PaymentStatus::Paid),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(again.paid_at, first);
        assert_eq!(f.gateway.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_notes_can_be_set_and_cleared() {
        let f = fixture();
        let affiliate = enroll(&f.store, "jane@example.com", AffiliateStatus::Active);
        let referral = f.store.insert_referral(Referral::new(affiliate.affiliate_id, party()));

        let updated = f
            .use_case
            .execute(
                &referral.referral_id,
                ReferralUpdate {
                    internal_note: Some(Some("follow up next week".to_string())),
                    public_note: Some(Some("in review".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.internal_note.as_deref(), Some("follow up next week"));

        let cleared = f
            .use_case
            .execute(
                &referral.referral_id,
                ReferralUpdate {
                    internal_note: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.internal_note.is_none());
        assert_eq!(cleared.public_note.as_deref(), Some("in review"));
    }

    #[tokio::test]
    async fn test_unknown_referral() {
        let f = fixture();
        let err = f
            .use_case
            .execute(&ReferralId::new(), ReferralUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AffiliateError::NotFound));
    }
}
