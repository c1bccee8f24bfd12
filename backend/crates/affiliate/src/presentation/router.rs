//! Affiliate Router

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};

use auth::domain::repository::AccountRepository;
use auth::presentation::middleware::{AuthMiddlewareState, require_auth};
use platform::notify::NotificationGateway;

use crate::domain::repository::{AffiliateRepository, EnrollmentRepository, ReferralRepository};
use crate::presentation::handlers::{self, AffiliateAppState};

/// Create the Affiliate router
///
/// Public routes cover registration, tracking links, and anonymous referral
/// submission. Everything else sits behind the auth guard, which only lets
/// active affiliates and staff through.
pub fn affiliate_router<P, A, N>(state: AffiliateAppState<P, A, N>) -> Router
where
    P: AffiliateRepository + ReferralRepository + EnrollmentRepository + Send + Sync + 'static,
    A: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    let guard_state = AuthMiddlewareState {
        repo: state.accounts.clone(),
        tokens: state.tokens.clone(),
    };

    let guarded = Router::new()
        .route("/affiliates/me", get(handlers::my_profile::<P, A, N>))
        .route("/affiliates", post(handlers::create_affiliate::<P, A, N>))
        .route(
            "/affiliates/{id}",
            patch(handlers::update_affiliate::<P, A, N>)
                .delete(handlers::delete_affiliate::<P, A, N>),
        )
        .route(
            "/affiliates/{id}/status",
            patch(handlers::update_affiliate_status::<P, A, N>),
        )
        .route(
            "/accounts/{id}/blocked",
            put(handlers::set_blocked::<P, A, N>),
        )
        .route(
            "/referrals",
            get(handlers::list_referrals::<P, A, N>).post(handlers::create_referral::<P, A, N>),
        )
        .route(
            "/referrals/{id}",
            patch(handlers::update_referral::<P, A, N>)
                .delete(handlers::delete_referral::<P, A, N>),
        )
        .route_layer(middleware::from_fn(move |req, next| {
            let guard_state = guard_state.clone();
            async move { require_auth(guard_state, req, next).await }
        }));

    Router::new()
        .route(
            "/affiliates/register",
            post(handlers::register::<P, A, N>),
        )
        .route("/affiliates/track/{slug}", get(handlers::track::<P, A, N>))
        .route(
            "/referrals/public",
            post(handlers::create_referral_public::<P, A, N>),
        )
        .merge(guarded)
        .with_state(state)
}
