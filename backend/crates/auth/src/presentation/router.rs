//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use platform::notify::NotificationGateway;

use crate::domain::repository::AccountRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth};

/// Create the Auth router
///
/// Public routes handle login, refresh, and the email-token flows; the
/// guarded routes re-check live account state on every request.
pub fn auth_router<R, N>(state: AuthAppState<R, N>) -> Router
where
    R: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    let guard_state = AuthMiddlewareState {
        repo: state.repo.clone(),
        tokens: state.tokens.clone(),
    };

    let guarded = Router::new()
        .route("/me", get(handlers::me::<R, N>))
        .route("/password/change", post(handlers::change_password::<R, N>))
        .route_layer(middleware::from_fn(move |req, next| {
            let guard_state = guard_state.clone();
            async move { require_auth(guard_state, req, next).await }
        }));

    Router::new()
        .route("/login", post(handlers::sign_in::<R, N>))
        .route("/refresh", post(handlers::refresh::<R, N>))
        .route("/verify-email", post(handlers::verify_email::<R, N>))
        .route(
            "/password-reset/request",
            post(handlers::request_password_reset::<R, N>),
        )
        .route(
            "/password-reset/confirm",
            post(handlers::confirm_password_reset::<R, N>),
        )
        .merge(guarded)
        .with_state(state)
}
