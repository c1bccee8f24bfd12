//! Auth Middleware
//!
//! Bearer-token guard for protected routes. On success the request gains
//! an `AuthContext` extension for downstream handlers.

use axum::body::Body;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::guard::RequestGuard;
use crate::application::token::TokenService;
use crate::domain::repository::AccountRepository;
use crate::error::AuthError;

/// Middleware state
pub struct AuthMiddlewareState<R>
where
    R: AccountRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenService>,
}

impl<R> Clone for AuthMiddlewareState<R>
where
    R: AccountRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware that requires a valid access token and a live, active account
pub async fn require_auth<R>(
    state: AuthMiddlewareState<R>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let Some(token) = bearer_token(req.headers()) else {
        return Err(AuthError::InvalidToken.into_response());
    };
    let token = token.to_string();

    let guard = RequestGuard::new(state.repo.clone(), state.tokens.clone());
    let context = match guard.authenticate(&token).await {
        Ok(context) => context,
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}
