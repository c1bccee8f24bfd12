//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use std::sync::Arc;

use platform::notify::{NotificationGateway, TemplateStore};

use crate::application::config::AuthConfig;
use crate::application::guard::AuthContext;
use crate::application::token::TokenService;
use crate::application::{
    ChangePasswordUseCase, RefreshUseCase, RequestPasswordResetUseCase, ResetPasswordUseCase,
    SignInInput, SignInUseCase, VerifyEmailUseCase,
};
use crate::domain::repository::AccountRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    ChangePasswordRequest, MeResponse, PasswordResetConfirmRequest, PasswordResetRequest,
    RefreshRequest, SignInRequest, SignInResponse, TokenResponse, VerifyEmailRequest,
};

/// Shared state for auth handlers
pub struct AuthAppState<R, N>
where
    R: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub gateway: Arc<N>,
    pub templates: Arc<TemplateStore>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
}

impl<R, N> Clone for AuthAppState<R, N>
where
    R: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            gateway: self.gateway.clone(),
            templates: self.templates.clone(),
            config: self.config.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

// ============================================================================
// Sign In / Refresh
// ============================================================================

/// POST /auth/login
pub async fn sign_in<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Json<SignInResponse>>
where
    R: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.tokens.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(output.into()))
}

/// POST /auth/refresh
pub async fn refresh<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    let use_case = RefreshUseCase::new(state.repo.clone(), state.tokens.clone());
    let pair = use_case.execute(&req.refresh_token).await?;

    Ok(Json(pair.into()))
}

// ============================================================================
// Email Verification
// ============================================================================

/// POST /auth/verify-email
pub async fn verify_email<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<VerifyEmailRequest>,
) -> AuthResult<StatusCode>
where
    R: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    VerifyEmailUseCase::new(state.repo.clone())
        .execute(&req.token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Password Reset / Change
// ============================================================================

/// POST /auth/password-reset/request
pub async fn request_password_reset<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<PasswordResetRequest>,
) -> AuthResult<StatusCode>
where
    R: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    let use_case = RequestPasswordResetUseCase::new(
        state.repo.clone(),
        state.gateway.clone(),
        state.templates.clone(),
        state.config.clone(),
    );
    use_case.execute(&req.email).await?;

    // Same response whether or not the email is registered
    Ok(StatusCode::ACCEPTED)
}

/// POST /auth/password-reset/confirm
pub async fn confirm_password_reset<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<PasswordResetConfirmRequest>,
) -> AuthResult<StatusCode>
where
    R: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    ResetPasswordUseCase::new(state.repo.clone())
        .execute(&req.token, req.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /auth/password/change (guarded)
pub async fn change_password<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Extension(context): Extension<AuthContext>,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<StatusCode>
where
    R: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    ChangePasswordUseCase::new(state.repo.clone())
        .execute(&context.account_id, req.current_password, req.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Account Info
// ============================================================================

/// GET /auth/me (guarded)
pub async fn me<R, N>(
    State(_state): State<AuthAppState<R, N>>,
    Extension(context): Extension<AuthContext>,
) -> AuthResult<Json<MeResponse>>
where
    R: AccountRepository + Send + Sync + 'static,
    N: NotificationGateway + Send + Sync + 'static,
{
    Ok(Json(MeResponse {
        account_id: *context.account_id.as_uuid(),
        email: context.email,
        role: context.role.code().to_string(),
    }))
}
