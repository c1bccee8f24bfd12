//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
///
/// Every variant below is an expected, user-facing outcome with a stable
/// kind; only `Database` and `Internal` surface as generic server errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email already registered (soft-deleted accounts keep their email)
    #[error("An account with this email already exists")]
    DuplicateEmail,

    /// Wrong email or wrong password - intentionally indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account is blocked by an administrator
    #[error("Account is blocked")]
    Blocked,

    /// Email address has not been verified yet
    #[error("Email address is not verified")]
    EmailNotVerified,

    /// Affiliate application was rejected
    #[error("Your application has been rejected")]
    ApplicationRejected,

    /// Affiliate account was disabled
    #[error("Account is disabled")]
    AccountDisabled,

    /// Affiliate application is still pending review
    #[error("Your application is still pending review")]
    RegistrationPending,

    /// Verification or reset token unknown or past its expiry
    #[error("This link is invalid or has expired")]
    InvalidOrExpiredToken,

    /// Access or refresh token failed signature/expiry validation
    #[error("Invalid or expired session token")]
    InvalidToken,

    /// Current password did not match on password change
    #[error("Current password is incorrect")]
    IncorrectCurrentPassword,

    /// Captcha verification failed
    #[error("Captcha verification failed")]
    CaptchaFailed,

    /// Account not found (or soft-deleted)
    #[error("Account not found")]
    NotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Blocked
            | AuthError::EmailNotVerified
            | AuthError::ApplicationRejected
            | AuthError::AccountDisabled
            | AuthError::RegistrationPending => StatusCode::FORBIDDEN,
            AuthError::InvalidOrExpiredToken => StatusCode::GONE,
            AuthError::IncorrectCurrentPassword | AuthError::CaptchaFailed => {
                StatusCode::BAD_REQUEST
            }
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::DuplicateEmail => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::InvalidToken => ErrorKind::Unauthorized,
            AuthError::Blocked
            | AuthError::EmailNotVerified
            | AuthError::ApplicationRejected
            | AuthError::AccountDisabled
            | AuthError::RegistrationPending => ErrorKind::Forbidden,
            AuthError::InvalidOrExpiredToken => ErrorKind::Gone,
            AuthError::IncorrectCurrentPassword | AuthError::CaptchaFailed => ErrorKind::BadRequest,
            AuthError::NotFound => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Blocked => {
                tracing::warn!("Login attempt on blocked account");
            }
            AuthError::CaptchaFailed => {
                tracing::warn!("Captcha verification failed");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
