//! Affiliate Error Types

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Affiliate-specific result type alias
pub type AffiliateResult<T> = Result<T, AffiliateError>;

/// Affiliate-specific error variants
#[derive(Debug, Error)]
pub enum AffiliateError {
    /// Input failed value-object validation
    #[error("{0}")]
    Validation(String),

    /// Caller lacks the capability for this operation
    #[error("Insufficient permissions")]
    Forbidden,

    /// Referral submission under a non-active affiliate
    #[error("Affiliate is not active")]
    AffiliateNotActive,

    /// Anonymous referral with neither slug parameter nor attribution cookie
    #[error("No affiliate attribution provided")]
    MissingAttribution,

    /// Affiliate or referral not found (or soft-deleted)
    #[error("Not found")]
    NotFound,

    /// Ran out of slug candidates; every suffix up to the cap was taken
    #[error("Could not allocate a unique slug")]
    SlugExhausted,

    /// Account-level error surfaced through an affiliate operation
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AffiliateError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AffiliateError::Validation(_) => StatusCode::BAD_REQUEST,
            AffiliateError::Forbidden
            | AffiliateError::AffiliateNotActive
            | AffiliateError::MissingAttribution => StatusCode::FORBIDDEN,
            AffiliateError::NotFound => StatusCode::NOT_FOUND,
            AffiliateError::Auth(e) => e.status_code(),
            AffiliateError::SlugExhausted
            | AffiliateError::Database(_)
            | AffiliateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AffiliateError::Validation(_) => ErrorKind::BadRequest,
            AffiliateError::Forbidden
            | AffiliateError::AffiliateNotActive
            | AffiliateError::MissingAttribution => ErrorKind::Forbidden,
            AffiliateError::NotFound => ErrorKind::NotFound,
            AffiliateError::Auth(e) => e.kind(),
            AffiliateError::SlugExhausted
            | AffiliateError::Database(_)
            | AffiliateError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AffiliateError::Database(e) => {
                tracing::error!(error = %e, "Affiliate database error");
            }
            AffiliateError::Internal(msg) => {
                tracing::error!(message = %msg, "Affiliate internal error");
            }
            AffiliateError::SlugExhausted => {
                tracing::error!("Slug candidate space exhausted");
            }
            _ => {
                tracing::debug!(error = %self, "Affiliate error");
            }
        }
    }
}

impl IntoResponse for AffiliateError {
    fn into_response(self) -> Response {
        match self {
            // Auth errors carry their own logging and mapping
            AffiliateError::Auth(e) => e.into_response(),
            other => {
                other.log();
                other.to_app_error().into_response()
            }
        }
    }
}
