//! Auth (Account Lifecycle) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Email + password login with stateless JWT access/refresh tokens
//! - Opaque single-use email-verification and password-reset tokens
//! - Per-request guard re-checking account and affiliate state on every call
//! - Role-based access via a single capability predicate
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, never stored or logged in plaintext
//! - Access and refresh tokens signed with independent secrets
//! - No refresh-token revocation list: validity is signature + expiry plus
//!   the live account re-check above (documented tradeoff)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::guard::AuthContext;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAccountRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAccountRepository as AccountStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
