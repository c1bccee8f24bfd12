//! Application Layer
//!
//! Use cases and application services.

pub mod change_password;
pub mod config;
pub mod guard;
pub mod password_reset;
pub mod refresh;
pub mod sign_in;
pub mod token;
pub mod verify_email;

// Re-exports
pub use change_password::ChangePasswordUseCase;
pub use config::AuthConfig;
pub use guard::{AuthContext, RequestGuard};
pub use password_reset::{RequestPasswordResetUseCase, ResetPasswordUseCase};
pub use refresh::RefreshUseCase;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use token::{Claims, TokenPair, TokenService};
pub use verify_email::VerifyEmailUseCase;
