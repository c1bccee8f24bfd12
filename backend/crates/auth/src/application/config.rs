//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Auth application configuration
///
/// Access and refresh tokens are signed with independent secrets so a
/// leaked access secret cannot mint refresh tokens.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for signing access tokens (HS256)
    pub access_token_secret: Vec<u8>,
    /// Secret for signing refresh tokens (HS256)
    pub refresh_token_secret: Vec<u8>,
    /// Access token TTL (1 hour)
    pub access_token_ttl: Duration,
    /// Refresh token TTL (30 days)
    pub refresh_token_ttl: Duration,
    /// Email-verification token TTL (24 hours)
    pub verification_token_ttl: Duration,
    /// Password-reset token TTL (1 hour)
    pub reset_token_ttl: Duration,
    /// Base URL used when building verification/reset links in emails
    pub portal_base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: vec![0u8; 32],
            refresh_token_secret: vec![1u8; 32],
            access_token_ttl: Duration::from_secs(3600),
            refresh_token_ttl: Duration::from_secs(30 * 24 * 3600),
            verification_token_ttl: Duration::from_secs(24 * 3600),
            reset_token_ttl: Duration::from_secs(3600),
            portal_base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with random signing secrets (for development)
    pub fn development() -> Self {
        use rand::RngCore;
        let mut access = vec![0u8; 32];
        let mut refresh = vec![0u8; 32];
        rand::rng().fill_bytes(&mut access);
        rand::rng().fill_bytes(&mut refresh);
        Self {
            access_token_secret: access,
            refresh_token_secret: refresh,
            ..Default::default()
        }
    }

    /// Access token TTL in whole seconds (for token responses)
    pub fn access_token_ttl_secs(&self) -> i64 {
        self.access_token_ttl.as_secs() as i64
    }
}
