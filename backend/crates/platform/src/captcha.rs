//! Captcha Verification Client
//!
//! reCAPTCHA-style server-side token verification, used by affiliate
//! registration only. Whether verification is enforced is an explicit
//! configuration decision made at wiring time: an unconfigured secret must
//! construct [`CaptchaVerifier::Disabled`] deliberately, never fall back
//! silently inside this module.

use serde::Deserialize;

/// Google siteverify endpoint
const VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Server-side captcha verifier
#[derive(Clone)]
pub enum CaptchaVerifier {
    /// Development mode: every token verifies. Must be chosen explicitly.
    Disabled,
    /// Live verification against the provider
    Enabled {
        secret: String,
        client: reqwest::Client,
    },
}

#[derive(Deserialize)]
struct VerifyResponse {
    success: bool,
}

impl CaptchaVerifier {
    /// Create a live verifier with the given shared secret
    pub fn enabled(secret: impl Into<String>) -> Self {
        Self::Enabled {
            secret: secret.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Verify a client-supplied token
    ///
    /// Network or provider failures count as a failed verification; the
    /// caller decides how to surface that.
    pub async fn verify(&self, token: &str, remote_addr: Option<&str>) -> bool {
        match self {
            Self::Disabled => true,
            Self::Enabled { secret, client } => {
                let mut params = vec![("secret", secret.as_str()), ("response", token)];
                if let Some(addr) = remote_addr {
                    params.push(("remoteip", addr));
                }

                let response = match client.post(VERIFY_URL).form(&params).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!(error = %e, "Captcha verification request failed");
                        return false;
                    }
                };

                match response.json::<VerifyResponse>().await {
                    Ok(body) => body.success,
                    Err(e) => {
                        tracing::warn!(error = %e, "Captcha verification response unreadable");
                        false
                    }
                }
            }
        }
    }

    /// Whether live verification is enforced
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }
}
