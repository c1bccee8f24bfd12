//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::sign_in::SignInOutput;
use crate::application::token::TokenPair;

// ============================================================================
// Sign In / Tokens
// ============================================================================

/// Sign in request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Summary of the signed-in account, embedded in the sign-in response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_id: uuid::Uuid,
    pub email: String,
    pub role: String,
    /// Absent for staff accounts without an affiliate profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_status: Option<String>,
}

/// Sign-in response: token pair plus the account summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub account_summary: AccountSummary,
}

impl From<SignInOutput> for SignInResponse {
    fn from(output: SignInOutput) -> Self {
        Self {
            access_token: output.tokens.access_token,
            refresh_token: output.tokens.refresh_token,
            token_type: "Bearer",
            expires_in: output.tokens.expires_in,
            account_summary: AccountSummary {
                account_id: output.account_id.into_uuid(),
                email: output.email,
                role: output.role.code().to_string(),
                affiliate_status: output.affiliate_status.map(|s| s.code().to_string()),
            },
        }
    }
}

/// Token pair response, returned by refresh
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer",
            expires_in: pair.expires_in,
        }
    }
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// ============================================================================
// Email Verification
// ============================================================================

/// Email verification request (token from the emailed link)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    pub token: String,
}

// ============================================================================
// Password Reset / Change
// ============================================================================

/// Reset link request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Reset confirmation (token from the emailed link + new password)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

/// Authenticated password change
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ============================================================================
// Account Info
// ============================================================================

/// Current account info response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub account_id: uuid::Uuid,
    pub email: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        account_role::AccountRole, affiliate_status::AffiliateStatus,
    };
    use kernel::id::AccountId;

    fn output(status: Option<AffiliateStatus>) -> SignInOutput {
        SignInOutput {
            tokens: TokenPair {
                access_token: "access".to_string(),
                refresh_token: "refresh".to_string(),
                expires_in: 3600,
            },
            account_id: AccountId::new(),
            email: "user@example.com".to_string(),
            role: AccountRole::Affiliate,
            affiliate_status: status,
        }
    }

    #[test]
    fn test_sign_in_response_carries_account_summary() {
        let json =
            serde_json::to_value(SignInResponse::from(output(Some(AffiliateStatus::Pending))))
                .unwrap();

        assert_eq!(json["tokenType"], "Bearer");
        assert!(json["accessToken"].is_string());
        let summary = &json["accountSummary"];
        assert_eq!(summary["email"], "user@example.com");
        assert_eq!(summary["role"], "affiliate");
        assert_eq!(summary["affiliateStatus"], "pending");
    }

    #[test]
    fn test_summary_omits_status_without_profile() {
        let json = serde_json::to_value(SignInResponse::from(output(None))).unwrap();
        assert!(json["accountSummary"].get("affiliateStatus").is_none());
    }
}
