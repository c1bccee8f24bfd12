//! Commission Configuration
//!
//! How an affiliate is paid for a converted referral.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum RateType {
    #[default]
    Percentage = 0,
    Fixed = 1,
}

impl RateType {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            RateType::Percentage => "percentage",
            RateType::Fixed => "fixed",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        match id {
            0 => RateType::Percentage,
            1 => RateType::Fixed,
            _ => {
                tracing::error!("Invalid RateType id: {}", id);
                unreachable!("Invalid RateType id: {}", id)
            }
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Self {
        match code {
            "percentage" => RateType::Percentage,
            "fixed" => RateType::Fixed,
            _ => {
                tracing::error!("Invalid RateType code: {}", code);
                unreachable!("Invalid RateType code: {}", code)
            }
        }
    }
}

impl fmt::Display for RateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Commission configuration attached to an affiliate profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionConfig {
    pub rate_type: RateType,
    pub rate_value: f64,
    /// Days until a paid commission is due
    pub payment_term_days: i32,
    /// ISO 4217 currency code for payouts
    pub currency: String,
}

impl CommissionConfig {
    /// Amount reported in the "payment done" notification
    ///
    /// Percentage rates need a deal value this model does not carry, so
    /// they report zero until one exists.
    pub fn paid_amount(&self) -> f64 {
        match self.rate_type {
            RateType::Fixed => self.rate_value,
            RateType::Percentage => 0.0,
        }
    }
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            rate_type: RateType::Percentage,
            rate_value: 0.0,
            payment_term_days: 30,
            currency: "EUR".to_string(),
        }
    }
}
