//! Referred Party Value Object
//!
//! Who a referral points at: a person or a company, discriminated by an
//! account-type tag in storage.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReferredParty {
    #[serde(rename_all = "camelCase")]
    Individual {
        first_name: String,
        last_name: String,
        email: String,
        phone: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Company {
        company_name: String,
        email: String,
        phone: Option<String>,
    },
}

impl ReferredParty {
    /// Discriminator tag for storage
    pub const fn kind(&self) -> i16 {
        match self {
            ReferredParty::Individual { .. } => 0,
            ReferredParty::Company { .. } => 1,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            ReferredParty::Individual { email, .. } | ReferredParty::Company { email, .. } => email,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            ReferredParty::Individual {
                first_name,
                last_name,
                ..
            } => format!("{} {}", first_name, last_name),
            ReferredParty::Company { company_name, .. } => company_name.clone(),
        }
    }
}
