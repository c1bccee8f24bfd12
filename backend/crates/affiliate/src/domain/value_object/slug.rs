//! Slug Value Object
//!
//! Unique, URL-safe identifier used in referral-tracking links.
//! Immutable once assigned to an affiliate.
//!
//! Uniqueness is owned by the database constraint, not this type: callers
//! walk `candidates()` and let the unique index arbitrate concurrent claims.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum slug length
const SLUG_MAX_LENGTH: usize = 120;

/// URL-safe affiliate slug
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug(String);

impl Slug {
    /// Create from an already-slugified string
    pub fn new(slug: impl Into<String>) -> AppResult<Self> {
        let slug = slug.into();

        if slug.is_empty() {
            return Err(AppError::bad_request("Slug cannot be empty"));
        }
        if slug.len() > SLUG_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Slug must be at most {} characters",
                SLUG_MAX_LENGTH
            )));
        }
        if !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(AppError::bad_request(
                "Slug may only contain lowercase letters, digits, and hyphens",
            ));
        }

        Ok(Self(slug))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the base slug from a person's name
    ///
    /// Lowercases, maps every non-alphanumeric run to a single hyphen, and
    /// trims leading/trailing hyphens. An all-symbol name falls back to
    /// "affiliate" so the candidate walk always has a base.
    pub fn base_from_name(first_name: &str, last_name: &str) -> String {
        let combined = format!("{} {}", first_name, last_name);
        let mut out = String::with_capacity(combined.len());
        let mut last_was_hyphen = true;

        for c in combined.chars() {
            if c.is_ascii_alphanumeric() {
                out.push(c.to_ascii_lowercase());
                last_was_hyphen = false;
            } else if !last_was_hyphen {
                out.push('-');
                last_was_hyphen = true;
            }
        }

        let trimmed = out.trim_end_matches('-');
        if trimmed.is_empty() {
            "affiliate".to_string()
        } else {
            trimmed.chars().take(SLUG_MAX_LENGTH).collect()
        }
    }

    /// Candidate sequence for collision resolution
    ///
    /// Yields "base", "base-2", "base-3", ... The caller bounds the walk and
    /// treats each unique-constraint violation as "try the next one".
    /// Suffixed candidates shorten the base so every candidate stays within
    /// the length limit even when the base sits at the cap.
    pub fn candidates(base: &str) -> impl Iterator<Item = Slug> + '_ {
        (1u32..).map(move |n| {
            if n == 1 {
                return Slug(base.chars().take(SLUG_MAX_LENGTH).collect());
            }
            let suffix = format!("-{}", n);
            let mut head: String = base.chars().take(SLUG_MAX_LENGTH - suffix.len()).collect();
            while head.ends_with('-') {
                head.pop();
            }
            Slug(format!("{}{}", head, suffix))
        })
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
