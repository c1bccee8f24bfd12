//! Application Configuration

/// Affiliate application configuration
#[derive(Debug, Clone)]
pub struct AffiliateConfig {
    /// Where the internal "new affiliate application" notice goes;
    /// None disables the notice entirely
    pub admin_notice_address: Option<String>,
    /// Upper bound on slug collision candidates per registration
    pub max_slug_attempts: u32,
}

impl Default for AffiliateConfig {
    fn default() -> Self {
        Self {
            admin_notice_address: None,
            max_slug_attempts: 20,
        }
    }
}
