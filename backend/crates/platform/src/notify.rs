//! Notification Gateway and Email Templates
//!
//! Outbound email is best-effort everywhere in this system: callers log
//! failures and move on, a failed notification never rolls back the state
//! transition that triggered it.

use std::collections::HashMap;
use std::sync::RwLock;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Notification delivery errors
///
/// These are always recovered locally by callers (logged and swallowed),
/// never surfaced to API clients.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Recipient or sender address could not be parsed
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Message could not be built
    #[error("Failed to build message: {0}")]
    MessageBuild(String),

    /// SMTP transport failure
    #[error("SMTP transport error: {0}")]
    Transport(String),

    /// Template name not present in the store
    #[error("Unknown email template: {0}")]
    UnknownTemplate(String),
}

// ============================================================================
// Gateway Trait
// ============================================================================

/// Outbound notification gateway
///
/// `send` delivers one message to one or many recipients. Implementations
/// must not retry indefinitely; callers treat delivery as fire-and-forget.
#[trait_variant::make(NotificationGateway: Send)]
pub trait LocalNotificationGateway {
    /// Send a message to the given recipients
    async fn send(&self, to: &[String], subject: &str, body: &str) -> Result<(), NotifyError>;
}

// ============================================================================
// SMTP Implementation
// ============================================================================

/// SMTP configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP relay host
    pub host: String,
    /// SMTP username
    pub username: String,
    /// SMTP password
    pub password: String,
    /// From address for all outbound mail
    pub from_address: String,
}

/// SMTP-backed notification gateway (lettre, async)
#[derive(Clone)]
pub struct SmtpGateway {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpGateway {
    /// Create a gateway connected to an SMTP relay over TLS
    pub fn new(config: SmtpConfig) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address,
        })
    }
}

impl NotificationGateway for SmtpGateway {
    async fn send(&self, to: &[String], subject: &str, body: &str) -> Result<(), NotifyError> {
        let from = self
            .from_address
            .parse()
            .map_err(|_| NotifyError::InvalidAddress(self.from_address.clone()))?;

        let mut builder = Message::builder()
            .from(from)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);

        for recipient in to {
            let mailbox = recipient
                .parse()
                .map_err(|_| NotifyError::InvalidAddress(recipient.clone()))?;
            builder = builder.to(mailbox);
        }

        let message = builder
            .body(body.to_string())
            .map_err(|e| NotifyError::MessageBuild(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(())
    }
}

// ============================================================================
// Template Store
// ============================================================================

/// Well-known template names
pub mod template {
    pub const VERIFY_EMAIL: &str = "verify_email";
    pub const NEW_AFFILIATE_NOTICE: &str = "new_affiliate_notice";
    pub const APPLICATION_ACCEPTED: &str = "application_accepted";
    pub const APPLICATION_REJECTED: &str = "application_rejected";
    pub const PASSWORD_RESET: &str = "password_reset";
    pub const PAYMENT_DONE: &str = "payment_done";
}

/// A named email template with `{{var}}` placeholders
#[derive(Debug, Clone)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
}

/// Rendered subject + body pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

/// Injected, reloadable template lookup
///
/// This is an explicit dependency of the lifecycle engines, not a process
/// global. `reload` swaps the whole template set atomically; readers in
/// flight keep the set they started with.
pub struct TemplateStore {
    templates: RwLock<HashMap<String, EmailTemplate>>,
}

impl TemplateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store seeded with the built-in template set
    pub fn with_defaults() -> Self {
        let store = Self::new();
        store.reload(default_templates());
        store
    }

    /// Replace the entire template set
    pub fn reload(&self, templates: HashMap<String, EmailTemplate>) {
        let mut guard = self
            .templates
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = templates;
    }

    /// Render a template with `{{key}}` substitution
    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> Result<RenderedEmail, NotifyError> {
        let guard = self
            .templates
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let tpl = guard
            .get(name)
            .ok_or_else(|| NotifyError::UnknownTemplate(name.to_string()))?;

        Ok(RenderedEmail {
            subject: substitute(&tpl.subject, vars),
            body: substitute(&tpl.body, vars),
        })
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn substitute(text: &str, vars: &[(&str, &str)]) -> String {
    let mut out = text.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{}}}}}", key), value);
    }
    out
}

fn default_templates() -> HashMap<String, EmailTemplate> {
    let mut map = HashMap::new();
    map.insert(
        template::VERIFY_EMAIL.to_string(),
        EmailTemplate {
            subject: "Verify your email address".to_string(),
            body: "Hi {{first_name}},\n\nPlease confirm your email address by opening:\n{{verify_url}}\n\nThe link expires in 24 hours.".to_string(),
        },
    );
    map.insert(
        template::NEW_AFFILIATE_NOTICE.to_string(),
        EmailTemplate {
            subject: "New affiliate application: {{first_name}} {{last_name}}".to_string(),
            body: "A new affiliate application was submitted by {{first_name}} {{last_name}} ({{email}}).".to_string(),
        },
    );
    map.insert(
        template::APPLICATION_ACCEPTED.to_string(),
        EmailTemplate {
            subject: "Your affiliate application was accepted".to_string(),
            body: "Hi {{first_name}},\n\nYour application has been accepted. You can now sign in and start submitting referrals.".to_string(),
        },
    );
    map.insert(
        template::APPLICATION_REJECTED.to_string(),
        EmailTemplate {
            subject: "Your affiliate application was rejected".to_string(),
            body: "Hi {{first_name}},\n\nUnfortunately your application has been rejected.".to_string(),
        },
    );
    map.insert(
        template::PASSWORD_RESET.to_string(),
        EmailTemplate {
            subject: "Reset your password".to_string(),
            body: "Hi,\n\nYou can reset your password here:\n{{reset_url}}\n\nThe link expires in 1 hour. If you did not request this, you can ignore this email.".to_string(),
        },
    );
    map.insert(
        template::PAYMENT_DONE.to_string(),
        EmailTemplate {
            subject: "Commission payment sent".to_string(),
            body: "Hi {{first_name}},\n\nWe have paid out {{amount}} {{currency}} for your referral.".to_string(),
        },
    );
    map
}
