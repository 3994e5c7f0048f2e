//! Notification channel
//!
//! A [`Notifier`] delivers the rendered report to its recipients. Delivery is
//! only attempted when the aggregated summary says a notification is due.
//!
//! # Components
//!
//! - `OutboxNotifier`: writes each message as a file into a directory for a
//!   mail relay to pick up
//! - `LogNotifier`: records the message through tracing only

mod outbox;

pub use outbox::OutboxNotifier;

use crate::config::NotificationConfig;
use thiserror::Error;

/// Errors that can occur while sending a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("No recipients configured")]
    NoRecipients,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for notification operations
pub type NotifyResult<T> = Result<T, NotifyError>;

/// A message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub reply_to: Option<String>,
    pub sender_name: Option<String>,
}

impl Notification {
    /// Builds a message from the notification settings and a rendered body
    pub fn from_config(config: &NotificationConfig, html_body: String) -> Self {
        Self {
            recipients: config.recipients.clone(),
            subject: config.subject.clone(),
            html_body,
            reply_to: config.reply_to.clone(),
            sender_name: config.sender_name.clone(),
        }
    }

    /// Recipients joined the way a `To:` header expects
    pub fn to_header(&self) -> String {
        self.recipients.join(",")
    }
}

/// Trait for notification channels
pub trait Notifier: Send + Sync {
    /// Delivers the message to all of its recipients
    fn send(&self, notification: &Notification) -> NotifyResult<()>;
}

/// Notifier that only logs what would have been sent
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, notification: &Notification) -> NotifyResult<()> {
        tracing::info!(
            "Notification '{}' for [{}] ({} bytes), no outbox configured",
            notification.subject,
            notification.to_header(),
            notification.html_body.len()
        );
        Ok(())
    }
}

/// Builds the notifier described by the configuration
pub fn notifier_for(config: &NotificationConfig) -> Box<dyn Notifier> {
    match &config.outbox_dir {
        Some(dir) => Box::new(OutboxNotifier::new(dir)),
        None => Box::new(LogNotifier),
    }
}
