//! Outbound notifications for RailPlan.
//!
//! Only email is supported. The server talks to a [`NotificationChannel`]
//! trait object so handlers can be exercised without an SMTP relay.

pub mod channels;
pub mod error;


use async_trait::async_trait;
use railplan_common::i18n::TRANSLATIONS;

pub use error::{NotifyError, Result};

/// A plain-text message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub subject: String,
    pub body: String,
}

impl OutgoingMessage {
    /// The fixed content of the manual "test alert" action.
    ///
    /// # Examples
    ///
    /// ```
    /// use railplan_notify::OutgoingMessage;
    ///
    /// let msg = OutgoingMessage::test_alert("fr");
    /// assert!(msg.subject.starts_with("[RailPlan]"));
    /// assert!(msg.body.contains("RailPlan"));
    /// ```
    pub fn test_alert(locale: &str) -> Self {
        Self {
            subject: TRANSLATIONS
                .get(locale, "mail.test.subject", "[RailPlan] Alert test")
                .to_string(),
            body: TRANSLATIONS
                .get(locale, "mail.test.body", "This is a RailPlan test email.")
                .to_string(),
        }
    }
}

/// A delivery channel for operator notifications.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Deliver `message` to a single recipient. No retries: the first
    /// transport error is returned to the caller.
    async fn send(&self, recipient: &str, message: &OutgoingMessage) -> Result<()>;

    /// Returns the channel type name (e.g. `"email"`).
    fn channel_type(&self) -> &str;
}
