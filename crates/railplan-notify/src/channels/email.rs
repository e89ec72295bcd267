use crate::error::{NotifyError, Result};
use crate::{NotificationChannel, OutgoingMessage};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// SMTP connection settings.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// STARTTLS when true, plaintext otherwise (local relays).
    pub use_tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

pub struct EmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|source| NotifyError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

impl EmailChannel {
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        if settings.host.trim().is_empty() {
            return Err(NotifyError::InvalidConfig("smtp host is empty".to_string()));
        }
        let from = parse_mailbox(&settings.from)?;

        let builder = if settings.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };
        let mut builder = builder.port(settings.port);

        if let Some(user) = settings.username.as_deref().filter(|u| !u.is_empty()) {
            let pass = settings.password.clone().unwrap_or_default();
            builder = builder.credentials(Credentials::new(user.to_string(), pass));
        }

        tracing::debug!(
            host = %settings.host,
            port = settings.port,
            tls = settings.use_tls,
            "Email channel configured"
        );
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, recipient: &str, message: &OutgoingMessage) -> Result<Message> {
        Ok(Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(recipient)?)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())?)
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    async fn send(&self, recipient: &str, message: &OutgoingMessage) -> Result<()> {
        let email = self.build_message(recipient, message)?;
        match self.transport.send(email).await {
            Ok(_) => {
                tracing::info!(recipient = %recipient, "Email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(recipient = %recipient, error = %e, "Email send failed");
                Err(e.into())
            }
        }
    }

    fn channel_type(&self) -> &str {
        "email"
    }
}
