use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use stockdesk_models::SmtpConfig;
use tracing::{info, warn};

const AUTH_FAILED: &str = "Email authentication failed. Check SMTP_USERNAME and SMTP_PASSWORD \
                           in your .env file. For Office 365, you may need an App Password if \
                           MFA is enabled.";

/// Outcome of one send attempt. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub success: bool,
    pub message: String,
}

impl DeliveryReport {
    pub fn sent(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Sends an HTML document to the configured distribution list.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// One attempt, no retry.
    async fn send(&self, subject: &str, html_body: &str) -> DeliveryReport;
}

#[derive(Debug)]
enum SendFailure {
    Auth,
    Smtp(String),
    Other(String),
}

impl SendFailure {
    fn into_message(self) -> String {
        match self {
            SendFailure::Auth => AUTH_FAILED.to_string(),
            SendFailure::Smtp(e) => format!("SMTP Error: {e}"),
            SendFailure::Other(e) => format!("Error sending email: {e}"),
        }
    }
}

impl From<lettre::transport::smtp::Error> for SendFailure {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        let auth_rejected = err
            .status()
            .map(|code| code.to_string().starts_with("53"))
            .unwrap_or(false);
        if auth_rejected {
            SendFailure::Auth
        } else if err.is_permanent() || err.is_transient() || err.is_response() {
            SendFailure::Smtp(err.to_string())
        } else {
            SendFailure::Other(err.to_string())
        }
    }
}

/// STARTTLS relay with login, configured from [`SmtpConfig`].
pub struct SmtpMailer {
    settings: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(settings: SmtpConfig) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SmtpConfig {
        &self.settings
    }

    /// Sender mailbox, shown as `Name <addr>` when a display name is configured.
    fn sender(&self) -> Result<Mailbox, SendFailure> {
        let address: Address = self
            .settings
            .from
            .trim()
            .parse()
            .map_err(|e| SendFailure::Other(format!("invalid EMAIL_FROM: {e}")))?;
        let name = self.settings.from_name.trim();
        Ok(Mailbox::new(
            (!name.is_empty()).then(|| name.to_string()),
            address,
        ))
    }

    fn build_message(&self, subject: &str, html_body: &str) -> Result<Message, SendFailure> {
        let recipients = self.settings.recipients();
        if recipients.is_empty() {
            return Err(SendFailure::Other("EMAIL_TO is not set".to_string()));
        }

        let mut builder = Message::builder().from(self.sender()?).subject(subject);
        for recipient in &recipients {
            let mailbox: Mailbox = recipient
                .parse()
                .map_err(|e| SendFailure::Other(format!("invalid recipient '{recipient}': {e}")))?;
            builder = builder.to(mailbox);
        }

        builder
            .multipart(MultiPart::alternative().singlepart(SinglePart::html(html_body.to_string())))
            .map_err(|e| SendFailure::Other(e.to_string()))
    }

    async fn try_send(&self, subject: &str, html_body: &str) -> Result<(), SendFailure> {
        if self.settings.username.is_empty() {
            return Err(SendFailure::Other("SMTP_USERNAME is not set".to_string()));
        }
        let message = self.build_message(subject, html_body)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.server)?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.username.clone(),
                self.settings.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(self.settings.timeout_seconds)))
            .build();

        transport.send(message).await?;
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, subject: &str, html_body: &str) -> DeliveryReport {
        match self.try_send(subject, html_body).await {
            Ok(()) => {
                info!(
                    server = %self.settings.server,
                    recipients = self.settings.recipients().len(),
                    subject,
                    "email sent"
                );
                DeliveryReport::sent(format!(
                    "Email sent successfully to {} with subject: {subject}",
                    self.settings.to
                ))
            }
            Err(failure) => {
                let message = failure.into_message();
                warn!(server = %self.settings.server, error = %message, "email delivery failed");
                DeliveryReport::failed(message)
            }
        }
    }
}
