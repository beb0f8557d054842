pub mod credentials;
pub mod local;
pub mod smtp;

pub use credentials::{load_dotenv, sender_from_env, SenderCredentials};
pub use local::{save_report, DEFAULT_REPORT_PATH};
pub use smtp::{MailTransport, OutgoingMessage, SmtpMailer};

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("invalid email address '{0}'")]
    InvalidAddress(String),
    #[error("no recipients configured")]
    NoRecipients,
    #[error("SMTP delivery failed: {0}")]
    Smtp(String),
    #[error("failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("delivery task failed: {0}")]
    Join(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Local,
    Smtp,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Local => f.write_str("local file"),
            Channel::Smtp => f.write_str("email"),
        }
    }
}

/// Rendered report bodies, shared by both channels.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub subject: String,
    pub plain: String,
    pub html: String,
}

/// What happened to the report.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReceipt {
    pub channel: Channel,
    /// SMTP was attempted and failed, so the report went to disk instead.
    pub fell_back: bool,
    /// File written, for local deliveries.
    pub location: Option<PathBuf>,
    pub recipients: Vec<String>,
    /// Transmission fault that caused the fallback.
    pub error: Option<String>,
}

/// Routes a rendered report to email or to a local file.
///
/// The mode is fixed at construction: without a mail transport every report
/// is saved locally. With one, each delivery makes a single send attempt and
/// falls back to the local file on any fault.
#[derive(Debug, Clone)]
pub struct DeliveryRouter {
    mailer: Option<(Arc<dyn MailTransport>, String)>,
    output_path: PathBuf,
}

impl DeliveryRouter {
    pub fn local(output_path: PathBuf) -> Self {
        Self {
            mailer: None,
            output_path,
        }
    }

    pub fn with_transport(
        transport: Arc<dyn MailTransport>,
        sender: String,
        output_path: PathBuf,
    ) -> Self {
        Self {
            mailer: Some((transport, sender)),
            output_path,
        }
    }

    /// Pick the mode from available credentials: both present means SMTP.
    pub fn from_settings(settings: &crate::config::DeliveryConfig, sender: Option<SenderCredentials>) -> Self {
        match sender {
            Some(credentials) => {
                let from = credentials.user.clone();
                let mailer = SmtpMailer::new(
                    &settings.smtp_host,
                    settings.smtp_port,
                    credentials,
                    settings.smtp_timeout().unwrap_or(smtp::DEFAULT_SMTP_TIMEOUT),
                );
                Self::with_transport(Arc::new(mailer), from, settings.output_path.clone())
            }
            None => {
                tracing::warn!("no sender credentials; reports will be saved locally");
                Self::local(settings.output_path.clone())
            }
        }
    }

    pub fn mode(&self) -> Channel {
        if self.mailer.is_some() {
            Channel::Smtp
        } else {
            Channel::Local
        }
    }

    pub async fn deliver(
        &self,
        report: &RenderedReport,
        recipients: &[String],
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let Some((transport, sender)) = &self.mailer else {
            return self.save_locally(report, recipients, None);
        };

        let message = OutgoingMessage {
            from: sender.clone(),
            to: recipients.to_vec(),
            subject: report.subject.clone(),
            plain: report.plain.clone(),
            html: report.html.clone(),
        };

        let transport = Arc::clone(transport);
        let outcome = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| DeliveryError::Join(e.to_string()))
            .and_then(|result| result);

        match outcome {
            Ok(()) => {
                tracing::info!(recipients = recipients.len(), "report emailed");
                Ok(DeliveryReceipt {
                    channel: Channel::Smtp,
                    fell_back: false,
                    location: None,
                    recipients: recipients.to_vec(),
                    error: None,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "email delivery failed, saving report locally");
                self.save_locally(report, recipients, Some(e.to_string()))
            }
        }
    }

    fn save_locally(
        &self,
        report: &RenderedReport,
        recipients: &[String],
        error: Option<String>,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let location = save_report(&self.output_path, &report.html)?;
        tracing::info!(path = %location.display(), "report saved");
        Ok(DeliveryReceipt {
            channel: Channel::Local,
            fell_back: error.is_some(),
            location: Some(location),
            recipients: recipients.to_vec(),
            error,
        })
    }
}
