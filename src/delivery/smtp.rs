use super::credentials::SenderCredentials;
use super::DeliveryError;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::fmt::Debug;
use std::time::Duration;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A fully rendered email, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub plain: String,
    pub html: String,
}

/// Synchronous mail channel. Exactly one attempt per call.
pub trait MailTransport: Debug + Send + Sync {
    fn send(&self, message: &OutgoingMessage) -> Result<(), DeliveryError>;
}

/// STARTTLS relay with login credentials, bounded by a timeout.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: SenderCredentials,
    timeout: Duration,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, credentials: SenderCredentials, timeout: Duration) -> Self {
        Self {
            host: host.to_string(),
            port,
            credentials,
            timeout,
        }
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, message: &OutgoingMessage) -> Result<(), DeliveryError> {
        let email = build_message(message)?;

        let transport = SmtpTransport::starttls_relay(&self.host)
            .map_err(|e| DeliveryError::Smtp(e.to_string()))?
            .port(self.port)
            .credentials(Credentials::new(
                self.credentials.user.clone(),
                self.credentials.password.clone(),
            ))
            .timeout(Some(self.timeout))
            .build();

        transport
            .send(&email)
            .map_err(|e| DeliveryError::Smtp(e.to_string()))?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .trim()
        .parse()
        .map_err(|_| DeliveryError::InvalidAddress(address.to_string()))
}

/// Build a multipart/alternative message (plain text + HTML).
pub fn build_message(message: &OutgoingMessage) -> Result<Message, DeliveryError> {
    if message.to.is_empty() {
        return Err(DeliveryError::NoRecipients);
    }

    let mut builder = Message::builder()
        .from(parse_mailbox(&message.from)?)
        .subject(message.subject.clone());
    for recipient in &message.to {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            message.plain.clone(),
            message.html.clone(),
        ))
        .map_err(|e| DeliveryError::Smtp(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: Vec<&str>) -> OutgoingMessage {
        OutgoingMessage {
            from: "hr@example.com".to_string(),
            to: to.into_iter().map(String::from).collect(),
            subject: "Recruitment report".to_string(),
            plain: "plain body".to_string(),
            html: "<p>html body</p>".to_string(),
        }
    }

    #[test]
    fn test_build_message_multipart() {
        let built = build_message(&message(vec!["lead@example.com", "cto@example.com"])).unwrap();
        let raw = String::from_utf8(built.formatted()).unwrap();
        assert!(raw.contains("Subject: Recruitment report"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("plain body"));
        assert!(raw.contains("<p>html body</p>"));
        assert!(raw.contains("lead@example.com"));
        assert!(raw.contains("cto@example.com"));
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        let result = build_message(&message(vec!["not an address"]));
        assert!(matches!(result, Err(DeliveryError::InvalidAddress(addr)) if addr == "not an address"));
    }

    #[test]
    fn test_build_message_requires_recipients() {
        assert!(matches!(
            build_message(&message(vec![])),
            Err(DeliveryError::NoRecipients)
        ));
    }
}
