//! Contact form mailer
//!
//! One-shot SMTP delivery via lettre. The transport is optional: without
//! SMTP_HOST configured every send fails fast with the generic mail
//! error. No retries, no queue.

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::core::MailConfig;
use crate::utils::{AppError, AppResult};
use shared::ErrorCode;
use shared::models::ContactMessage;

/// SMTP mailer for the contact form
#[derive(Clone)]
pub struct MailerService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
    contact_recipient: String,
}

impl MailerService {
    /// Build the mailer; a missing SMTP host disables the transport
    pub fn new(config: &MailConfig) -> Self {
        let transport = match &config.smtp_host {
            Some(host) => match AsyncSmtpTransport::<Tokio1Executor>::relay(host) {
                Ok(builder) => {
                    let mut builder = builder.port(config.smtp_port);
                    if let (Some(user), Some(pass)) =
                        (&config.smtp_username, &config.smtp_password)
                    {
                        builder =
                            builder.credentials(Credentials::new(user.clone(), pass.clone()));
                    }
                    tracing::info!(host = %host, port = config.smtp_port, "SMTP transport configured");
                    Some(builder.build())
                }
                Err(e) => {
                    tracing::error!(host = %host, error = %e, "Invalid SMTP configuration, mail disabled");
                    None
                }
            },
            None => {
                tracing::info!("SMTP_HOST not set, contact mail disabled");
                None
            }
        };

        Self {
            transport,
            from_address: config.from_address.clone(),
            contact_recipient: config.contact_recipient.clone(),
        }
    }

    /// A mailer with no transport; every send reports the generic failure
    pub fn disabled() -> Self {
        Self {
            transport: None,
            from_address: "admin@example.com".into(),
            contact_recipient: "admin@example.com".into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Deliver a contact form submission to the configured recipient
    ///
    /// Fire-and-forget: a failed delivery is logged and reported once,
    /// never retried.
    pub async fn send_contact(&self, contact: &ContactMessage) -> AppResult<()> {
        let Some(transport) = &self.transport else {
            return Err(AppError::new(ErrorCode::MailNotConfigured));
        };

        let from: Mailbox = self
            .from_address
            .parse()
            .map_err(|e| AppError::internal(format!("Invalid MAIL_FROM address: {e}")))?;
        let to: Mailbox = self
            .contact_recipient
            .parse()
            .map_err(|e| AppError::internal(format!("Invalid CONTACT_RECIPIENT address: {e}")))?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(format!("Contact form message from {}", contact.name))
            .header(ContentType::TEXT_PLAIN);

        // Reply-to the sender when their address parses
        if let Ok(reply_to) = contact.email.parse::<Mailbox>() {
            builder = builder.reply_to(reply_to);
        }

        let message = builder
            .body(render_contact_body(contact))
            .map_err(|e| AppError::internal(format!("Failed to build mail: {e}")))?;

        transport.send(message).await.map_err(|e| {
            tracing::error!(error = %e, "Contact mail delivery failed");
            AppError::new(ErrorCode::MailSendFailed)
        })?;

        tracing::info!(sender = %contact.email, "Contact mail delivered");
        Ok(())
    }
}

/// Plain-text body of the contact mail
fn render_contact_body(contact: &ContactMessage) -> String {
    format!(
        "New contact form submission\n\
         \n\
         Name: {}\n\
         Email: {}\n\
         \n\
         Message:\n\
         {}\n",
        contact.name, contact.email, contact.message
    )
}
