use crate::config::email::EmailConfig;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::path::Path;

/// Delivers escalation notices to the responsible adults.
///
/// Without SMTP configuration it runs in simulated-delivery mode: the full
/// payload is logged and the attempt is reported as made, so the pipeline
/// behaves identically in development and production.
#[derive(Clone)]
pub struct Notifier {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: Option<String>,
}

impl Notifier {
    pub fn from_env() -> Self {
        match EmailConfig::from_env() {
            Some(cfg) => {
                let creds = Credentials::new(cfg.smtp_username.clone(), cfg.smtp_password.clone());
                let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
                    .map(|builder| builder.port(cfg.smtp_port).credentials(creds).build());

                match transport {
                    Ok(t) => Self {
                        transport: Some(t),
                        from_address: Some(cfg.from_address),
                    },
                    Err(e) => {
                        tracing::warn!("failed to build SMTP transport: {e}");
                        Self {
                            transport: None,
                            from_address: None,
                        }
                    }
                }
            }
            None => Self {
                transport: None,
                from_address: None,
            },
        }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    /// Sends one message to every recipient. Returns whether a delivery
    /// attempt was made: false when there is nobody to notify or the
    /// configured from-address is unusable. Individual send failures are
    /// logged and do not fail the attempt.
    pub async fn notify(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        attachment: Option<&Path>,
    ) -> bool {
        if recipients.is_empty() {
            tracing::warn!("no recipients to notify, skipping");
            return false;
        }

        let (transport, from_address) = match (&self.transport, &self.from_address) {
            (Some(t), Some(f)) => (t, f),
            _ => {
                tracing::info!(
                    recipients = ?recipients,
                    subject,
                    attachment = ?attachment,
                    body,
                    "SMTP not configured, simulated delivery"
                );
                return true;
            }
        };

        let from_mailbox: Mailbox = match from_address.parse() {
            Ok(m) => m,
            Err(e) => {
                tracing::error!("invalid from address '{from_address}': {e}");
                return false;
            }
        };

        let pdf_part = attachment.and_then(|path| match std::fs::read(path) {
            Ok(bytes) => {
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "report.pdf".to_string());
                Some(Attachment::new(filename).body(bytes, ContentType::parse("application/pdf").ok()?))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "could not read attachment: {e}");
                None
            }
        });

        for to in recipients {
            let to_mailbox: Mailbox = match to.parse() {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!("invalid recipient address '{to}': {e}");
                    continue;
                }
            };

            let builder = Message::builder()
                .from(from_mailbox.clone())
                .to(to_mailbox)
                .subject(subject);

            let text_part = SinglePart::plain(body.to_string());
            let message = match &pdf_part {
                Some(pdf) => builder.multipart(
                    MultiPart::mixed().singlepart(text_part).singlepart(pdf.clone()),
                ),
                None => builder.singlepart(text_part),
            };

            match message {
                Ok(email) => match transport.send(email).await {
                    Ok(_) => tracing::info!("notification sent to {to}: {subject}"),
                    Err(e) => tracing::error!("notification to {to} failed: {e}"),
                },
                Err(e) => tracing::error!("could not build notification for {to}: {e}"),
            }
        }
        true
    }
}
