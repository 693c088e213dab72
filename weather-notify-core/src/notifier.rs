//! Delivery of rendered reports: SMTP first, append-only mail log as fallback.

use async_trait::async_trait;
use chrono::Local;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::{
    fmt::Debug,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    config::{SmtpConfig, SmtpCredentials},
    error::DeliveryError,
    model::DeliveryResult,
};

/// Note recorded when no usable SMTP credentials are configured.
pub const CREDENTIALS_MISSING: &str = "SMTP Credentials missing";

const RULE: &str = "======================================================================";
const SEPARATOR: &str = "----------------------------------------------------------------------";

/// Network transport for a single message.
#[async_trait]
pub trait Mailer: Send + Sync + Debug {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError>;
}

/// STARTTLS submission with login to a fixed relay.
#[derive(Clone)]
pub struct SmtpMailer {
    relay: String,
    port: u16,
    timeout: Duration,
    sender: String,
    password: String,
}

impl Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("relay", &self.relay)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, credentials: SmtpCredentials<'_>) -> Self {
        Self {
            relay: config.relay.clone(),
            port: config.port,
            timeout: Duration::from_secs(config.timeout_secs),
            sender: credentials.sender.to_string(),
            password: credentials.password.to_string(),
        }
    }

    fn message(&self, to: &str, subject: &str, body: &str) -> Result<Message, DeliveryError> {
        let from: Mailbox = self.sender.parse().map_err(|e| DeliveryError::Address {
            address: self.sender.clone(),
            reason: format!("{e}"),
        })?;
        let to_mailbox: Mailbox = to.parse().map_err(|e| DeliveryError::Address {
            address: to.to_string(),
            reason: format!("{e}"),
        })?;

        Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| DeliveryError::Message(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        let email = self.message(to, subject, body)?;
        let creds = Credentials::new(self.sender.clone(), self.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.relay)
            .map_err(|e| DeliveryError::Smtp(format!("relay {}: {e}", self.relay)))?
            .port(self.port)
            .timeout(Some(self.timeout))
            .credentials(creds)
            .build();

        mailer
            .send(email)
            .await
            .map_err(|e| DeliveryError::Smtp(e.to_string()))?;

        Ok(())
    }
}

/// Append-only text file standing in for sent mail.
#[derive(Debug, Clone)]
pub struct MailLog {
    path: PathBuf,
}

impl MailLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        note: &str,
    ) -> Result<(), DeliveryError> {
        let entry = format!(
            "\n{RULE}\nTIMESTAMP: {now}\nTO: {to}\nSUBJECT: {subject}\n\
             METHOD: Local File Log (Simulated Email)\nNOTE: {note}\n{SEPARATOR}\n{body}\n{RULE}\n",
            now = Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
        );

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(entry.as_bytes())?;
        Ok(())
    }
}

/// Delivers one message per call and always reports an outcome.
#[derive(Debug)]
pub struct Notifier {
    mailer: Option<Box<dyn Mailer>>,
    log: MailLog,
}

impl Notifier {
    pub fn new(mailer: Option<Box<dyn Mailer>>, log: MailLog) -> Self {
        Self { mailer, log }
    }

    /// SMTP when credentials are usable, otherwise straight to the log.
    pub fn from_config(smtp: &SmtpConfig, log_path: impl Into<PathBuf>) -> Self {
        let mailer = smtp
            .credentials()
            .map(|creds| Box::new(SmtpMailer::new(smtp, creds)) as Box<dyn Mailer>);

        if mailer.is_none() {
            tracing::info!("SMTP not configured, messages go to the mail log");
        }

        Self::new(mailer, MailLog::new(log_path))
    }

    pub async fn deliver(&self, to: &str, subject: &str, body: &str) -> DeliveryResult {
        let note = match &self.mailer {
            Some(mailer) => match mailer.send(to, subject, body).await {
                Ok(()) => {
                    tracing::info!(to, "email sent over SMTP");
                    return DeliveryResult::sent(to);
                }
                Err(err) => {
                    tracing::warn!(to, error = %err, "SMTP delivery failed, logging to file");
                    match err {
                        DeliveryError::Smtp(_) => err.to_string(),
                        other => format!("SMTP Error: {other}"),
                    }
                }
            },
            None => CREDENTIALS_MISSING.to_string(),
        };

        match self.log.append(to, subject, body, &note) {
            Ok(()) => DeliveryResult::logged(to, note),
            Err(err) => {
                tracing::error!(
                    to,
                    path = %self.log.path().display(),
                    error = %err,
                    "mail log write failed"
                );
                DeliveryResult::failed(to, err.to_string())
            }
        }
    }
}
