use anyhow::Context;

use crate::{
    Config, DeliveryResult, Recipient, WeatherClient,
    notifier::Notifier,
    report::render_report,
};

/// Name used by [`NotificationRunner::send_to`] when the caller gives none.
pub const DEFAULT_NAME: &str = "User";

/// Drives fetch, advise, render and deliver for every configured recipient.
#[derive(Debug)]
pub struct NotificationRunner {
    client: WeatherClient,
    notifier: Notifier,
    recipients: Vec<Recipient>,
}

impl NotificationRunner {
    pub fn new(client: WeatherClient, notifier: Notifier, recipients: Vec<Recipient>) -> Self {
        Self {
            client,
            notifier,
            recipients,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = WeatherClient::from_config(&config.weather)
            .context("Failed to build weather HTTP client")?;
        let notifier = Notifier::from_config(&config.smtp, &config.mail_log);

        Ok(Self::new(client, notifier, config.recipients.clone()))
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn client(&self) -> &WeatherClient {
        &self.client
    }

    /// One pass over all recipients. A failed delivery never stops the pass.
    pub async fn run_cycle(&self) -> Vec<DeliveryResult> {
        tracing::info!(recipients = self.recipients.len(), "running scheduled weather check");

        let mut results = Vec::with_capacity(self.recipients.len());
        for recipient in &self.recipients {
            let reading = self.client.fetch_weather(&recipient.city).await;
            let report = render_report(&reading, &recipient.name);

            let result = self
                .notifier
                .deliver(&recipient.email, &report.subject, &report.body)
                .await;

            tracing::info!(
                city = %recipient.city,
                method = %result.method,
                succeeded = result.succeeded,
                "processed recipient"
            );
            results.push(result);
        }

        tracing::info!(delivered = results.iter().filter(|r| r.succeeded).count(), "job complete");
        results
    }

    /// One-off report to an arbitrary address. Returns a status line for display.
    pub async fn send_to(&self, city: &str, email: &str, name: Option<&str>) -> String {
        let reading = self.client.fetch_weather(city).await;
        let report = render_report(&reading, name.unwrap_or(DEFAULT_NAME));

        let result = self.notifier.deliver(email, &report.subject, &report.body).await;

        if result.succeeded {
            format!("✅ Weather report for {city} sent to {email} ({})", result.method)
        } else {
            format!(
                "❌ Failed to send: {}",
                result.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}
