use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use weather_notify_core::{
    Config, NotificationRunner, Recipient, Scheduler,
    config::{SMTP_EMAIL_VAR, SMTP_PASSWORD_VAR},
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-notify", version, about = "Scheduled weather reports by email")]
pub struct Cli {
    /// Config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a cycle now, then keep running on a fixed interval until Ctrl+C.
    Run {
        /// Seconds between cycles; overrides `schedule.interval_secs`.
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Run a single cycle over all recipients and exit.
    Once,

    /// Send a one-off report to any address.
    Send {
        city: String,
        email: String,

        /// Name used in the greeting.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show current weather for a city.
    Fetch {
        city: String,

        /// Print the reading as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactively set the sender address and add recipients.
    Configure,

    /// List configured recipients.
    Recipients,

    /// Remove a recipient by email and city.
    Remove { email: String, city: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };

        match self.command {
            Command::Run { interval } => {
                let config = Config::load_from(&path)?;
                let interval =
                    Duration::from_secs(interval.unwrap_or(config.schedule.interval_secs));
                let runner = Arc::new(runner_with_recipients(&config)?);

                println!("⏱️  Scheduler started! Running every {} seconds.", interval.as_secs());
                println!("Use Ctrl+C to stop.");

                let handle = Scheduler::new(runner).start(interval);
                tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl+C")?;

                println!("Stopping after the current cycle...");
                handle.stop();
                let cycles = handle.join().await.context("Scheduler task failed")?;
                println!("Scheduler stopped after {cycles} cycle(s).");
            }
            Command::Once => {
                let config = Config::load_from(&path)?;
                let runner = runner_with_recipients(&config)?;

                let results = runner.run_cycle().await;
                output::print_results(runner.recipients(), &results);
            }
            Command::Send { city, email, name } => {
                let config = Config::load_from(&path)?;
                let runner = NotificationRunner::from_config(&config)?;

                println!("{}", runner.send_to(&city, &email, name.as_deref()).await);
            }
            Command::Fetch { city, json } => {
                let config = Config::load_from(&path)?;
                let runner = NotificationRunner::from_config(&config)?;
                let reading = runner.client().fetch_weather(&city).await;

                if json {
                    println!("{}", serde_json::to_string_pretty(&reading)?);
                } else {
                    output::print_reading(&reading);
                }
            }
            Command::Configure => configure(&path)?,
            Command::Recipients => {
                let config = Config::read_from(&path)?;
                output::print_recipients(&config.recipients);
            }
            Command::Remove { email, city } => {
                let mut config = Config::read_from(&path)?;
                if !config.remove_recipient(&email, &city) {
                    bail!("No recipient {email} for {city}.");
                }
                config.save_to(&path)?;
                println!("Removed {email} ({city}).");
            }
        }

        Ok(())
    }
}

fn runner_with_recipients(config: &Config) -> anyhow::Result<NotificationRunner> {
    if config.recipients.is_empty() {
        bail!(
            "No recipients configured.\n\
             Hint: run `weather-notify configure` and add at least one recipient."
        );
    }
    NotificationRunner::from_config(config)
}

fn configure(path: &Path) -> anyhow::Result<()> {
    // read without the env overlay so nothing from the environment is persisted
    let mut config = Config::read_from(path)?;

    let sender = Text::new("Sender address (SMTP login):")
        .with_default(config.smtp.sender.as_deref().unwrap_or_default())
        .prompt()?;
    let sender = sender.trim();
    config.smtp.sender = (!sender.is_empty()).then(|| sender.to_string());

    loop {
        let add = Confirm::new("Add a recipient?")
            .with_default(config.recipients.is_empty())
            .prompt()?;
        if !add {
            break;
        }

        let email = Text::new("Email:")
            .with_validator(inquire::required!("email is required"))
            .prompt()?;
        let name = Text::new("Name:").with_default("User").prompt()?;
        let city = Text::new("City:")
            .with_validator(inquire::required!("city is required"))
            .prompt()?;

        let recipient = Recipient {
            email: email.trim().to_string(),
            name: name.trim().to_string(),
            city: city.trim().to_string(),
        };
        if !config.add_recipient(recipient) {
            println!("Updated existing entry.");
        }
    }

    config.save_to(path)?;

    println!("Saved configuration to {}", path.display());
    if std::env::var_os(SMTP_PASSWORD_VAR).is_none() {
        println!(
            "Set {SMTP_PASSWORD_VAR} (and optionally {SMTP_EMAIL_VAR}) in the environment or a \
             .env file to send over SMTP; until then reports go to {}.",
            config.mail_log.display()
        );
    }

    Ok(())
}
