//! Core library for the `weather-notify` service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Weather providers and the fallback-absorbing [`WeatherClient`]
//! - Advisories, report rendering and mail delivery with a file fallback
//! - The notification cycle, ad-hoc dispatch and the interval scheduler
//!
//! It is used by `weather-notify-cli`, but can also be embedded in other
//! binaries or agent frameworks.

pub mod advisory;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod notifier;
pub mod provider;
pub mod report;
pub mod runner;
pub mod scheduler;

pub use advisory::advise;
pub use client::WeatherClient;
pub use config::{Config, ScheduleConfig, SmtpConfig, WeatherConfig};
pub use error::{DeliveryError, FetchError};
pub use model::{DeliveryMethod, DeliveryResult, Observation, Recipient, WeatherReading};
pub use notifier::{MailLog, Mailer, Notifier, SmtpMailer};
pub use provider::{WeatherProvider, WttrProvider};
pub use report::{Report, render_report};
pub use runner::NotificationRunner;
pub use scheduler::{Scheduler, SchedulerHandle};
