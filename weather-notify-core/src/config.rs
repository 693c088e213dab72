use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::Recipient;

/// Env var holding the sender address; overrides `smtp.sender`.
pub const SMTP_EMAIL_VAR: &str = "SMTP_EMAIL";
/// Env var holding the SMTP secret. Never persisted.
pub const SMTP_PASSWORD_VAR: &str = "SMTP_PASSWORD";
/// Value shipped in sample `.env` files; treated as "not configured".
pub const PLACEHOLDER_PASSWORD: &str = "your_app_password_here";

/// Weather provider endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: crate::provider::WttrProvider::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Mail relay settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub relay: String,
    pub port: u16,
    pub sender: Option<String>,
    pub timeout_secs: u64,
    #[serde(skip)]
    pub password: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            relay: "smtp.gmail.com".to_string(),
            port: 587,
            sender: None,
            timeout_secs: 30,
            password: None,
        }
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("relay", &self.relay)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("timeout_secs", &self.timeout_secs)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Sender address and secret, present only when both are usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmtpCredentials<'a> {
    pub sender: &'a str,
    pub password: &'a str,
}

impl SmtpConfig {
    /// Returns credentials unless either part is missing, empty or the placeholder.
    pub fn credentials(&self) -> Option<SmtpCredentials<'_>> {
        let sender = self.sender.as_deref().filter(|s| !s.trim().is_empty())?;
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty() && *p != PLACEHOLDER_PASSWORD)?;

        Some(SmtpCredentials { sender, password })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        // six hours
        Self { interval_secs: 21_600 }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Append-only file receiving messages that could not go out over SMTP.
    pub mail_log: PathBuf,

    pub weather: WeatherConfig,
    pub smtp: SmtpConfig,
    pub schedule: ScheduleConfig,

    /// Example TOML:
    /// [[recipients]]
    /// email = "someone@example.com"
    /// name = "Someone"
    /// city = "Nagpur"
    pub recipients: Vec<Recipient>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mail_log: PathBuf::from("sent_emails.log"),
            weather: WeatherConfig::default(),
            smtp: SmtpConfig::default(),
            schedule: ScheduleConfig::default(),
            recipients: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from the platform location, then overlay `.env` and process env.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Like [`Config::load`] but from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if let Ok(env_file) = dotenv::dotenv() {
            tracing::debug!(path = %env_file.display(), "loaded .env");
        }

        let mut cfg = Self::read_from(path)?;
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Parse a config file without consulting the environment. A missing file
    /// yields the defaults.
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Overlay SMTP credentials from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(sender) = lookup(SMTP_EMAIL_VAR).filter(|s| !s.is_empty()) {
            self.smtp.sender = Some(sender);
        }
        if let Some(password) = lookup(SMTP_PASSWORD_VAR) {
            self.smtp.password = Some(password);
        }
    }

    /// Save config to the platform location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-notify", "weather-notify")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Add a recipient, replacing one with the same email and city.
    /// Returns `true` when the entry is new.
    pub fn add_recipient(&mut self, recipient: Recipient) -> bool {
        match self
            .recipients
            .iter_mut()
            .find(|r| r.email == recipient.email && r.city.eq_ignore_ascii_case(&recipient.city))
        {
            Some(existing) => {
                *existing = recipient;
                false
            }
            None => {
                self.recipients.push(recipient);
                true
            }
        }
    }

    pub fn remove_recipient(&mut self, email: &str, city: &str) -> bool {
        let before = self.recipients.len();
        self.recipients
            .retain(|r| !(r.email == email && r.city.eq_ignore_ascii_case(city)));
        self.recipients.len() < before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn recipient(email: &str, name: &str, city: &str) -> Recipient {
        Recipient {
            email: email.into(),
            name: name.into(),
            city: city.into(),
        }
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_service_expectations() {
        let cfg = Config::default();

        assert_eq!(cfg.mail_log, PathBuf::from("sent_emails.log"));
        assert_eq!(cfg.weather.base_url, "https://wttr.in");
        assert_eq!(cfg.weather.timeout_secs, 10);
        assert_eq!(cfg.smtp.relay, "smtp.gmail.com");
        assert_eq!(cfg.smtp.port, 587);
        assert_eq!(cfg.schedule.interval_secs, 21_600);
        assert!(cfg.recipients.is_empty());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [schedule]
            interval_secs = 60

            [[recipients]]
            email = "a@example.com"
            name = "A"
            city = "Nagpur"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.schedule.interval_secs, 60);
        assert_eq!(cfg.smtp.port, 587);
        assert_eq!(cfg.recipients, vec![recipient("a@example.com", "A", "Nagpur")]);
    }

    #[test]
    fn missing_file_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::read_from(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.recipients.is_empty());
    }

    #[test]
    fn save_then_read_keeps_recipients_but_not_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.add_recipient(recipient("a@example.com", "A", "Nagpur"));
        cfg.smtp.sender = Some("me@example.com".into());
        cfg.smtp.password = Some("secret".into());
        cfg.save_to(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("secret"));

        let loaded = Config::read_from(&path).unwrap();
        assert_eq!(loaded.recipients.len(), 1);
        assert_eq!(loaded.smtp.sender.as_deref(), Some("me@example.com"));
        assert!(loaded.smtp.password.is_none());
    }

    #[test]
    fn garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "recipients = 5").unwrap();

        let err = Config::read_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn env_supplies_credentials() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[(SMTP_EMAIL_VAR, "me@example.com"), (SMTP_PASSWORD_VAR, "pw")]));

        let creds = cfg.smtp.credentials().expect("credentials must be usable");
        assert_eq!(creds.sender, "me@example.com");
        assert_eq!(creds.password, "pw");
    }

    #[test]
    fn placeholder_or_missing_password_is_unconfigured() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[(SMTP_EMAIL_VAR, "me@example.com")]));
        assert!(cfg.smtp.credentials().is_none());

        cfg.apply_env(env(&[(SMTP_PASSWORD_VAR, PLACEHOLDER_PASSWORD)]));
        assert!(cfg.smtp.credentials().is_none());

        cfg.apply_env(env(&[(SMTP_PASSWORD_VAR, "")]));
        assert!(cfg.smtp.credentials().is_none());
    }

    #[test]
    fn debug_output_hides_password() {
        let mut cfg = Config::default();
        cfg.smtp.password = Some("hunter2".into());
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }

    #[test]
    fn add_recipient_replaces_same_email_and_city() {
        let mut cfg = Config::default();

        assert!(cfg.add_recipient(recipient("a@example.com", "A", "Nagpur")));
        assert!(cfg.add_recipient(recipient("a@example.com", "A", "Bangalore")));
        assert!(!cfg.add_recipient(recipient("a@example.com", "Alice", "Nagpur")));

        assert_eq!(cfg.recipients.len(), 2);
        assert_eq!(cfg.recipients[0].name, "Alice");
    }

    #[test]
    fn remove_recipient_by_email_and_city() {
        let mut cfg = Config::default();
        cfg.add_recipient(recipient("a@example.com", "A", "Nagpur"));

        assert!(!cfg.remove_recipient("a@example.com", "Pune"));
        assert!(cfg.remove_recipient("a@example.com", "nagpur"));
        assert!(cfg.recipients.is_empty());
    }
}
