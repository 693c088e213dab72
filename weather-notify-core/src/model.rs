use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Normalized live payload returned by a [`crate::WeatherProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: i32,
    pub condition: String,
    pub wind_speed_kmh: f64,
}

/// A single weather snapshot for one notification cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReading {
    pub city: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: i32,
    pub condition: String,
    pub description: String,
    pub wind_speed_kmh: f64,
    pub timestamp: DateTime<Local>,
    /// `"<provider> (Live)"` or `"Backup (<reason>)"`.
    pub data_source: String,
    pub advisory: String,
}

impl WeatherReading {
    pub const FALLBACK_CONDITION: &'static str = "Fallback Mode";
    pub const FALLBACK_ADVISORY: &'static str = "✅ Backup data shown.";

    pub fn live(city: &str, source: &str, obs: Observation, advisory: String) -> Self {
        Self {
            city: city.to_string(),
            temperature_c: obs.temperature_c,
            feels_like_c: obs.feels_like_c,
            humidity_pct: obs.humidity_pct,
            description: obs.condition.clone(),
            condition: obs.condition,
            wind_speed_kmh: obs.wind_speed_kmh,
            timestamp: Local::now(),
            data_source: format!("{source} (Live)"),
            advisory,
        }
    }

    /// Placeholder reading used when live data is unavailable.
    pub fn substitute(city: &str, reason: &str) -> Self {
        Self {
            city: city.to_string(),
            temperature_c: 25.0,
            feels_like_c: 26.0,
            humidity_pct: 60,
            condition: Self::FALLBACK_CONDITION.to_string(),
            description: "System operational (Fallback)".to_string(),
            wind_speed_kmh: 10.0,
            timestamp: Local::now(),
            data_source: format!("Backup ({reason})"),
            advisory: Self::FALLBACK_ADVISORY.to_string(),
        }
    }

    pub fn is_substitute(&self) -> bool {
        self.data_source.starts_with("Backup (")
    }
}

/// A configured report recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    pub name: String,
    pub city: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryMethod {
    Smtp,
    FileLog,
}

impl DeliveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Smtp => "SMTP",
            DeliveryMethod::FileLog => "File Log",
        }
    }
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryResult {
    pub succeeded: bool,
    pub method: DeliveryMethod,
    pub recipient: String,
    pub note: Option<String>,
    pub error: Option<String>,
}

impl DeliveryResult {
    pub fn sent(recipient: &str) -> Self {
        Self {
            succeeded: true,
            method: DeliveryMethod::Smtp,
            recipient: recipient.to_string(),
            note: None,
            error: None,
        }
    }

    pub fn logged(recipient: &str, note: String) -> Self {
        Self {
            succeeded: true,
            method: DeliveryMethod::FileLog,
            recipient: recipient.to_string(),
            note: Some(note),
            error: None,
        }
    }

    pub fn failed(recipient: &str, error: String) -> Self {
        Self {
            succeeded: false,
            method: DeliveryMethod::FileLog,
            recipient: recipient.to_string(),
            note: None,
            error: Some(error),
        }
    }
}
