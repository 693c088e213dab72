use thiserror::Error;

/// Failure to obtain live weather data. Never escapes [`crate::WeatherClient`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid weather endpoint '{0}'")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode weather JSON: {0}")]
    Decode(String),

    #[error("Weather response is missing '{0}'")]
    MissingField(&'static str),
}

impl FetchError {
    /// Reason text embedded in a substitute reading's data source.
    pub fn fallback_reason(&self) -> String {
        match self {
            FetchError::Status { status, .. } => format!("Service busy (HTTP {status})"),
            other => other.to_string(),
        }
    }
}

/// Failure to hand a message to SMTP or to the mail log.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("SMTP Error: {0}")]
    Smtp(String),

    #[error("Failed to log email: {0}")]
    Log(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_read_as_service_busy() {
        let err = FetchError::Status { status: 503, body: "down".into() };
        assert_eq!(err.fallback_reason(), "Service busy (HTTP 503)");
    }

    #[test]
    fn other_errors_use_display_text() {
        let err = FetchError::MissingField("current_condition");
        assert_eq!(err.fallback_reason(), "Weather response is missing 'current_condition'");
    }
}
