use std::time::Duration;

use crate::{
    WeatherReading, advisory::advise, config::WeatherConfig, error::FetchError,
    provider::{WeatherProvider, WttrProvider},
};

/// Fetches readings and never fails: any provider error becomes a
/// substitute reading tagged with the cause.
#[derive(Debug)]
pub struct WeatherClient {
    provider: Box<dyn WeatherProvider>,
}

impl WeatherClient {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, FetchError> {
        let provider =
            WttrProvider::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(Box::new(provider)))
    }

    pub async fn fetch_weather(&self, city: &str) -> WeatherReading {
        match self.provider.current(city).await {
            Ok(obs) => {
                let advisory = advise(obs.temperature_c, &obs.condition, obs.humidity_pct);
                WeatherReading::live(city, self.provider.name(), obs, advisory)
            }
            Err(err) => {
                tracing::warn!(city, error = %err, "weather fetch failed, using backup data");
                WeatherReading::substitute(city, &err.fallback_reason())
            }
        }
    }
}
