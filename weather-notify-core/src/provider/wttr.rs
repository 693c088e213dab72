use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::{str::FromStr, time::Duration};

use crate::{Observation, error::FetchError, provider::truncate_body};

use super::WeatherProvider;

/// wttr.in JSON (`format=j1`) provider. Needs no API key.
#[derive(Debug, Clone)]
pub struct WttrProvider {
    base_url: String,
    http: Client,
}

impl WttrProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://wttr.in";

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn endpoint(&self, city: &str) -> Result<Url, FetchError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|_| FetchError::InvalidUrl(self.base_url.clone()))?;

        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(city);
        url.query_pairs_mut().append_pair("format", "j1");

        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct WttrValue {
    value: String,
}

#[derive(Debug, Deserialize)]
struct WttrCurrent {
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: String,
    humidity: String,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<WttrValue>,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: String,
}

#[derive(Debug, Deserialize)]
struct WttrResponse {
    #[serde(default)]
    current_condition: Vec<WttrCurrent>,
}

impl TryFrom<WttrResponse> for Observation {
    type Error = FetchError;

    fn try_from(res: WttrResponse) -> Result<Self, Self::Error> {
        let current = res
            .current_condition
            .into_iter()
            .next()
            .ok_or(FetchError::MissingField("current_condition"))?;

        let condition = current
            .weather_desc
            .into_iter()
            .next()
            .map(|d| d.value)
            .ok_or(FetchError::MissingField("weatherDesc"))?;

        Ok(Observation {
            temperature_c: number("temp_C", &current.temp_c)?,
            feels_like_c: number("FeelsLikeC", &current.feels_like_c)?,
            humidity_pct: number("humidity", &current.humidity)?,
            condition,
            wind_speed_kmh: number("windspeedKmph", &current.windspeed_kmph)?,
        })
    }
}

/// wttr.in encodes every numeric field as a string.
fn number<T: FromStr>(field: &str, raw: &str) -> Result<T, FetchError> {
    raw.trim()
        .parse()
        .map_err(|_| FetchError::Decode(format!("{field} = {raw:?} is not a number")))
}

#[async_trait]
impl WeatherProvider for WttrProvider {
    fn name(&self) -> &str {
        "wttr.in"
    }

    async fn current(&self, city: &str) -> Result<Observation, FetchError> {
        let url = self.endpoint(city)?;
        tracing::debug!(%url, "requesting current conditions");

        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: WttrResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        Observation::try_from(parsed)
    }
}
