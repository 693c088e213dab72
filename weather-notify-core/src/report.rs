use crate::WeatherReading;

/// Rendered email subject and plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub body: String,
}

pub fn render_report(reading: &WeatherReading, name: &str) -> Report {
    let subject = format!(
        "🌤️ Weather: {} - {:.1}°C | {}",
        reading.city, reading.temperature_c, reading.condition
    );

    let body = format!(
        "
Dear {name},

Here is the weather update for {city}:

Temp: {temp:.1}°C (Feels like {feels:.1}°C)
Condition: {description}
Humidity: {humidity}%
Wind: {wind:.1} km/h
Source: {source}

Advisory: {advisory}

Best,
Weather Agent
",
        city = reading.city,
        temp = reading.temperature_c,
        feels = reading.feels_like_c,
        description = reading.description,
        humidity = reading.humidity_pct,
        wind = reading.wind_speed_kmh,
        source = reading.data_source,
        advisory = reading.advisory,
    );

    Report { subject, body }
}
