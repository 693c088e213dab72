//! Human-readable terminal output.

use chrono::Local;
use weather_notify_core::{DeliveryResult, Recipient, WeatherReading};

pub fn print_reading(reading: &WeatherReading) {
    println!("{} ({})", reading.city, reading.timestamp.format("%Y-%m-%d %H:%M:%S"));
    println!(
        "  Temp:      {:.1}°C (feels like {:.1}°C)",
        reading.temperature_c, reading.feels_like_c
    );
    println!("  Condition: {}", reading.description);
    println!("  Humidity:  {}%", reading.humidity_pct);
    println!("  Wind:      {:.1} km/h", reading.wind_speed_kmh);
    println!("  Source:    {}", reading.data_source);
    println!("  Advisory:  {}", reading.advisory);
}

pub fn print_results(recipients: &[Recipient], results: &[DeliveryResult]) {
    for (recipient, result) in recipients.iter().zip(results) {
        let mark = if result.succeeded { "👉" } else { "❌" };
        let detail = result.error.as_deref().or(result.note.as_deref()).unwrap_or("");

        println!(
            "   {mark} processed {} for {}: {} {detail}",
            recipient.city, result.recipient, result.method
        );
    }
    println!("[{}] ✅ Job complete.", Local::now().format("%Y-%m-%d %H:%M:%S"));
}

pub fn print_recipients(recipients: &[Recipient]) {
    if recipients.is_empty() {
        println!("No recipients configured.");
        return;
    }

    for r in recipients {
        println!("{:<30} {:<16} {}", r.email, r.name, r.city);
    }
}
