//! Short human-readable advisories derived from current conditions.

pub const EXTREME_HEAT: &str = "🔥 Extreme heat warning!";
pub const HYDRATE: &str = "☀️ Stay hydrated.";
pub const COLD: &str = "❄️ Wear warm clothes.";
pub const RAIN: &str = "🌧️ Rain alert.";
pub const STORM: &str = "⛈️ Storm alert.";
pub const NORMAL: &str = "✅ Conditions normal.";

/// Build the advisory for a reading.
///
/// At most one temperature clause and one condition clause fire; they are
/// joined with a space, temperature first. Humidity is accepted but does not
/// currently influence the result.
pub fn advise(temp_c: f64, condition: &str, _humidity_pct: i32) -> String {
    let condition = condition.to_lowercase();

    let temperature = if temp_c >= 40.0 {
        Some(EXTREME_HEAT)
    } else if temp_c >= 35.0 {
        Some(HYDRATE)
    } else if temp_c <= 10.0 {
        Some(COLD)
    } else {
        None
    };

    let sky = if condition.contains("rain") {
        Some(RAIN)
    } else if condition.contains("storm") {
        Some(STORM)
    } else {
        None
    };

    let clauses: Vec<&str> = temperature.into_iter().chain(sky).collect();
    if clauses.is_empty() {
        NORMAL.to_string()
    } else {
        clauses.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extreme_heat_wins_over_hydration() {
        assert_eq!(advise(41.0, "Clear", 50), "🔥 Extreme heat warning!");
        assert_eq!(advise(40.0, "Clear", 50), "🔥 Extreme heat warning!");
    }

    #[test]
    fn single_temperature_clauses() {
        assert_eq!(advise(36.0, "Clear", 50), "☀️ Stay hydrated.");
        assert_eq!(advise(5.0, "Clear", 50), "❄️ Wear warm clothes.");
        assert_eq!(advise(10.0, "Sunny", 50), "❄️ Wear warm clothes.");
    }

    #[test]
    fn condition_clause_alone() {
        assert_eq!(advise(20.0, "Heavy rain", 50), "🌧️ Rain alert.");
        assert_eq!(advise(20.0, "STORM warning", 50), "⛈️ Storm alert.");
    }

    #[test]
    fn rain_takes_precedence_over_storm() {
        assert_eq!(advise(20.0, "Rainstorm", 50), "🌧️ Rain alert.");
    }

    #[test]
    fn temperature_and_condition_are_joined() {
        assert_eq!(advise(36.0, "Thunderstorm expected", 50), "☀️ Stay hydrated. ⛈️ Storm alert.");
        assert_eq!(advise(3.0, "Light rain shower", 90), "❄️ Wear warm clothes. 🌧️ Rain alert.");
    }

    #[test]
    fn nothing_fires() {
        assert_eq!(advise(20.0, "Clear", 50), "✅ Conditions normal.");
    }
}
