//! Weather and traffic panels
//!
//! Both panels show fixed sample data. The API server serves the same data so
//! client and server agree when the remote is up.

use serde::{Deserialize, Serialize};

/// Current weather summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature: String,
    pub condition: String,
    pub humidity: u8,
    pub aqi: String,
}

impl WeatherReport {
    pub fn sample() -> Self {
        Self {
            temperature: "28°C".to_string(),
            condition: "Partly Cloudy".to_string(),
            humidity: 65,
            aqi: "Good".to_string(),
        }
    }

    /// Panel line, e.g. "28°C, Partly Cloudy, AQI: Good"
    pub fn summary(&self) -> String {
        format!("{}, {}, AQI: {}", self.temperature, self.condition, self.aqi)
    }
}

/// Severity of a traffic alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficAlert {
    pub location: String,
    pub level: TrafficLevel,
    pub message: String,
}

impl TrafficAlert {
    fn new(location: &str, level: TrafficLevel, message: &str) -> Self {
        Self {
            location: location.to_string(),
            level,
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for TrafficAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

pub fn sample_traffic_alerts() -> Vec<TrafficAlert> {
    vec![
        TrafficAlert::new(
            "Connaught Place",
            TrafficLevel::High,
            "Heavy traffic - delays expected",
        ),
        TrafficAlert::new("India Gate", TrafficLevel::Medium, "Moderate traffic"),
    ]
}
