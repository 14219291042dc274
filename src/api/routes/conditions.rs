//! Conditions Routes
//!
//! - GET /api/weather - Current weather (sample data)
//! - GET /api/traffic - Traffic alerts (sample data)

use axum::{extract::Query, Json};

use crate::api::dto::{TrafficResponse, WeatherQuery};
use crate::dashboard::conditions::{sample_traffic_alerts, WeatherReport};

/// GET /api/weather
///
/// Coordinates are accepted but do not change the report.
pub async fn get_weather(Query(query): Query<WeatherQuery>) -> Json<WeatherReport> {
    tracing::debug!(lat = ?query.lat, lon = ?query.lon, "Weather requested");
    Json(WeatherReport::sample())
}

/// GET /api/traffic
pub async fn get_traffic() -> Json<TrafficResponse> {
    Json(TrafficResponse {
        alerts: sample_traffic_alerts(),
    })
}
