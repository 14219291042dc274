//! Data Transfer Objects
//!
//! Request and response types for the API endpoints. The server and the
//! remote client share these, so every type derives both directions.

use serde::{Deserialize, Serialize};

use crate::dashboard::conditions::TrafficAlert;
use crate::dashboard::routing::RouteOption;
use crate::dashboard::voice::{Language, Topic};

// ============================================
// AUTH DTOs
// ============================================

/// POST /api/signup body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /api/login body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user (never includes credentials)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Signup and login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Status: "success"
    pub status: String,
    pub message: String,
    pub user: UserDto,
}

// ============================================
// CONNECTION DTOs
// ============================================

/// GET /api/test response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResponse {
    pub status: String,
    pub message: String,
    /// RFC 3339 server time
    pub timestamp: String,
}

// ============================================
// CONDITIONS DTOs
// ============================================

/// GET /api/weather query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherQuery {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// GET /api/traffic response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficResponse {
    pub alerts: Vec<TrafficAlert>,
}

// ============================================
// ROUTE DTOs
// ============================================

/// POST /api/calculate-route body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
}

/// A route option as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDto {
    pub id: u32,
    #[serde(flatten)]
    pub route: RouteOption,
    pub eco_score: u8,
}

/// POST /api/calculate-route response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub status: String,
    pub origin: String,
    pub destination: String,
    pub routes: Vec<RouteDto>,
}

// ============================================
// VOICE DTOs
// ============================================

/// POST /api/voice-assistant body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceRequest {
    pub command: String,
    /// Language code, e.g. "en" or "hi"; unknown codes answer in English
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    Language::En.code().to_string()
}

/// POST /api/voice-assistant response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceResponse {
    pub response: String,
    pub topic: Topic,
    /// Where the answer came from: "rules"
    pub source: String,
    pub language: String,
}

// ============================================
// FEEDBACK DTOs
// ============================================

/// POST /api/feedback response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub status: String,
    pub message: String,
    /// Total feedback records held by the server
    pub total: usize,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "unhealthy"
    pub status: String,
    /// Store status: "ok" or "error"
    pub store: String,
    pub uptime_seconds: u64,
    pub version: String,
}
