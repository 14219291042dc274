//! EcoRoute REST API Client
//!
//! Typed client for the endpoints served by `ecoroute-api`. Every call
//! returns a [`RemoteResult`]; callers decide whether a failure means
//! "fall back" or "show the user".

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::api::dto::{
    AuthResponse, FeedbackResponse, LoginRequest, RouteRequest, RouteResponse, SignupRequest,
    TestResponse, TrafficResponse, UserDto, VoiceRequest, VoiceResponse,
};
use crate::auth::RemoteAuth;
use crate::dashboard::conditions::{TrafficAlert, WeatherReport};
use crate::dashboard::feedback::FeedbackRecord;
use crate::dashboard::voice::Language;
use crate::remote::error::{RemoteError, RemoteResult};

/// Client configuration
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the API (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// EcoRoute API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: RemoteConfig,
}

impl ApiClient {
    pub fn new(config: RemoteConfig) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET /api/test
    pub async fn test_connection(&self) -> RemoteResult<TestResponse> {
        self.get("/api/test", &[]).await
    }

    /// POST /api/signup
    pub async fn signup(&self, request: &SignupRequest) -> RemoteResult<UserDto> {
        let response: AuthResponse = self.post("/api/signup", request).await?;
        Ok(response.user)
    }

    /// POST /api/login
    pub async fn login(&self, request: &LoginRequest) -> RemoteResult<UserDto> {
        let response: AuthResponse = self.post("/api/login", request).await?;
        Ok(response.user)
    }

    /// GET /api/weather
    pub async fn weather(&self, lat: f64, lon: f64) -> RemoteResult<WeatherReport> {
        self.get(
            "/api/weather",
            &[("lat", lat.to_string()), ("lon", lon.to_string())],
        )
        .await
    }

    /// GET /api/traffic
    pub async fn traffic(&self) -> RemoteResult<Vec<TrafficAlert>> {
        let response: TrafficResponse = self.get("/api/traffic", &[]).await?;
        Ok(response.alerts)
    }

    /// POST /api/calculate-route
    pub async fn calculate_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> RemoteResult<RouteResponse> {
        let body = RouteRequest {
            origin: origin.to_string(),
            destination: destination.to_string(),
        };
        self.post("/api/calculate-route", &body).await
    }

    /// POST /api/voice-assistant
    pub async fn voice_command(
        &self,
        command: &str,
        language: Language,
    ) -> RemoteResult<VoiceResponse> {
        let body = VoiceRequest {
            command: command.to_string(),
            language: language.code().to_string(),
        };
        self.post("/api/voice-assistant", &body).await
    }

    /// POST /api/feedback
    pub async fn submit_feedback(&self, record: &FeedbackRecord) -> RemoteResult<FeedbackResponse> {
        self.post("/api/feedback", record).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> RemoteResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(RemoteError::from_reqwest)?;

        handle_response(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> RemoteResult<T> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(RemoteError::from_reqwest)?;

        handle_response(response).await
    }
}

#[async_trait]
impl RemoteAuth for ApiClient {
    async fn signup(&self, request: &SignupRequest) -> RemoteResult<UserDto> {
        ApiClient::signup(self, request).await
    }

    async fn login(&self, request: &LoginRequest) -> RemoteResult<UserDto> {
        ApiClient::login(self, request).await
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
    let status = response.status();

    if status.is_success() {
        return response.json().await.map_err(RemoteError::from_reqwest);
    }

    let text = response.text().await.unwrap_or_default();
    let message = error_message(&text);
    let status = status.as_u16();

    if status >= 500 {
        Err(RemoteError::Server { status, message })
    } else {
        Err(RemoteError::Rejected { status, message })
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Pull the human message out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    if let Ok(plain) = serde_json::from_str::<MessageBody>(body) {
        return plain.message;
    }
    body.trim().to_string()
}
