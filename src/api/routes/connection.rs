//! Connection Test Route
//!
//! - GET /api/test - Lets a client check that the backend is reachable

use axum::Json;
use chrono::Utc;

use crate::api::dto::TestResponse;

/// GET /api/test
pub async fn test_connection() -> Json<TestResponse> {
    Json(TestResponse {
        status: "success".to_string(),
        message: "Backend is connected!".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
