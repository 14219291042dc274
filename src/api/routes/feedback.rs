//! Feedback Routes
//!
//! - POST /api/feedback - Store a rating submitted by a client

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::FeedbackResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::feedback::{FeedbackError, FeedbackRecord, MAX_RATING};

/// POST /api/feedback
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Json(record): Json<FeedbackRecord>,
) -> ApiResult<(StatusCode, Json<FeedbackResponse>)> {
    if record.feedback.is_empty() || record.rating == 0 {
        return Err(FeedbackError::MissingInput.into());
    }
    if record.rating > MAX_RATING {
        return Err(FeedbackError::InvalidRating(record.rating).into());
    }
    if record.user.is_empty() {
        return Err(ApiError::Validation("Feedback must name a user".to_string()));
    }

    state.feedback.append(&record)?;
    let total = state.feedback.list()?.len();

    tracing::info!(user = %record.user, rating = record.rating, "Feedback received");

    Ok((
        StatusCode::CREATED,
        Json(FeedbackResponse {
            status: "success".to_string(),
            message: "Thank you for your feedback!".to_string(),
            total,
        }),
    ))
}
