//! Voice Assistant Routes
//!
//! - POST /api/voice-assistant - Keyword-matched canned responses

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{VoiceRequest, VoiceResponse};
use crate::api::state::AppState;
use crate::dashboard::voice::Language;

/// POST /api/voice-assistant
///
/// Unknown language codes are answered in English but echoed back as sent.
pub async fn voice_assistant(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VoiceRequest>,
) -> Json<VoiceResponse> {
    let language = req.language.parse::<Language>().unwrap_or_default();
    let reply = state.voice.respond(&req.command, language);

    tracing::debug!(topic = ?reply.topic, language = %req.language, "Voice command answered");

    Json(VoiceResponse {
        response: reply.response,
        topic: reply.topic,
        source: reply.source,
        language: req.language,
    })
}
