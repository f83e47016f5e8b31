use axum::{extract::State, Json};
use tracing::{debug, instrument};

use crate::{
    chat::{
        dto::{ChatRequest, ChatResponse},
        services,
    },
    error::ApiError,
    state::AppState,
};

#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = match payload.message.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => return Err(ApiError::validation("Message is required.")),
    };
    let session_id = match payload.session_id.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => return Err(ApiError::validation("Session ID is required.")),
    };

    debug!(%session_id, "user input received");
    let response = services::reply(
        &state.chat_sessions,
        state.chat_ai.as_ref(),
        &session_id,
        &message,
    )
    .await?;

    Ok(Json(ChatResponse { response }))
}
