use serde::{Deserialize, Serialize};

/// Body of POST /api/chat. Optional at the serde layer so missing fields
/// produce the contract's 400 messages.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}
