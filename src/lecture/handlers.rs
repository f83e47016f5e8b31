use std::path::Path;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    error::ApiError,
    lecture::{dto::LectureNotesResponse, services, upload::TempUpload},
    state::AppState,
};

/// POST /api/lecture2notes/upload (multipart, field "file"): buffer the
/// recording to disk, transcribe it, generate notes, and clean up the file
/// whatever happens.
#[instrument(skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<LectureNotesResponse>, ApiError> {
    let mut file: Option<(String, Bytes)> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let extension = field
                .file_name()
                .and_then(|name| Path::new(name).extension())
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::internal("Server error", e.into()))?;
            file = Some((extension, data));
            break;
        }
    }
    let Some((extension, data)) = file else {
        return Err(ApiError::validation("No file uploaded"));
    };

    // Millisecond-timestamp name, preserving the original extension.
    let file_name = format!(
        "{}{}",
        OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000,
        extension
    );
    let buffered = TempUpload::write(Path::new(&state.config.upload_dir), &file_name, data)
        .await
        .map_err(|e| ApiError::internal("Server error", e.into()))?;

    let (transcription, notes) = services::transcribe_and_summarize(
        state.transcriber.as_ref(),
        state.notes_ai.as_ref(),
        buffered.path(),
    )
    .await?;

    Ok(Json(LectureNotesResponse {
        message: "Transcription and notes generated successfully".into(),
        transcription,
        notes,
    }))
}
