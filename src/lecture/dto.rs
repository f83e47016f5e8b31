use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LectureNotesResponse {
    pub message: String,
    pub transcription: String,
    pub notes: String,
}
