use std::path::Path;

use axum::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const REV_BASE_URL: &str = "https://api.rev.ai/speechtotext/v1";
const TRANSCRIPT_ACCEPT: &str = "application/vnd.rev.transcript.v1.0+json";

#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("transcription API returned an error: {message} (Status: {status})")]
    Api { status: u16, message: String },

    #[error("transcription request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("could not read upload for submission: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    InProgress,
    Transcribed,
    Failed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub failure_detail: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub monologues: Vec<Monologue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Monologue {
    #[serde(default)]
    pub elements: Vec<TranscriptElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptElement {
    #[serde(default)]
    pub value: String,
}

impl Transcript {
    /// Concatenate the ordered speech segments into a single string: element
    /// values joined by spaces within a monologue, monologues joined by
    /// spaces.
    pub fn flatten(&self) -> String {
        self.monologues
            .iter()
            .map(|m| {
                m.elements
                    .iter()
                    .map(|e| e.value.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    /// Submit a local media file for transcription and return the created job.
    async fn submit_local_file(&self, path: &Path) -> Result<Job, TranscriptionError>;

    /// Fetch the current details of a job.
    async fn job_details(&self, job_id: &str) -> Result<Job, TranscriptionError>;

    /// Fetch the transcript of a completed job.
    async fn transcript(&self, job_id: &str) -> Result<Transcript, TranscriptionError>;
}

/// Hosted Rev.ai speech-to-text client.
#[derive(Clone)]
pub struct RevAiClient {
    http: reqwest::Client,
    access_token: String,
}

impl RevAiClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token: access_token.into(),
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, TranscriptionError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl TranscriptionClient for RevAiClient {
    async fn submit_local_file(&self, path: &Path) -> Result<Job, TranscriptionError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into());

        let media = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .part("media", media)
            .text("options", r#"{"skip_diarization":true}"#);

        let resp = self
            .http
            .post(format!("{REV_BASE_URL}/jobs"))
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await?;
        let job: Job = Self::check(resp).await?.json().await?;
        debug!(job_id = %job.id, "transcription job submitted");
        Ok(job)
    }

    async fn job_details(&self, job_id: &str) -> Result<Job, TranscriptionError> {
        let resp = self
            .http
            .get(format!("{REV_BASE_URL}/jobs/{job_id}"))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn transcript(&self, job_id: &str) -> Result<Transcript, TranscriptionError> {
        let resp = self
            .http
            .get(format!("{REV_BASE_URL}/jobs/{job_id}/transcript"))
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, TRANSCRIPT_ACCEPT)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(value: &str) -> TranscriptElement {
        TranscriptElement {
            value: value.into(),
        }
    }

    #[test]
    fn flatten_joins_elements_and_monologues_in_order() {
        let transcript = Transcript {
            monologues: vec![
                Monologue {
                    elements: vec![word("Today"), word("we"), word("cover")],
                },
                Monologue {
                    elements: vec![word("binary"), word("search.")],
                },
            ],
        };
        assert_eq!(transcript.flatten(), "Today we cover binary search.");
    }

    #[test]
    fn flatten_of_empty_transcript_is_empty() {
        let transcript = Transcript { monologues: vec![] };
        assert_eq!(transcript.flatten(), "");
    }

    #[test]
    fn job_status_parses_rev_wire_values() {
        let job: Job =
            serde_json::from_str(r#"{"id":"j1","status":"in_progress","failure_detail":null}"#)
                .unwrap();
        assert_eq!(job.status, JobStatus::InProgress);

        let job: Job = serde_json::from_str(
            r#"{"id":"j1","status":"failed","failure_detail":"unsupported media"}"#,
        )
        .unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.failure_detail.as_deref(), Some("unsupported media"));
    }
}
