use std::path::Path;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::ai::{ChatTurn, GenerativeClient};
use crate::error::ApiError;
use crate::transcription::{JobStatus, TranscriptionClient, TranscriptionError};

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const MAX_POLL_ATTEMPTS: u32 = 60;

pub const NOTES_SYSTEM_INSTRUCTION: &str = "You are a highly intelligent note-taking assistant designed to transform transcriptions of lectures into comprehensive, organized, and easy-to-read notes. Your task is to extract key concepts, summarize important information, and structure the notes in a logical format, including headings, bullet points, and highlights of critical points. If any information provided in the transcription is incorrect, identify the inaccuracies and correct them accordingly. Ensure that the notes are clear, concise, and suitable for studying, allowing users to quickly grasp the main ideas and details of the lecture.";

/// Terminal result of polling a transcription job.
#[derive(Debug)]
pub enum PollOutcome {
    Transcribed,
    Failed(Option<String>),
    TimedOut,
}

/// Poll the job on a fixed interval until it reaches a terminal status or
/// the attempt budget runs out.
pub async fn poll_job(
    client: &dyn TranscriptionClient,
    job_id: &str,
    interval: Duration,
    max_attempts: u32,
) -> Result<PollOutcome, TranscriptionError> {
    for attempt in 1..=max_attempts {
        let job = client.job_details(job_id).await?;
        debug!(%job_id, attempt, status = ?job.status, "checking job status");
        match job.status {
            JobStatus::Transcribed => return Ok(PollOutcome::Transcribed),
            JobStatus::Failed => return Ok(PollOutcome::Failed(job.failure_detail)),
            JobStatus::InProgress => {
                if attempt < max_attempts {
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }
    Ok(PollOutcome::TimedOut)
}

/// Submit the media file, wait for the transcript, then turn it into study
/// notes. Returns `(transcription, notes)`.
pub async fn transcribe_and_summarize(
    transcriber: &dyn TranscriptionClient,
    ai: &dyn GenerativeClient,
    media_path: &Path,
) -> Result<(String, String), ApiError> {
    let job = transcriber
        .submit_local_file(media_path)
        .await
        .map_err(submission_error)?;
    info!(job_id = %job.id, "transcription job submitted");

    match poll_job(transcriber, &job.id, POLL_INTERVAL, MAX_POLL_ATTEMPTS)
        .await
        .map_err(submission_error)?
    {
        PollOutcome::Failed(detail) => {
            error!(
                job_id = %job.id,
                detail = detail.as_deref().unwrap_or("no additional details"),
                "transcription job failed"
            );
            Err(ApiError::internal(
                "An error occurred during processing: Transcription job failed",
                anyhow::anyhow!(detail.unwrap_or_default()),
            ))
        }
        PollOutcome::TimedOut => Err(ApiError::internal(
            "An error occurred during processing: Transcription job timed out",
            anyhow::anyhow!("job {} still pending after {MAX_POLL_ATTEMPTS} checks", job.id),
        )),
        PollOutcome::Transcribed => {
            let transcript = transcriber
                .transcript(&job.id)
                .await
                .map_err(submission_error)?;
            let transcription = transcript.flatten();
            info!(job_id = %job.id, chars = transcription.len(), "transcript extracted");

            let notes = ai
                .generate(NOTES_SYSTEM_INSTRUCTION, &[ChatTurn::user(&transcription)])
                .await
                .map_err(|e| {
                    ApiError::internal(
                        "An error occurred during processing: notes generation failed",
                        e.into(),
                    )
                })?;
            info!(job_id = %job.id, "notes generated from transcription");
            Ok((transcription, notes))
        }
    }
}

fn submission_error(err: TranscriptionError) -> ApiError {
    ApiError::internal(
        "An error occurred during processing: transcription request failed",
        err.into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiError;
    use crate::transcription::{Job, Monologue, Transcript, TranscriptElement};
    use axum::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Transcriber whose job walks a scripted sequence of statuses.
    struct ScriptedTranscriber {
        statuses: Mutex<Vec<JobStatus>>,
        failure_detail: Option<String>,
        transcript: Transcript,
    }

    impl ScriptedTranscriber {
        fn new(statuses: Vec<JobStatus>) -> Self {
            Self {
                statuses: Mutex::new(statuses),
                failure_detail: None,
                transcript: Transcript {
                    monologues: vec![Monologue {
                        elements: vec![
                            TranscriptElement { value: "hello".into() },
                            TranscriptElement { value: "world".into() },
                        ],
                    }],
                },
            }
        }

        fn next_status(&self) -> JobStatus {
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.remove(0)
            } else {
                statuses[0]
            }
        }
    }

    #[async_trait]
    impl TranscriptionClient for ScriptedTranscriber {
        async fn submit_local_file(&self, _path: &Path) -> Result<Job, TranscriptionError> {
            Ok(Job {
                id: "job-1".into(),
                status: JobStatus::InProgress,
                failure_detail: None,
            })
        }
        async fn job_details(&self, job_id: &str) -> Result<Job, TranscriptionError> {
            Ok(Job {
                id: job_id.into(),
                status: self.next_status(),
                failure_detail: self.failure_detail.clone(),
            })
        }
        async fn transcript(&self, _job_id: &str) -> Result<Transcript, TranscriptionError> {
            Ok(self.transcript.clone())
        }
    }

    #[derive(Default)]
    struct CountingAi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerativeClient for CountingAi {
        async fn generate(
            &self,
            _system_instruction: &str,
            history: &[ChatTurn],
        ) -> Result<String, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("notes for: {}", history[0].text))
        }
    }

    #[tokio::test]
    async fn poll_resolves_once_the_job_transcribes() {
        let transcriber = ScriptedTranscriber::new(vec![
            JobStatus::InProgress,
            JobStatus::InProgress,
            JobStatus::Transcribed,
        ]);
        let outcome = poll_job(&transcriber, "job-1", Duration::ZERO, 10)
            .await
            .unwrap();
        assert!(matches!(outcome, PollOutcome::Transcribed));
    }

    #[tokio::test]
    async fn poll_gives_up_after_the_attempt_budget() {
        let transcriber = ScriptedTranscriber::new(vec![JobStatus::InProgress]);
        let outcome = poll_job(&transcriber, "job-1", Duration::ZERO, 3)
            .await
            .unwrap();
        assert!(matches!(outcome, PollOutcome::TimedOut));
    }

    #[tokio::test]
    async fn failed_job_surfaces_the_failure_and_skips_notes() {
        let mut transcriber = ScriptedTranscriber::new(vec![JobStatus::Failed]);
        transcriber.failure_detail = Some("unsupported media".into());
        let ai = CountingAi::default();

        let err = transcribe_and_summarize(&transcriber, &ai, Path::new("lecture.mp3"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Transcription job failed"));
        assert_eq!(ai.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transcribed_job_flattens_and_generates_notes() {
        let transcriber = ScriptedTranscriber::new(vec![JobStatus::Transcribed]);
        let ai = CountingAi::default();

        let (transcription, notes) =
            transcribe_and_summarize(&transcriber, &ai, Path::new("lecture.mp3"))
                .await
                .unwrap();
        assert_eq!(transcription, "hello world");
        assert_eq!(notes, "notes for: hello world");
        assert_eq!(ai.calls.load(Ordering::SeqCst), 1);
    }
}
