use crate::ai::{AiError, GenerativeClient};
use crate::chat::session::{ChatAction, ChatSessions};
use crate::error::ApiError;

pub const TRIGGER_PHRASE: &str = "let's start the interview prep";

pub const PROMPT_TO_START: &str =
    "To start your interview preparation, please type 'Let's start the interview prep'.";

pub const ALREADY_STARTED: &str =
    "You have already started the interview prep. Please respond to the current question.";

const RATE_LIMIT_MESSAGE: &str =
    "The chatbot is receiving too many requests right now. Please try again later.";

const GENERIC_FAILURE_MESSAGE: &str =
    "An error occurred while interacting with the chatbot. Please try again later.";

pub const SYSTEM_INSTRUCTION: &str = r#"You are the StudyONE interview chatbot, designed to help students prepare for their interviews.
1. Trigger: You will start your interaction when the user inputs "Let's start the interview prep." or something like that.
2. Once triggered, ask the user, "What topic would you like to prepare for?"
3. After receiving the topic, proceed with the following questions:
   - "Introduce yourself."
   - "What is your experience with [topic]?"
   - "Can you explain key concepts related to [topic]?"
   - "What challenges have you faced in this area?"
   - "How do you stay updated in this field?"
   - "Can you give an example of how you solved a technical problem related to [topic]?"
4. After each response from the user:
   - Provide constructive feedback on their answer.
   - Ask the next question in the sequence.
Ensure that the feedback is helpful and that the transition to the next question is smooth. If the user has not yet triggered the interview mode, respond with a message indicating that they need to start the interview prep first."#;

/// Run one chatbot turn for a session: gate on the trigger phrase, forward
/// to the model once started, relay the reply verbatim.
pub async fn reply(
    sessions: &ChatSessions,
    ai: &dyn GenerativeClient,
    session_id: &str,
    message: &str,
) -> Result<String, ApiError> {
    let message = message.trim();
    let is_trigger = message.eq_ignore_ascii_case(TRIGGER_PHRASE);

    match sessions.begin_turn(session_id, message, is_trigger).await {
        ChatAction::PromptToStart => Ok(PROMPT_TO_START.into()),
        ChatAction::AlreadyStarted => Ok(ALREADY_STARTED.into()),
        ChatAction::Generate { history } => {
            let reply = ai
                .generate(SYSTEM_INSTRUCTION, &history)
                .await
                .map_err(map_ai_error)?;
            sessions.commit_reply(session_id, message, &reply).await;
            Ok(reply)
        }
    }
}

fn map_ai_error(err: AiError) -> ApiError {
    match err {
        AiError::RateLimited => ApiError::RateLimited(RATE_LIMIT_MESSAGE.into()),
        other => ApiError::internal(GENERIC_FAILURE_MESSAGE, other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatTurn;
    use axum::async_trait;
    use axum::http::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

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
            Ok(format!("reply #{}", history.len()))
        }
    }

    struct RateLimitedAi;

    #[async_trait]
    impl GenerativeClient for RateLimitedAi {
        async fn generate(
            &self,
            _system_instruction: &str,
            _history: &[ChatTurn],
        ) -> Result<String, AiError> {
            Err(AiError::RateLimited)
        }
    }

    #[tokio::test]
    async fn messages_before_trigger_prompt_to_start() {
        let sessions = ChatSessions::new();
        let ai = CountingAi::default();

        let out = reply(&sessions, &ai, "s1", "hello there").await.unwrap();
        assert_eq!(out, PROMPT_TO_START);
        assert!(!sessions.is_started("s1").await);

        let out = reply(&sessions, &ai, "s1", "anyone?").await.unwrap();
        assert_eq!(out, PROMPT_TO_START);
        assert_eq!(ai.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn trigger_starts_the_session_once() {
        let sessions = ChatSessions::new();
        let ai = CountingAi::default();

        let out = reply(&sessions, &ai, "s1", "Let's start the interview prep")
            .await
            .unwrap();
        assert_eq!(out, "reply #1");
        assert!(sessions.is_started("s1").await);
        assert_eq!(ai.calls.load(Ordering::SeqCst), 1);

        let out = reply(&sessions, &ai, "s1", "LET'S START THE INTERVIEW PREP")
            .await
            .unwrap();
        assert_eq!(out, ALREADY_STARTED);
        assert_eq!(ai.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn started_session_forwards_every_message_with_history() {
        let sessions = ChatSessions::new();
        let ai = CountingAi::default();

        reply(&sessions, &ai, "s1", "let's start the interview prep")
            .await
            .unwrap();
        // History now holds the trigger turn and the model reply; the next
        // message is forwarded with 3 turns.
        let out = reply(&sessions, &ai, "s1", "Rust, please").await.unwrap();
        assert_eq!(out, "reply #3");
        assert_eq!(sessions.history_len("s1").await, 4);
    }

    #[tokio::test]
    async fn sessions_are_isolated_from_each_other() {
        let sessions = ChatSessions::new();
        let ai = CountingAi::default();

        reply(&sessions, &ai, "alice", "let's start the interview prep")
            .await
            .unwrap();
        let out = reply(&sessions, &ai, "bob", "hello").await.unwrap();
        assert_eq!(out, PROMPT_TO_START);
        assert!(sessions.is_started("alice").await);
        assert!(!sessions.is_started("bob").await);
    }

    #[tokio::test]
    async fn upstream_rate_limit_maps_to_429_with_fixed_message() {
        let sessions = ChatSessions::new();

        let err = reply(&sessions, &RateLimitedAi, "s1", "let's start the interview prep")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.to_string(), RATE_LIMIT_MESSAGE);
        // The failed exchange is not recorded.
        assert_eq!(sessions.history_len("s1").await, 0);
    }
}
