use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::ai::ChatTurn;

/// Per-conversation state, keyed by the client-supplied session id. The
/// map lock is released before any model call; turns are committed only
/// after a successful reply, so a failed upstream call never leaves a
/// half-recorded exchange.
#[derive(Clone, Default)]
pub struct ChatSessions {
    inner: Arc<Mutex<HashMap<String, Conversation>>>,
}

#[derive(Default)]
struct Conversation {
    started: bool,
    history: Vec<ChatTurn>,
}

/// What the current turn should do, decided under the session lock.
pub enum ChatAction {
    /// Session not started and the message is not the trigger phrase.
    PromptToStart,
    /// Trigger phrase repeated on a running session.
    AlreadyStarted,
    /// Forward to the model with this history (prior turns plus the new
    /// user message).
    Generate { history: Vec<ChatTurn> },
}

impl ChatSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin_turn(&self, session_id: &str, message: &str, is_trigger: bool) -> ChatAction {
        let mut sessions = self.inner.lock().await;
        let conversation = sessions.entry(session_id.to_string()).or_default();

        match (is_trigger, conversation.started) {
            (true, true) => ChatAction::AlreadyStarted,
            (false, false) => ChatAction::PromptToStart,
            (true, false) => {
                // Started even if the first model call ends up failing.
                conversation.started = true;
                ChatAction::Generate {
                    history: vec![ChatTurn::user(message)],
                }
            }
            (false, true) => {
                let mut history = conversation.history.clone();
                history.push(ChatTurn::user(message));
                ChatAction::Generate { history }
            }
        }
    }

    pub async fn commit_reply(&self, session_id: &str, message: &str, reply: &str) {
        let mut sessions = self.inner.lock().await;
        let conversation = sessions.entry(session_id.to_string()).or_default();
        conversation.history.push(ChatTurn::user(message));
        conversation.history.push(ChatTurn::model(reply));
    }

    pub async fn is_started(&self, session_id: &str) -> bool {
        let sessions = self.inner.lock().await;
        sessions.get(session_id).map(|c| c.started).unwrap_or(false)
    }

    pub async fn history_len(&self, session_id: &str) -> usize {
        let sessions = self.inner.lock().await;
        sessions
            .get(session_id)
            .map(|c| c.history.len())
            .unwrap_or(0)
    }
}
