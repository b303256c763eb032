//! In-memory chat sessions
//!
//! Conversations are process-local and lost on restart.

use super::agent::{ChatMessage, MessageRole};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub history: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session map shared by all requests
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    max_history_messages: usize,
}

impl SessionStore {
    pub fn new(max_history_messages: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_history_messages,
        }
    }

    /// Start an empty conversation
    pub async fn create(&self) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.sessions.write().await.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Resolve a client-supplied id, starting a new session when it is
    /// missing, malformed or unknown
    pub async fn resume_or_create(&self, id: Option<&str>) -> Session {
        if let Some(id) = id.and_then(|raw| Uuid::parse_str(raw.trim()).ok()) {
            if let Some(session) = self.get(id).await {
                return session;
            }
        }
        self.create().await
    }

    /// Replace a session's history, trimming it to the configured cap
    pub async fn save(&self, id: Uuid, mut history: Vec<ChatMessage>) {
        trim_history(&mut history, self.max_history_messages);

        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        sessions
            .entry(id)
            .and_modify(|s| {
                s.history = std::mem::take(&mut history);
                s.updated_at = now;
            })
            .or_insert_with(|| Session {
                id,
                history,
                created_at: now,
                updated_at: now,
            });
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Drop whole turns, oldest first, until at most `max` messages remain.
///
/// A turn runs from a user message up to the next one, so tool calls are
/// never separated from their results. The latest turn is always kept, even
/// when it alone exceeds the cap.
fn trim_history(history: &mut Vec<ChatMessage>, max: usize) {
    while history.len() > max {
        let Some(start) = first_turn(history) else {
            break;
        };
        let Some(next) = next_user_turn(history, start + 1) else {
            break;
        };
        history.drain(start..next);
    }
}

fn first_turn(history: &[ChatMessage]) -> Option<usize> {
    history.iter().position(|m| m.role != MessageRole::System)
}

fn next_user_turn(history: &[ChatMessage], from: usize) -> Option<usize> {
    history
        .iter()
        .skip(from)
        .position(|m| m.role == MessageRole::User)
        .map(|offset| from + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(turns: usize) -> Vec<ChatMessage> {
        let mut history = vec![ChatMessage::system("coach")];
        for i in 0..turns {
            history.push(ChatMessage::user(format!("question {}", i)));
            history.push(ChatMessage::assistant(format!("answer {}", i)));
        }
        history
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = SessionStore::new(10);
        let session = store.create().await;
        assert!(store.get(session.id).await.is_some());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_or_malformed_id_creates_new_session() {
        let store = SessionStore::new(10);
        let a = store.resume_or_create(Some("not-a-uuid")).await;
        let b = store.resume_or_create(Some(&Uuid::new_v4().to_string())).await;
        let c = store.resume_or_create(None).await;
        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_resume_existing_session() {
        let store = SessionStore::new(10);
        let session = store.create().await;
        store.save(session.id, conversation(1)).await;

        let resumed = store.resume_or_create(Some(&session.id.to_string())).await;
        assert_eq!(resumed.id, session.id);
        assert_eq!(resumed.history.len(), 3);
    }

    #[test]
    fn test_trim_keeps_system_and_starts_at_user_turn() {
        let mut history = conversation(5);
        trim_history(&mut history, 6);

        assert!(history.len() <= 6);
        assert_eq!(history[0].role, MessageRole::System);
        assert_eq!(history[1].role, MessageRole::User);
        assert_eq!(history.last().unwrap().content, "answer 4");
    }

    fn tool_heavy_turn(history: &mut Vec<ChatMessage>, question: &str, answer: &str) {
        history.push(ChatMessage::user(question));
        history.push(ChatMessage::assistant_with_tools("", Vec::new()));
        for i in 0..4 {
            history.push(ChatMessage::tool("log_workout", format!("logged {}", i)));
        }
        history.push(ChatMessage::assistant(answer));
    }

    #[test]
    fn test_trim_keeps_single_oversized_turn() {
        let mut history = vec![ChatMessage::system("coach")];
        tool_heavy_turn(&mut history, "log squats and bench", "Logged both lifts.");

        trim_history(&mut history, 6);

        assert_eq!(history.len(), 8);
        assert_eq!(history[0].role, MessageRole::System);
        assert_eq!(history[1].role, MessageRole::User);
        assert_eq!(history.last().unwrap().content, "Logged both lifts.");
    }

    #[test]
    fn test_trim_drops_older_turns_whole() {
        let mut history = conversation(1);
        tool_heavy_turn(&mut history, "log squats and bench", "Logged both lifts.");

        trim_history(&mut history, 6);

        assert_eq!(history.len(), 8);
        assert_eq!(history[1].content, "log squats and bench");
        assert!(history.iter().all(|m| m.content != "question 0" && m.content != "answer 0"));
        assert_eq!(history.last().unwrap().content, "Logged both lifts.");
    }

    #[test]
    fn test_trim_noop_under_cap() {
        let mut history = conversation(2);
        trim_history(&mut history, 50);
        assert_eq!(history.len(), 5);
    }
}
