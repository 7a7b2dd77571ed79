//! Conversation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::SourceLink;

/// Greeting shown at the start of every conversation.
pub const WELCOME_MESSAGE: &str =
    "Welcome to the CEE advisor. Scan the portal to load the BAR/BAT/IND sheets.";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceLink>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, content: String, sources: Vec<SourceLink>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            sources,
            created_at: Utc::now(),
        }
    }
}

/// Ordered conversation, always opening with the welcome message.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Start a conversation containing only the welcome message.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: vec![Self::welcome()],
        }
    }

    fn welcome() -> ChatMessage {
        ChatMessage::new(ChatRole::Assistant, WELCOME_MESSAGE.to_string(), Vec::new())
    }

    /// Append a user message.
    pub fn push_user(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::new(ChatRole::User, content.into(), Vec::new()))
    }

    /// Append an assistant message with its sources.
    pub fn push_assistant(
        &mut self,
        content: impl Into<String>,
        sources: Vec<SourceLink>,
    ) -> &ChatMessage {
        self.push(ChatMessage::new(ChatRole::Assistant, content.into(), sources))
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// All messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages, welcome included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the welcome message is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop the conversation, keeping a fresh welcome message.
    pub fn clear(&mut self) {
        self.messages = vec![Self::welcome()];
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_welcome() {
        let session = ChatSession::new();
        assert_eq!(session.len(), 1);
        assert!(!session.is_empty());
        assert_eq!(session.messages()[0].role, ChatRole::Assistant);
        assert_eq!(session.messages()[0].content, WELCOME_MESSAGE);
    }

    #[test]
    fn test_push_messages_in_order() {
        let mut session = ChatSession::new();
        session.push_user("Quelles exigences pour BAR-TH-164 ?");
        let reply = session
            .push_assistant(
                "ETAS ≥ 111%",
                vec![SourceLink {
                    title: "Fiche".to_string(),
                    url: "https://example.org".to_string(),
                }],
            )
            .clone();

        assert_eq!(session.len(), 3);
        assert_eq!(session.messages()[1].role, ChatRole::User);
        assert_eq!(reply.sources.len(), 1);
        assert_eq!(session.messages()[2].id, reply.id);
    }

    #[test]
    fn test_clear_keeps_welcome() {
        let mut session = ChatSession::new();
        session.push_user("q");
        session.clear();
        assert_eq!(session.len(), 1);
        assert_eq!(session.messages()[0].content, WELCOME_MESSAGE);
    }

    #[test]
    fn test_message_serialization() {
        let mut session = ChatSession::new();
        let message = session.push_user("hello").clone();
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("sources").is_none());

        let parsed: ChatMessage = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, message);
    }
}
