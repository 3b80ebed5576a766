//! Chat transcript types for exporting RAG chat sessions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of the message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Human/user message
    User,
    /// Assistant/AI response
    Assistant,
}

impl MessageRole {
    /// Badge label shown in exported documents
    pub fn badge_label(&self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Assistant",
        }
    }
}

/// A single message in a chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of who sent this message
    #[serde(alias = "sender")]
    pub role: MessageRole,

    /// The message content
    #[serde(alias = "text")]
    pub content: String,

    /// When the message was sent (if available)
    #[serde(default, alias = "created_at", alias = "sent_at")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A complete chat session as handed over by the chat collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTranscript {
    /// Session identifier
    #[serde(alias = "id", alias = "conversation_id")]
    pub session_id: String,

    /// When the session was last updated
    #[serde(default = "Utc::now", alias = "updated")]
    pub updated_at: DateTime<Utc>,

    /// The messages in this session, in conversation order
    #[serde(default, alias = "chat_messages")]
    pub messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    /// Parse a transcript from JSON, accepting the field aliases
    /// different chat clients use
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transcript_with_aliases() {
        let json = r#"{
            "id": "sess-1",
            "messages": [
                {"role": "user", "text": "Hello"},
                {"sender": "assistant", "content": "Hi there!"}
            ]
        }"#;

        let transcript = ChatTranscript::from_json(json).unwrap();
        assert_eq!(transcript.session_id, "sess-1");
        assert_eq!(transcript.messages.len(), 2);
        assert_eq!(transcript.messages[0].role, MessageRole::User);
        assert_eq!(transcript.messages[1].content, "Hi there!");
    }

    #[test]
    fn test_badge_labels() {
        assert_eq!(MessageRole::User.badge_label(), "You");
        assert_eq!(MessageRole::Assistant.badge_label(), "Assistant");
    }
}
