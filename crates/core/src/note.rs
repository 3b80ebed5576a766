//! Note types - the units of study content handed to the export engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of generated note
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoteType {
    /// A condensed summary of uploaded material
    Summary,
    /// Structured notes on a single topic
    TopicNotes,
    /// A set of multiple-choice questions
    Mcqs,
    /// A long-form explanation of one concept
    Explanation,
    /// Term/definition pairs
    Definitions,
}

impl Default for NoteType {
    fn default() -> Self {
        Self::Summary
    }
}

impl NoteType {
    /// Human-readable label used in document metadata lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::TopicNotes => "Topic Notes",
            Self::Mcqs => "MCQs",
            Self::Explanation => "Explanation",
            Self::Definitions => "Definitions",
        }
    }
}

/// A single multiple-choice question
///
/// `options` order is canonical and never reordered. `correct_answer` is
/// either the literal text of the correct option or a single letter label
/// ("A", "B", ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A saved study note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: String,

    /// The type of this note
    #[serde(default)]
    pub note_type: NoteType,

    pub title: String,

    /// Markdown-ish body text
    pub content: String,

    /// Ordered question set, present only for MCQ notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcqs: Option<Vec<Mcq>>,

    /// Topic the note was generated for, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Create a new note with a fresh id
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            note_type: NoteType::default(),
            title: title.into(),
            content: content.into(),
            mcqs: None,
            topic: None,
            created_at: Utc::now(),
        }
    }

    /// Builder pattern: set note type
    pub fn with_type(mut self, note_type: NoteType) -> Self {
        self.note_type = note_type;
        self
    }

    /// Builder pattern: attach an ordered MCQ set
    pub fn with_mcqs(mut self, mcqs: Vec<Mcq>) -> Self {
        self.mcqs = Some(mcqs);
        self
    }

    /// Builder pattern: set topic
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_creation() {
        let note = Note::new("Test Title", "Test content")
            .with_type(NoteType::Definitions)
            .with_topic("operating systems");

        assert_eq!(note.title, "Test Title");
        assert_eq!(note.note_type, NoteType::Definitions);
        assert_eq!(note.topic.as_deref(), Some("operating systems"));
        assert!(note.mcqs.is_none());
    }

    #[test]
    fn test_mcq_optional_explanation_absent() {
        let json = r#"{"question":"2+2=?","options":["3","4"],"correct_answer":"4"}"#;
        let mcq: Mcq = serde_json::from_str(json).unwrap();
        assert_eq!(mcq.explanation, None);
    }

    #[test]
    fn test_note_type_snake_case() {
        let t: NoteType = serde_json::from_str("\"topic_notes\"").unwrap();
        assert_eq!(t, NoteType::TopicNotes);
        assert_eq!(t.label(), "Topic Notes");
    }
}
