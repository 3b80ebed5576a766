//! Common test utilities

use chrono::{TimeZone, Utc};
use noteport_core::{ChatMessage, ChatTranscript, Mcq, MessageRole, Note, NoteType};
use noteport_store::Library;

/// Create a test library in a scratch directory
pub async fn create_test_library() -> (tempfile::TempDir, Library) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let library = Library::open(dir.path())
        .await
        .expect("Failed to open test library");
    (dir, library)
}

pub fn mcq_note() -> Note {
    Note::new("OS: Chapter 1!!", "Generated 1 question.")
        .with_type(NoteType::Mcqs)
        .with_mcqs(vec![Mcq {
            question: "2+2=?".into(),
            options: vec!["3".into(), "4".into(), "5".into()],
            correct_answer: "4".into(),
            explanation: Some("basic arithmetic".into()),
        }])
}

pub fn long_note() -> Note {
    let content = (0..150)
        .map(|i| format!("## Section {i}\nA paragraph with enough words to fill a line of output."))
        .collect::<Vec<_>>()
        .join("\n");
    Note::new("Long Summary", content)
}

pub fn chat_transcript() -> ChatTranscript {
    ChatTranscript {
        session_id: "sess-42".into(),
        updated_at: Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap(),
        messages: vec![
            ChatMessage {
                role: MessageRole::User,
                content: "What is paging?".into(),
                timestamp: None,
            },
            ChatMessage {
                role: MessageRole::Assistant,
                content: "Paging splits memory into fixed-size frames.".into(),
                timestamp: None,
            },
        ],
    }
}
