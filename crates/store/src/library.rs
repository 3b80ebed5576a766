//! JSON-file-backed library of notes and chat sessions
//!
//! Stands in for the backend the web app talks to: the export engine only
//! needs `get_note(id)` / `get_chat(session_id)` read calls returning plain
//! data, plus enough write support for the CLI to seed a library.

use std::path::{Path, PathBuf};

use noteport_core::{ChatTranscript, Note};
use tracing::{debug, instrument};

use crate::{Result, StoreError};

/// File-backed collaborator for notes and chat transcripts
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    /// Open (creating if needed) a library rooted at `root`
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(root.join("notes")).await?;
        tokio::fs::create_dir_all(root.join("chats")).await?;
        debug!("Opened library at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn note_path(&self, id: &str) -> PathBuf {
        self.root.join("notes").join(format!("{id}.json"))
    }

    fn chat_path(&self, session_id: &str) -> PathBuf {
        self.root.join("chats").join(format!("{session_id}.json"))
    }

    /// Get a note by id
    #[instrument(skip(self))]
    pub async fn get_note(&self, id: &str) -> Result<Option<Note>> {
        read_json(&self.note_path(id)).await
    }

    /// Get a chat session by id
    #[instrument(skip(self))]
    pub async fn get_chat(&self, session_id: &str) -> Result<Option<ChatTranscript>> {
        read_json(&self.chat_path(session_id)).await
    }

    /// Persist a note, overwriting any previous version
    #[instrument(skip(self, note))]
    pub async fn save_note(&self, note: &Note) -> Result<()> {
        let json = serde_json::to_vec_pretty(note)?;
        tokio::fs::write(self.note_path(&note.id), json).await?;
        Ok(())
    }

    /// Persist a chat session, overwriting any previous version
    #[instrument(skip(self, transcript))]
    pub async fn save_chat(&self, transcript: &ChatTranscript) -> Result<()> {
        let json = serde_json::to_vec_pretty(transcript)?;
        tokio::fs::write(self.chat_path(&transcript.session_id), json).await?;
        Ok(())
    }

    /// List recent notes, newest first
    #[instrument(skip(self))]
    pub async fn list_notes(&self, limit: usize) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = read_dir_json(&self.root.join("notes")).await?;
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notes.truncate(limit);
        Ok(notes)
    }

    /// List recent chat sessions, newest first
    #[instrument(skip(self))]
    pub async fn list_chats(&self, limit: usize) -> Result<Vec<ChatTranscript>> {
        let mut chats: Vec<ChatTranscript> = read_dir_json(&self.root.join("chats")).await?;
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        chats.truncate(limit);
        Ok(chats)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::Io(e)),
    }
}

async fn read_dir_json<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut records = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            let bytes = tokio::fs::read(&path).await?;
            records.push(serde_json::from_slice(&bytes)?);
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use noteport_core::{ChatMessage, MessageRole};

    async fn temp_library() -> (tempfile::TempDir, Library) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let library = Library::open(dir.path()).await.expect("Failed to open library");
        (dir, library)
    }

    #[tokio::test]
    async fn test_note_round_trip() {
        let (_dir, library) = temp_library().await;

        let note = Note::new("Test Note", "some content");
        library.save_note(&note).await.unwrap();

        let loaded = library.get_note(&note.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Test Note");
        assert_eq!(loaded.content, "some content");
    }

    #[tokio::test]
    async fn test_missing_note_is_none() {
        let (_dir, library) = temp_library().await;
        assert!(library.get_note("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chat_round_trip_and_list() {
        let (_dir, library) = temp_library().await;

        let transcript = ChatTranscript {
            session_id: "sess-1".into(),
            updated_at: chrono::Utc::now(),
            messages: vec![ChatMessage {
                role: MessageRole::User,
                content: "hello".into(),
                timestamp: None,
            }],
        };
        library.save_chat(&transcript).await.unwrap();

        let loaded = library.get_chat("sess-1").await.unwrap().unwrap();
        assert_eq!(loaded.messages.len(), 1);

        let all = library.list_chats(10).await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
