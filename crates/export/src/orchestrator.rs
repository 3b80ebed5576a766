//! Export Orchestrator: fetch -> tokenize -> render -> save
//!
//! Calls are stateless and independent; the Style Registry is read-only
//! and all renderer state is allocated per call. Artifact bytes are fully
//! materialized before anything touches the filesystem, so a failed
//! export never leaves a partial file behind.

use std::path::{Path, PathBuf};

use noteport_core::{tokenize_chat, tokenize_note, ChatTranscript, Note};
use noteport_store::Library;
use tracing::{info, instrument};

use crate::docx;
use crate::error::{ExportError, Result};
use crate::filename::{chat_filename, note_filename};
use crate::pdf::{self, DocumentMeta};

/// The two output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Manually paginated, page-painted document
    Paginated,
    /// Flow document; pagination belongs to the viewer
    Flow,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Paginated => "pdf",
            Self::Flow => "docx",
        }
    }
}

/// A completed export, ready for download
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Top-level entry point for all export operations
#[derive(Clone)]
pub struct Exporter {
    library: Library,
}

impl Exporter {
    pub fn new(library: Library) -> Self {
        Self { library }
    }

    /// Export a stored note, fetching it by id
    #[instrument(skip(self))]
    pub async fn export_note(&self, note_id: &str, format: ExportFormat) -> Result<ExportArtifact> {
        let note = self
            .library
            .get_note(note_id)
            .await?
            .ok_or_else(|| ExportError::NotFound("Note", note_id.to_string()))?;
        self.export_note_value(&note, format).await
    }

    /// Export a note already in memory
    pub async fn export_note_value(&self, note: &Note, format: ExportFormat) -> Result<ExportArtifact> {
        let blocks = tokenize_note(note);
        let meta = DocumentMeta {
            title: note.title.clone(),
            subtitle: format!(
                "{} · {}",
                note.note_type.label(),
                note.created_at.format("%Y-%m-%d")
            ),
        };
        let filename = note_filename(&note.title, format.extension());
        let bytes = render(&meta, &blocks, format).await?;
        info!("Exported note {} to {} ({} bytes)", note.id, filename, bytes.len());
        Ok(ExportArtifact { filename, bytes })
    }

    /// Export a stored chat session, fetching it by id
    #[instrument(skip(self))]
    pub async fn export_chat(
        &self,
        session_id: &str,
        format: ExportFormat,
    ) -> Result<ExportArtifact> {
        let transcript = self
            .library
            .get_chat(session_id)
            .await?
            .ok_or_else(|| ExportError::NotFound("Chat session", session_id.to_string()))?;
        self.export_chat_value(&transcript, format).await
    }

    /// Export a transcript already in memory
    pub async fn export_chat_value(
        &self,
        transcript: &ChatTranscript,
        format: ExportFormat,
    ) -> Result<ExportArtifact> {
        let blocks = tokenize_chat(&transcript.messages);
        let meta = DocumentMeta {
            title: "Chat Session".to_string(),
            subtitle: format!(
                "Chat Transcript · {}",
                transcript.updated_at.format("%Y-%m-%d")
            ),
        };
        let filename = chat_filename(transcript.updated_at, format.extension());
        let bytes = render(&meta, &blocks, format).await?;
        info!(
            "Exported chat {} to {} ({} bytes)",
            transcript.session_id,
            filename,
            bytes.len()
        );
        Ok(ExportArtifact { filename, bytes })
    }

    /// The download primitive: write a finished artifact into `out_dir`
    pub async fn save_artifact(&self, artifact: &ExportArtifact, out_dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(out_dir).await?;
        let path = out_dir.join(&artifact.filename);
        tokio::fs::write(&path, &artifact.bytes).await?;
        Ok(path)
    }
}

async fn render(
    meta: &DocumentMeta,
    blocks: &[noteport_core::Block],
    format: ExportFormat,
) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Paginated => Ok(pdf::render_pdf(meta, blocks)?.bytes),
        ExportFormat::Flow => {
            let paragraphs = docx::build_flow(meta, blocks);
            // Packaging is async; the bytes must exist before any save runs.
            docx::package_docx(paragraphs).await
        }
    }
}
