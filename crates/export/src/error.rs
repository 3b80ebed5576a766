//! Export error taxonomy
//!
//! Fetch and serialization failures surface to the user as a single
//! notice at the orchestrator boundary. Parse-level problems do not
//! exist: missing optional data degrades to empty during tokenization.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to fetch source: {0}")]
    Fetch(#[from] noteport_store::StoreError),

    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Failed to package document: {0}")]
    Serialization(String),

    #[error("Failed to save artifact: {0}")]
    Save(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
