//! Document export engine for Noteport
//!
//! Converts a saved note or a chat transcript into two downloadable
//! artifacts: a manually paginated PDF and a flow-style DOCX. Both
//! renderers consume the same block stream and resolve every visual
//! decision through one read-only Style Registry, so the formats stay
//! visually consistent by construction.

pub mod docx;
pub mod error;
pub mod filename;
pub mod measure;
pub mod orchestrator;
pub mod pdf;
pub mod style;

pub use docx::{build_flow, package_docx, FlowParagraph, FlowRun};
pub use error::{ExportError, Result};
pub use filename::{chat_filename, note_filename, sanitize_title};
pub use orchestrator::{ExportArtifact, ExportFormat, Exporter};
pub use pdf::{render_pdf, DocumentMeta, RenderedPdf};
pub use style::{Rgb8, Style, StyleKey, StyleRegistry};
