//! Noteport CLI
//!
//! Manage a local library of study notes and chat transcripts, and export
//! them as paginated PDFs or flow-style DOCX documents.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use noteport_core::{ChatTranscript, Note, NoteType};
use noteport_export::{ExportFormat, Exporter};
use noteport_store::Library;
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Noteport - export study notes and chat sessions as documents
#[derive(Parser)]
#[command(name = "noteport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Library path (defaults to ~/.noteport/library)
    #[arg(short, long)]
    library: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Manually paginated PDF
    Pdf,
    /// Flow-style DOCX
    Docx,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Pdf => ExportFormat::Paginated,
            Format::Docx => ExportFormat::Flow,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum NoteKind {
    Summary,
    TopicNotes,
    Mcqs,
    Explanation,
    Definitions,
}

impl From<NoteKind> for NoteType {
    fn from(k: NoteKind) -> Self {
        match k {
            NoteKind::Summary => NoteType::Summary,
            NoteKind::TopicNotes => NoteType::TopicNotes,
            NoteKind::Mcqs => NoteType::Mcqs,
            NoteKind::Explanation => NoteType::Explanation,
            NoteKind::Definitions => NoteType::Definitions,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new note
    Add {
        /// Note title
        title: String,

        /// Note content (reads from stdin if not provided)
        content: Option<String>,

        /// Note type
        #[arg(short = 't', long, value_enum, default_value = "summary")]
        note_type: NoteKind,

        /// Topic the note covers
        #[arg(long)]
        topic: Option<String>,
    },

    /// Import a note from a JSON file
    ImportNote {
        /// Path to a JSON-encoded note
        path: PathBuf,
    },

    /// Import a chat transcript from a JSON file
    ImportChat {
        /// Path to a JSON-encoded chat session
        path: PathBuf,
    },

    /// List recent notes
    List {
        /// Maximum results
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// List recent chat sessions
    Chats {
        /// Maximum results
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show a note by id
    Show {
        note_id: String,
    },

    /// Export a note as a document
    ExportNote {
        note_id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: Format,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Export a chat session as a document
    ExportChat {
        session_id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: Format,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let library_path = cli
        .library
        .or_else(|| std::env::var("NOTEPORT_LIBRARY").ok().map(PathBuf::from))
        .unwrap_or_else(|| {
            let mut path = dirs::home_dir().expect("Could not find home directory");
            path.push(".noteport");
            path.push("library");
            path
        });

    info!("Using library at: {}", library_path.display());
    let library = Library::open(&library_path).await?;

    match cli.command {
        Commands::Add {
            title,
            content,
            note_type,
            topic,
        } => cmd_add(library, title, content, note_type.into(), topic).await?,
        Commands::ImportNote { path } => cmd_import_note(library, path).await?,
        Commands::ImportChat { path } => cmd_import_chat(library, path).await?,
        Commands::List { limit } => cmd_list(library, limit).await?,
        Commands::Chats { limit } => cmd_chats(library, limit).await?,
        Commands::Show { note_id } => cmd_show(library, note_id).await?,
        Commands::ExportNote {
            note_id,
            format,
            out,
        } => cmd_export_note(library, note_id, format.into(), out).await?,
        Commands::ExportChat {
            session_id,
            format,
            out,
        } => cmd_export_chat(library, session_id, format.into(), out).await?,
    }

    Ok(())
}

async fn cmd_add(
    library: Library,
    title: String,
    content: Option<String>,
    note_type: NoteType,
    topic: Option<String>,
) -> Result<()> {
    let content = match content {
        Some(c) => c,
        None => {
            eprintln!("Enter note content (Ctrl+D to finish):");
            let stdin = io::stdin();
            let lines: Vec<String> = stdin.lock().lines().map_while(|l| l.ok()).collect();
            lines.join("\n")
        }
    };

    if content.trim().is_empty() {
        anyhow::bail!("Note content cannot be empty");
    }

    let mut note = Note::new(title, content).with_type(note_type);
    if let Some(topic) = topic {
        note = note.with_topic(topic);
    }

    library.save_note(&note).await?;
    println!("✓ Created note: {}", note.id);
    Ok(())
}

async fn cmd_import_note(library: Library, path: PathBuf) -> Result<()> {
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let note: Note = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse note from: {}", path.display()))?;

    library.save_note(&note).await?;
    println!("✓ Imported note: {} ({})", note.title, note.id);
    Ok(())
}

async fn cmd_import_chat(library: Library, path: PathBuf) -> Result<()> {
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let transcript = ChatTranscript::from_json(&json)
        .with_context(|| format!("Failed to parse chat session from: {}", path.display()))?;

    library.save_chat(&transcript).await?;
    println!(
        "✓ Imported chat session: {} ({} messages)",
        transcript.session_id,
        transcript.messages.len()
    );
    Ok(())
}

async fn cmd_list(library: Library, limit: usize) -> Result<()> {
    let notes = library.list_notes(limit).await?;

    if notes.is_empty() {
        println!("No notes yet. Add one with: noteport add \"Title\" \"content\"");
        return Ok(());
    }

    println!("Recent notes ({}):\n", notes.len());
    for note in notes {
        let preview: String = note.content.chars().take(80).collect();
        println!("• {} [{}] ({})", note.title, note.id, note.note_type.label());
        println!(
            "  {}{}",
            preview,
            if note.content.len() > 80 { "..." } else { "" }
        );
        println!();
    }

    Ok(())
}

async fn cmd_chats(library: Library, limit: usize) -> Result<()> {
    let chats = library.list_chats(limit).await?;

    if chats.is_empty() {
        println!("No chat sessions yet. Import one with: noteport import-chat <file>");
        return Ok(());
    }

    println!("Recent chat sessions ({}):\n", chats.len());
    for chat in chats {
        println!(
            "• {} — {} messages, updated {}",
            chat.session_id,
            chat.messages.len(),
            chat.updated_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

async fn cmd_show(library: Library, note_id: String) -> Result<()> {
    let note = library
        .get_note(&note_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Note not found: {}", note_id))?;

    println!("Note: {} ({})", note.title, note.id);
    println!("Type: {}", note.note_type.label());
    if let Some(topic) = &note.topic {
        println!("Topic: {}", topic);
    }
    println!();
    println!("{}", note.content);

    if let Some(mcqs) = &note.mcqs {
        println!();
        println!("Questions: {}", mcqs.len());
    }
    Ok(())
}

async fn cmd_export_note(
    library: Library,
    note_id: String,
    format: ExportFormat,
    out: PathBuf,
) -> Result<()> {
    let exporter = Exporter::new(library);
    let artifact = exporter
        .export_note(&note_id, format)
        .await
        .context("Export failed")?;
    let path = exporter
        .save_artifact(&artifact, &out)
        .await
        .context("Export failed")?;
    println!("✓ Exported to {}", path.display());
    Ok(())
}

async fn cmd_export_chat(
    library: Library,
    session_id: String,
    format: ExportFormat,
    out: PathBuf,
) -> Result<()> {
    let exporter = Exporter::new(library);
    let artifact = exporter
        .export_chat(&session_id, format)
        .await
        .context("Export failed")?;
    let path = exporter
        .save_artifact(&artifact, &out)
        .await
        .context("Export failed")?;
    println!("✓ Exported to {}", path.display());
    Ok(())
}
