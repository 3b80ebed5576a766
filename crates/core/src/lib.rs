//! Core domain types for Noteport
//!
//! This crate defines the data structures handed to the export engine
//! (Notes, MCQs, chat transcripts), the `Block` stream they tokenize
//! into, and the tokenizer itself.

pub mod block;
pub mod chat;
pub mod error;
pub mod note;
pub mod tokenizer;

pub use block::{is_correct_option, option_letter, Block};
pub use chat::{ChatMessage, ChatTranscript, MessageRole};
pub use error::{CoreError, Result};
pub use note::{Mcq, Note, NoteType};
pub use tokenizer::{tokenize_chat, tokenize_content, tokenize_mcqs, tokenize_note};
