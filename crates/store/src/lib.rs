//! Storage layer for Noteport
//!
//! A JSON-file library of saved notes and chat sessions. The export engine
//! treats this as its fetch collaborator.

pub mod error;
pub mod library;

pub use error::{Result, StoreError};
pub use library::Library;
