//! The semantic block stream produced by the tokenizer
//!
//! `Block` is a closed sum type: both renderers match on it exhaustively,
//! so adding a variant forces every renderer to handle it.

use crate::chat::MessageRole;

/// A semantic unit of parsed content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A heading, levels 1-6
    Heading { level: u8, text: String },

    /// A bullet point; `indent_level` 0 is top-level, >= 1 renders as a
    /// visually distinct nested bullet
    Bullet { indent_level: u8, text: String },

    /// A `Term: definition` pair with an optional attached example line.
    /// A standalone `Example:` line is carried as an empty term and
    /// definition with `example` set.
    TermDefinition {
        term: String,
        definition: String,
        example: Option<String>,
    },

    /// A horizontal rule
    Divider,

    /// One multiple-choice question; `index` is zero-based source order
    Mcq {
        index: usize,
        question: String,
        options: Vec<String>,
        correct_answer: String,
        explanation: Option<String>,
    },

    /// Plain body text with inline markers already stripped
    Paragraph { text: String },

    /// Marks the start of a chat message
    RoleHeader { role: MessageRole },
}

/// Letter label for an option position: 0 -> "A", 1 -> "B", ...
pub fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// Canonical correct-option rule, shared by both renderers.
///
/// The option text wins on an exact (trimmed) match. Only when
/// `correct_answer` is a single ASCII letter does it fall back to matching
/// the option's derived letter label, case-insensitively.
pub fn is_correct_option(index: usize, option: &str, correct_answer: &str) -> bool {
    let correct = correct_answer.trim();
    if option.trim() == correct {
        return true;
    }
    let mut chars = correct.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            c.to_ascii_uppercase() == option_letter(index)
        }
        _ => false,
    }
}
