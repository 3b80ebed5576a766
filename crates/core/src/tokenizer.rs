//! Content tokenizer: raw note text, MCQ sets, or chat messages -> `Block` stream
//!
//! The block stream is a pure function of its input: tokenizing the same
//! content twice yields the same blocks. Blank lines are spacing signals,
//! not blocks. Inline `**bold**`, `*italic*` and `` `code` `` markers are
//! stripped here once so both renderers see identical text.

use crate::block::Block;
use crate::chat::ChatMessage;
use crate::note::{Mcq, Note};

/// Tokenize a note. MCQ notes bypass line scanning entirely: the question
/// set is the content, free text is ignored.
pub fn tokenize_note(note: &Note) -> Vec<Block> {
    match &note.mcqs {
        Some(mcqs) if !mcqs.is_empty() => tokenize_mcqs(mcqs),
        _ => tokenize_content(&note.content),
    }
}

/// Tokenize markdown-ish note text, rule by rule per line.
pub fn tokenize_content(content: &str) -> Vec<Block> {
    let lines: Vec<&str> = content.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let raw = lines[i];
        let trimmed = raw.trim();
        i += 1;

        if trimmed.is_empty() {
            continue;
        }

        if let Some(block) = parse_heading(trimmed) {
            blocks.push(block);
            continue;
        }

        if let Some(block) = parse_bullet(raw) {
            blocks.push(block);
            continue;
        }

        // A standalone `Example:` line gets example styling on its own.
        if let Some(example) = example_text(trimmed) {
            blocks.push(Block::TermDefinition {
                term: String::new(),
                definition: String::new(),
                example: Some(example),
            });
            continue;
        }

        if let Some((term, definition)) = parse_term_definition(trimmed) {
            // Consume a directly following `Example:` line as the attached example.
            let example = lines
                .get(i)
                .and_then(|next| example_text(next.trim()))
                .inspect(|_| i += 1);
            blocks.push(Block::TermDefinition {
                term,
                definition,
                example,
            });
            continue;
        }

        if is_divider(trimmed) {
            blocks.push(Block::Divider);
            continue;
        }

        blocks.push(Block::Paragraph {
            text: strip_inline_markers(trimmed),
        });
    }

    blocks
}

/// Tokenize an MCQ set: one block per entry, source order preserved.
pub fn tokenize_mcqs(mcqs: &[Mcq]) -> Vec<Block> {
    mcqs.iter()
        .enumerate()
        .map(|(index, mcq)| Block::Mcq {
            index,
            question: strip_inline_markers(mcq.question.trim()),
            options: mcq.options.iter().map(|o| o.trim().to_string()).collect(),
            correct_answer: mcq.correct_answer.trim().to_string(),
            explanation: mcq
                .explanation
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(String::from),
        })
        .collect()
}

/// Tokenize a chat session: a role header per message, then one paragraph
/// per non-empty line of that message.
pub fn tokenize_chat(messages: &[ChatMessage]) -> Vec<Block> {
    let mut blocks = Vec::new();
    for message in messages {
        blocks.push(Block::RoleHeader { role: message.role });
        for line in message.content.lines() {
            let line = line.trim();
            if !line.is_empty() {
                blocks.push(Block::Paragraph {
                    text: strip_inline_markers(line),
                });
            }
        }
    }
    blocks
}

fn parse_heading(line: &str) -> Option<Block> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    // Trailing --- / === runs are decoration, not content.
    let text = line[hashes..]
        .trim()
        .trim_end_matches(|c| c == '-' || c == '=')
        .trim_end();
    Some(Block::Heading {
        level: hashes as u8,
        text: strip_inline_markers(text),
    })
}

fn parse_bullet(raw: &str) -> Option<Block> {
    let mut leading_ws = 0usize;
    let mut rest = raw;
    loop {
        if let Some(r) = rest.strip_prefix(' ') {
            leading_ws += 1;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('\t') {
            leading_ws += 4;
            rest = r;
        } else {
            break;
        }
    }

    let marker = rest.strip_prefix('*').or_else(|| rest.strip_prefix('-'))?;
    // The marker must be followed by whitespace, otherwise `---` or `*bold*`
    // would read as bullets.
    if !marker.starts_with(' ') && !marker.starts_with('\t') {
        return None;
    }

    Some(Block::Bullet {
        indent_level: ((leading_ws / 4) as u8).min(4),
        text: strip_inline_markers(marker.trim()),
    })
}

fn example_text(line: &str) -> Option<String> {
    line.strip_prefix("Example:")
        .map(|rest| strip_inline_markers(rest.trim()))
}

fn parse_term_definition(line: &str) -> Option<(String, String)> {
    let (term, definition) = line.split_once(':')?;
    let term = term.trim();
    let definition = definition.trim();

    if term.is_empty() || definition.is_empty() || term.len() > 64 {
        return None;
    }
    if !term.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        return None;
    }
    // Terms are short noun phrases; punctuation-heavy prefixes are prose.
    if !term
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '\'' | '(' | ')'))
    {
        return None;
    }

    Some((
        strip_inline_markers(term),
        strip_inline_markers(definition),
    ))
}

fn is_divider(line: &str) -> bool {
    line.len() >= 3
        && (line.chars().all(|c| c == '-') || line.chars().all(|c| c == '='))
}

/// Strip inline emphasis markers. Neither renderer maps these to rich-text
/// runs, so the text must come out identical for both.
fn strip_inline_markers(text: &str) -> String {
    text.replace("**", "").replace(['*', '`'], "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::MessageRole;
    use crate::note::NoteType;

    #[test]
    fn test_heading_levels_in_order() {
        let blocks = tokenize_content("# A\n## B\n### C");
        assert_eq!(
            blocks,
            vec![
                Block::Heading { level: 1, text: "A".into() },
                Block::Heading { level: 2, text: "B".into() },
                Block::Heading { level: 3, text: "C".into() },
            ]
        );
    }

    #[test]
    fn test_heading_trailing_decoration_stripped() {
        let blocks = tokenize_content("## Memory Management ---");
        assert_eq!(
            blocks,
            vec![Block::Heading { level: 2, text: "Memory Management".into() }]
        );
    }

    #[test]
    fn test_seven_hashes_is_paragraph() {
        let blocks = tokenize_content("####### not a heading");
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn test_divider_needs_three_repeats() {
        assert_eq!(tokenize_content("---"), vec![Block::Divider]);
        assert_eq!(tokenize_content("===="), vec![Block::Divider]);
        assert_eq!(
            tokenize_content("--"),
            vec![Block::Paragraph { text: "--".into() }]
        );
    }

    #[test]
    fn test_bullet_indent_levels() {
        let blocks = tokenize_content("* top\n    - nested\n        * deeper");
        assert_eq!(
            blocks,
            vec![
                Block::Bullet { indent_level: 0, text: "top".into() },
                Block::Bullet { indent_level: 1, text: "nested".into() },
                Block::Bullet { indent_level: 2, text: "deeper".into() },
            ]
        );
    }

    #[test]
    fn test_term_definition_with_attached_example() {
        let blocks = tokenize_content("Paging: splits memory into frames\nExample: 4KB pages on x86");
        assert_eq!(
            blocks,
            vec![Block::TermDefinition {
                term: "Paging".into(),
                definition: "splits memory into frames".into(),
                example: Some("4KB pages on x86".into()),
            }]
        );
    }

    #[test]
    fn test_standalone_example_line() {
        let blocks = tokenize_content("Example: fork() returns twice");
        assert_eq!(
            blocks,
            vec![Block::TermDefinition {
                term: String::new(),
                definition: String::new(),
                example: Some("fork() returns twice".into()),
            }]
        );
    }

    #[test]
    fn test_lowercase_term_is_paragraph() {
        let blocks = tokenize_content("note: this is just prose");
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn test_inline_markers_stripped() {
        let blocks = tokenize_content("This is **bold** and *italic* and `code`.");
        assert_eq!(
            blocks,
            vec![Block::Paragraph { text: "This is bold and italic and code.".into() }]
        );
    }

    #[test]
    fn test_blank_lines_are_not_blocks() {
        let blocks = tokenize_content("first\n\n\nsecond");
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_mcq_note_bypasses_line_scanning() {
        let note = Note::new("Quiz", "# ignored free text")
            .with_type(NoteType::Mcqs)
            .with_mcqs(vec![Mcq {
                question: "2+2=?".into(),
                options: vec!["3".into(), "4".into(), "5".into()],
                correct_answer: "4".into(),
                explanation: Some("basic arithmetic".into()),
            }]);

        let blocks = tokenize_note(&note);
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::Mcq { index, options, correct_answer, .. } => {
                assert_eq!(*index, 0);
                assert_eq!(options, &vec!["3".to_string(), "4".into(), "5".into()]);
                assert_eq!(correct_answer, "4");
            }
            other => panic!("expected Mcq block, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_mcq_explanation_degrades_to_none() {
        let blocks = tokenize_mcqs(&[Mcq {
            question: "Q".into(),
            options: vec!["a".into()],
            correct_answer: "a".into(),
            explanation: Some("   ".into()),
        }]);
        match &blocks[0] {
            Block::Mcq { explanation, .. } => assert_eq!(*explanation, None),
            other => panic!("expected Mcq block, got {other:?}"),
        }
    }

    #[test]
    fn test_chat_tokenization() {
        let messages = vec![
            ChatMessage {
                role: MessageRole::User,
                content: "What is paging?\n\nExplain briefly.".into(),
                timestamp: None,
            },
            ChatMessage {
                role: MessageRole::Assistant,
                content: "Paging splits memory.".into(),
                timestamp: None,
            },
        ];

        let blocks = tokenize_chat(&messages);
        assert_eq!(
            blocks,
            vec![
                Block::RoleHeader { role: MessageRole::User },
                Block::Paragraph { text: "What is paging?".into() },
                Block::Paragraph { text: "Explain briefly.".into() },
                Block::RoleHeader { role: MessageRole::Assistant },
                Block::Paragraph { text: "Paging splits memory.".into() },
            ]
        );
    }

    #[test]
    fn test_tokenization_is_deterministic() {
        let content = "# OS\nPaging: frames\n* one\n---\ndone";
        assert_eq!(tokenize_content(content), tokenize_content(content));
    }
}
