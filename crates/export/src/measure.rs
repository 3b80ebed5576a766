//! Text measurement and wrapping for the paginated renderer
//!
//! The built-in Helvetica family ships no metrics through printpdf, so
//! widths are estimated from a width-class table. The estimate only has to
//! be deterministic and conservative enough for line breaking; exact glyph
//! advances are not load-bearing.

const PT_TO_MM: f32 = 0.352_778;

/// Approximate advance width of a glyph in em units (Helvetica-ish)
fn char_width_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '!' | '|' | '\'' => 0.28,
        'f' | 't' | 'r' | 'I' | ' ' | '(' | ')' | '[' | ']' | '/' | '\\' => 0.35,
        'm' | 'w' | 'M' | 'W' | '@' => 0.89,
        '0'..='9' => 0.56,
        'A'..='Z' => 0.70,
        _ => 0.52,
    }
}

/// Estimated width of `text` at `size` points, in millimeters
pub fn text_width(text: &str, size: f32) -> f32 {
    let em: f32 = text.chars().map(char_width_em).sum();
    em * size * PT_TO_MM
}

/// Line height in millimeters for a font size in points
pub fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.35
}

/// Greedy word wrap against a width in millimeters.
///
/// Always yields at least one line (empty input yields one empty line so
/// callers can advance the cursor uniformly). Words wider than the line
/// are hard-split by character.
pub fn wrap(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, size) <= max_width {
            current = word.to_string();
        } else {
            // Hard-split an overlong word
            for c in word.chars() {
                if !current.is_empty()
                    && text_width(&current, size) + text_width(&c.to_string(), size) > max_width
                {
                    lines.push(std::mem::take(&mut current));
                }
                current.push(c);
            }
        }
    }

    if current.is_empty() && lines.is_empty() {
        lines.push(String::new());
    } else if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_one_empty_line() {
        assert_eq!(wrap("", 11.0, 100.0), vec![String::new()]);
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap("hello world", 11.0, 180.0), vec!["hello world"]);
    }

    #[test]
    fn test_wraps_on_word_boundaries() {
        let lines = wrap("alpha beta gamma delta epsilon", 11.0, 25.0);
        assert!(lines.len() > 1);
        // No line exceeds the budget
        for line in &lines {
            assert!(text_width(line, 11.0) <= 25.0, "line too wide: {line}");
        }
        // Nothing lost
        assert_eq!(lines.join(" "), "alpha beta gamma delta epsilon");
    }

    #[test]
    fn test_overlong_word_hard_splits() {
        let lines = wrap("Supercalifragilisticexpialidocious", 11.0, 15.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "Supercalifragilisticexpialidocious");
    }

    #[test]
    fn test_width_grows_with_text() {
        assert!(text_width("wide wide wide", 11.0) > text_width("iii", 11.0));
        assert!(text_width("abc", 14.0) > text_width("abc", 10.0));
    }
}
