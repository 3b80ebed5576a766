//! Flow Document Builder: block stream -> styled paragraphs -> DOCX bytes
//!
//! No manual pagination; the builder emits an ordered list of style-tagged
//! paragraphs and the packager serializes them into a minimal OOXML word
//! package (content types, relationships, document part) inside a zip.
//! Paragraph shading, borders, and indentation all resolve through the
//! Style Registry, mirroring the paginated renderer's mapping.

use std::io::{Cursor, Write};

use noteport_core::{is_correct_option, option_letter, Block};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ExportError, Result};
use crate::pdf::DocumentMeta;
use crate::style::{StyleKey, StyleRegistry};

/// One styled run of text within a paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRun {
    pub text: String,
    /// Run attributes resolve through this key
    pub style: StyleKey,
}

impl FlowRun {
    fn new(text: impl Into<String>, style: StyleKey) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// One flow paragraph; the host viewer decides pagination
#[derive(Debug, Clone, PartialEq)]
pub struct FlowParagraph {
    /// Paragraph-level attributes (shading fill, border accent) resolve here
    pub style: StyleKey,
    pub runs: Vec<FlowRun>,
    pub indent_level: u8,
    /// Paint the style's fill as paragraph shading
    pub shaded: bool,
    /// Draw a bottom border in the style's accent color
    pub bordered: bool,
    pub centered: bool,
}

impl FlowParagraph {
    fn new(style: StyleKey) -> Self {
        Self {
            style,
            runs: Vec::new(),
            indent_level: 0,
            shaded: false,
            bordered: false,
            centered: false,
        }
    }

    fn run(mut self, text: impl Into<String>, style: StyleKey) -> Self {
        self.runs.push(FlowRun::new(text, style));
        self
    }

    fn text(self, text: impl Into<String>) -> Self {
        let style = self.style;
        self.run(text, style)
    }

    fn indent(mut self, level: u8) -> Self {
        self.indent_level = level;
        self
    }

    fn shaded(mut self) -> Self {
        self.shaded = true;
        self
    }

    fn bordered(mut self) -> Self {
        self.bordered = true;
        self
    }

    fn centered(mut self) -> Self {
        self.centered = true;
        self
    }
}

/// Build the ordered paragraph list for a block stream
pub fn build_flow(meta: &DocumentMeta, blocks: &[Block]) -> Vec<FlowParagraph> {
    let mut paragraphs = vec![
        FlowParagraph::new(StyleKey::Title)
            .text(&meta.title)
            .shaded()
            .bordered(),
        FlowParagraph::new(StyleKey::Meta).text(&meta.subtitle),
    ];

    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                let key = StyleRegistry::heading(*level);
                let mut p = FlowParagraph::new(key).text(text);
                // Levels 1-2 carry a border; level 1 is shaded as in print
                if *level <= 2 {
                    p = p.bordered();
                }
                if *level == 1 {
                    p = p.shaded();
                }
                paragraphs.push(p);
            }
            Block::Bullet { indent_level, text } => {
                let key = StyleRegistry::bullet(*indent_level);
                let glyph = if *indent_level == 0 { "\u{2022} " } else { "\u{25E6} " };
                paragraphs.push(
                    FlowParagraph::new(key)
                        .run(glyph, key)
                        .run(text, key)
                        .indent(indent_level + 1),
                );
            }
            Block::TermDefinition {
                term,
                definition,
                example,
            } => {
                if !term.is_empty() {
                    paragraphs.push(
                        FlowParagraph::new(StyleKey::ParagraphBody)
                            .run(format!("{term}: "), StyleKey::TermLabel)
                            .run(definition, StyleKey::ParagraphBody),
                    );
                }
                if let Some(example) = example {
                    paragraphs.push(
                        FlowParagraph::new(StyleKey::ExampleCode)
                            .text(format!("Example: {example}"))
                            .shaded()
                            .indent(1),
                    );
                }
            }
            Block::Divider => {
                paragraphs.push(FlowParagraph::new(StyleKey::Divider).bordered());
            }
            Block::Mcq {
                index,
                question,
                options,
                correct_answer,
                explanation,
            } => {
                paragraphs.push(
                    FlowParagraph::new(StyleKey::McqIndexBadge)
                        .text(format!("Question {}", index + 1))
                        .shaded(),
                );
                paragraphs.push(
                    FlowParagraph::new(StyleKey::TermLabel).text(question).shaded(),
                );

                let mut correct_label = None;
                for (i, option) in options.iter().enumerate() {
                    let correct = is_correct_option(i, option, correct_answer);
                    let key = StyleRegistry::option(correct);
                    let letter = option_letter(i);
                    let mut p = FlowParagraph::new(key)
                        .run(format!("{letter}. "), key)
                        .run(option, key)
                        .indent(1);
                    if correct {
                        p = p.run(" \u{2713}", key).shaded();
                        correct_label = Some(format!("{letter}. {option}"));
                    }
                    paragraphs.push(p);
                }

                paragraphs.push(
                    FlowParagraph::new(StyleKey::McqOptionCorrect).run(
                        format!(
                            "Correct Answer: {}",
                            correct_label.unwrap_or_else(|| correct_answer.clone())
                        ),
                        StyleKey::McqOptionCorrect,
                    ),
                );

                if let Some(explanation) = explanation {
                    paragraphs.push(
                        FlowParagraph::new(StyleKey::McqExplanation)
                            .text(format!("Explanation: {explanation}"))
                            .shaded(),
                    );
                }
            }
            Block::Paragraph { text } => {
                paragraphs.push(FlowParagraph::new(StyleKey::ParagraphBody).text(text));
            }
            Block::RoleHeader { role } => {
                let key = StyleRegistry::role(*role);
                paragraphs.push(
                    FlowParagraph::new(key).text(role.badge_label()).shaded(),
                );
            }
        }
    }

    // Trailing chrome: a bordered divider and a centered attribution line
    paragraphs.push(FlowParagraph::new(StyleKey::Divider).bordered());
    paragraphs.push(
        FlowParagraph::new(StyleKey::Meta)
            .text("Generated by Noteport")
            .centered(),
    );

    paragraphs
}

/// Serialize the paragraph list into DOCX bytes.
///
/// The deflate work runs on the blocking pool; callers must await the
/// result before triggering the save primitive.
pub async fn package_docx(paragraphs: Vec<FlowParagraph>) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || package_docx_sync(&paragraphs))
        .await
        .map_err(|e| ExportError::Serialization(e.to_string()))?
}

fn package_docx_sync(paragraphs: &[FlowParagraph]) -> Result<Vec<u8>> {
    let document = document_xml(paragraphs);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let pack = |e: zip::result::ZipError| ExportError::Serialization(e.to_string());

    zip.start_file("[Content_Types].xml", options).map_err(pack)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())
        .map_err(|e| ExportError::Serialization(e.to_string()))?;

    zip.start_file("_rels/.rels", options).map_err(pack)?;
    zip.write_all(RELS_XML.as_bytes())
        .map_err(|e| ExportError::Serialization(e.to_string()))?;

    zip.start_file("word/document.xml", options).map_err(pack)?;
    zip.write_all(document.as_bytes())
        .map_err(|e| ExportError::Serialization(e.to_string()))?;

    let cursor = zip.finish().map_err(pack)?;
    Ok(cursor.into_inner())
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

/// Indentation step per level, in twentieths of a point
const INDENT_TWIPS: u32 = 360;

fn document_xml(paragraphs: &[FlowParagraph]) -> String {
    let mut xml = String::new();
    xml.push_str(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>
"#,
    );

    for paragraph in paragraphs {
        push_paragraph(&mut xml, paragraph);
    }

    xml.push_str("</w:body>\n</w:document>\n");
    xml
}

fn push_paragraph(xml: &mut String, paragraph: &FlowParagraph) {
    let style = StyleRegistry::get(paragraph.style);

    xml.push_str("<w:p><w:pPr>");
    if paragraph.centered {
        xml.push_str("<w:jc w:val=\"center\"/>");
    }
    if paragraph.indent_level > 0 {
        xml.push_str(&format!(
            "<w:ind w:left=\"{}\"/>",
            paragraph.indent_level as u32 * INDENT_TWIPS
        ));
    }
    if paragraph.shaded {
        if let Some(fill) = style.fill {
            xml.push_str(&format!(
                "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>",
                fill.hex()
            ));
        }
    }
    if paragraph.bordered {
        let accent = style.accent.unwrap_or(style.color);
        xml.push_str(&format!(
            "<w:pBdr><w:bottom w:val=\"single\" w:sz=\"8\" w:space=\"1\" w:color=\"{}\"/></w:pBdr>",
            accent.hex()
        ));
    }
    xml.push_str("<w:spacing w:after=\"120\"/>");
    xml.push_str("</w:pPr>");

    for run in &paragraph.runs {
        push_run(xml, run);
    }

    xml.push_str("</w:p>\n");
}

fn push_run(xml: &mut String, run: &FlowRun) {
    let style = StyleRegistry::get(run.style);

    xml.push_str("<w:r><w:rPr>");
    if style.mono {
        xml.push_str("<w:rFonts w:ascii=\"Courier New\" w:hAnsi=\"Courier New\"/>");
    }
    if style.bold {
        xml.push_str("<w:b/>");
    }
    if style.italic {
        xml.push_str("<w:i/>");
    }
    xml.push_str(&format!("<w:color w:val=\"{}\"/>", style.color.hex()));
    // w:sz is in half-points
    xml.push_str(&format!("<w:sz w:val=\"{}\"/>", (style.size * 2.0).round() as u32));
    xml.push_str("</w:rPr>");
    xml.push_str(&format!(
        "<w:t xml:space=\"preserve\">{}</w:t>",
        escape_xml(&run.text)
    ));
    xml.push_str("</w:r>");
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use noteport_core::{tokenize_content, MessageRole};

    fn meta() -> DocumentMeta {
        DocumentMeta {
            title: "Test Document".into(),
            subtitle: "Definitions · 2024-03-09".into(),
        }
    }

    #[test]
    fn test_flow_starts_with_title_and_meta() {
        let paragraphs = build_flow(&meta(), &[]);
        assert_eq!(paragraphs[0].style, StyleKey::Title);
        assert!(paragraphs[0].bordered);
        assert_eq!(paragraphs[1].style, StyleKey::Meta);
    }

    #[test]
    fn test_flow_ends_with_divider_and_attribution() {
        let paragraphs = build_flow(&meta(), &[]);
        let n = paragraphs.len();
        assert_eq!(paragraphs[n - 2].style, StyleKey::Divider);
        assert!(paragraphs[n - 2].bordered);
        assert!(paragraphs[n - 1].centered);
        assert_eq!(paragraphs[n - 1].runs[0].text, "Generated by Noteport");
    }

    #[test]
    fn test_nested_bullets_use_distinct_glyph_and_indent() {
        let blocks = tokenize_content("* top\n    * nested");
        let paragraphs = build_flow(&meta(), &blocks);
        let top = &paragraphs[2];
        let nested = &paragraphs[3];
        assert_eq!(top.runs[0].text, "\u{2022} ");
        assert_eq!(nested.runs[0].text, "\u{25E6} ");
        assert!(nested.indent_level > top.indent_level);
        assert_ne!(top.style, nested.style);
    }

    #[test]
    fn test_mcq_paragraphs_mark_only_the_correct_option() {
        let blocks = vec![Block::Mcq {
            index: 0,
            question: "2+2=?".into(),
            options: vec!["3".into(), "4".into(), "5".into()],
            correct_answer: "4".into(),
            explanation: Some("basic arithmetic".into()),
        }];
        let paragraphs = build_flow(&meta(), &blocks);

        let correct: Vec<&FlowParagraph> = paragraphs
            .iter()
            .filter(|p| p.style == StyleKey::McqOptionCorrect && p.indent_level == 1)
            .collect();
        assert_eq!(correct.len(), 1);
        assert_eq!(correct[0].runs[1].text, "4");
        assert_eq!(correct[0].runs[2].text, " \u{2713}");

        let explanations: Vec<&FlowParagraph> = paragraphs
            .iter()
            .filter(|p| p.style == StyleKey::McqExplanation)
            .collect();
        assert_eq!(explanations.len(), 1);
        assert_eq!(explanations[0].runs[0].text, "Explanation: basic arithmetic");

        // Explicit correct-answer paragraph is present
        assert!(paragraphs.iter().any(|p| {
            p.style == StyleKey::McqOptionCorrect
                && p.runs[0].text == "Correct Answer: B. 4"
        }));
    }

    #[test]
    fn test_role_headers_are_shaded_and_role_colored() {
        let blocks = vec![
            Block::RoleHeader { role: MessageRole::User },
            Block::RoleHeader { role: MessageRole::Assistant },
        ];
        let paragraphs = build_flow(&meta(), &blocks);
        assert_eq!(paragraphs[2].style, StyleKey::UserBadge);
        assert!(paragraphs[2].shaded);
        assert_eq!(paragraphs[3].style, StyleKey::AssistantBadge);
    }

    #[test]
    fn test_document_xml_escapes_text() {
        let paragraphs = vec![FlowParagraph::new(StyleKey::ParagraphBody).text("a < b & c")];
        let xml = document_xml(&paragraphs);
        assert!(xml.contains("a &lt; b &amp; c"));
        assert!(!xml.contains("a < b"));
    }

    #[tokio::test]
    async fn test_package_is_a_zip() {
        let paragraphs = build_flow(&meta(), &[]);
        let bytes = package_docx(paragraphs).await.unwrap();
        // Zip local file header magic
        assert_eq!(&bytes[..2], b"PK");
    }
}
