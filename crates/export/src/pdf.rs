//! Paginated Layout Engine: block stream -> multi-page PDF
//!
//! A4 pages, fixed margins, an explicit `LayoutCursor` threaded through
//! every block handler. The first page gets a colored header band with the
//! wrapped title and a metadata line; continuation pages start at the top
//! margin. Footers ("Page X of N") are stamped after layout finishes, from
//! the actual final page count.

use noteport_core::{is_correct_option, option_letter, Block};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    calculate_points_for_circle, BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Pt,
    Rect, Rgb,
};

use crate::error::{ExportError, Result};
use crate::measure::{line_height, text_width, wrap};
use crate::style::{Rgb8, Style, StyleKey, StyleRegistry};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 15.0;
const CONTENT_W: f32 = PAGE_W - 2.0 * MARGIN;
/// Content may not run past this distance from the page top (footer zone below)
const BOTTOM: f32 = PAGE_H - MARGIN - 4.0;
/// A block only starts on the current page if it fits with this much to spare
const SLACK: f32 = 6.0;
const MM_TO_PT: f32 = 2.834_646;

/// Title and metadata line shown in the first-page header
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub title: String,
    pub subtitle: String,
}

/// A finished paginated document
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Every string drawn, with the page it landed on
    #[cfg(test)]
    texts: Vec<(usize, String)>,
}

/// Vertical layout position, measured in millimeters from the page top
#[derive(Debug, Clone, Copy)]
struct LayoutCursor {
    y: f32,
    page: usize,
}

pub(crate) fn footer_label(page: usize, total: usize) -> String {
    format!("Page {page} of {total}")
}

/// Render a block stream into PDF bytes. Empty input still produces a
/// valid single-page document with header and footer.
pub fn render_pdf(meta: &DocumentMeta, blocks: &[Block]) -> Result<RenderedPdf> {
    let mut renderer = PaginatedRenderer::new(&meta.title)?;

    let mut cursor = renderer.render_header(LayoutCursor { y: 0.0, page: 0 }, meta);

    let mut prev_was_mcq = false;
    for block in blocks {
        cursor = match block {
            Block::Heading { level, text } => renderer.render_heading(cursor, *level, text),
            Block::Bullet { indent_level, text } => {
                renderer.render_bullet(cursor, *indent_level, text)
            }
            Block::TermDefinition {
                term,
                definition,
                example,
            } => renderer.render_term_definition(cursor, term, definition, example.as_deref()),
            Block::Divider => renderer.render_divider(cursor),
            Block::Mcq {
                index,
                question,
                options,
                correct_answer,
                explanation,
            } => renderer.render_mcq(
                cursor,
                *index,
                question,
                options,
                correct_answer,
                explanation.as_deref(),
                prev_was_mcq,
            ),
            Block::Paragraph { text } => renderer.render_paragraph(cursor, text),
            Block::RoleHeader { role } => renderer.render_role_header(cursor, *role),
        };
        prev_was_mcq = matches!(block, Block::Mcq { .. });
    }

    renderer.stamp_footers();

    let page_count = renderer.pages.len();
    #[cfg(test)]
    let texts = std::mem::take(&mut renderer.texts);
    let bytes = renderer
        .doc
        .save_to_bytes()
        .map_err(|e| ExportError::Render(format!("{e:?}")))?;

    Ok(RenderedPdf {
        bytes,
        page_count,
        #[cfg(test)]
        texts,
    })
}

struct PaginatedRenderer {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    mono: IndirectFontRef,
    #[cfg(test)]
    texts: Vec<(usize, String)>,
}

impl PaginatedRenderer {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let render = |e| ExportError::Render(format!("{e:?}"));
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render)?;
        let italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(render)?;
        let mono = doc.add_builtin_font(BuiltinFont::Courier).map_err(render)?;

        Ok(Self {
            doc,
            pages: vec![(page, layer)],
            regular,
            bold,
            italic,
            mono,
            #[cfg(test)]
            texts: Vec::new(),
        })
    }

    fn layer(&self, page: usize) -> PdfLayerReference {
        let (p, l) = self.pages[page];
        self.doc.get_page(p).get_layer(l)
    }

    fn font_for(&self, style: &Style) -> &IndirectFontRef {
        if style.mono {
            &self.mono
        } else if style.bold {
            &self.bold
        } else if style.italic {
            &self.italic
        } else {
            &self.regular
        }
    }

    fn color(c: Rgb8) -> Color {
        Color::Rgb(Rgb::new(
            c.r as f32 / 255.0,
            c.g as f32 / 255.0,
            c.b as f32 / 255.0,
            None,
        ))
    }

    /// Break to a fresh page unless `needed` plus the slack threshold fits
    fn ensure_space(&mut self, cursor: LayoutCursor, needed: f32) -> LayoutCursor {
        if cursor.y + needed + SLACK <= BOTTOM {
            return cursor;
        }
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.pages.push((page, layer));
        LayoutCursor {
            y: MARGIN,
            page: self.pages.len() - 1,
        }
    }

    /// Draw one line of text with its top edge at the cursor position
    fn text(&mut self, cursor: LayoutCursor, s: &str, style: &Style, x: f32) {
        #[cfg(test)]
        self.texts.push((cursor.page, s.to_string()));
        let layer = self.layer(cursor.page);
        layer.set_fill_color(Self::color(style.color));
        let baseline = cursor.y + line_height(style.size) * 0.78;
        layer.use_text(s, style.size, Mm(x), Mm(PAGE_H - baseline), self.font_for(style));
    }

    fn rect(&self, page: usize, x: f32, y_top: f32, w: f32, h: f32, fill: Rgb8) {
        let layer = self.layer(page);
        layer.set_fill_color(Self::color(fill));
        layer.add_rect(
            Rect::new(
                Mm(x),
                Mm(PAGE_H - y_top - h),
                Mm(x + w),
                Mm(PAGE_H - y_top),
            )
            .with_mode(PaintMode::Fill),
        );
    }

    fn hline(&self, page: usize, x1: f32, x2: f32, y_top: f32, color: Rgb8, thickness: f32) {
        let layer = self.layer(page);
        layer.set_outline_color(Self::color(color));
        layer.set_outline_thickness(thickness);
        let y = Mm(PAGE_H - y_top);
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), y), false),
                (Point::new(Mm(x2), y), false),
            ],
            is_closed: false,
        });
    }

    fn circle(
        &self,
        page: usize,
        cx: f32,
        cy_top: f32,
        radius: f32,
        fill: Option<Rgb8>,
        outline: Option<Rgb8>,
    ) {
        let layer = self.layer(page);
        let points = calculate_points_for_circle(
            Pt(radius * MM_TO_PT),
            Pt(cx * MM_TO_PT),
            Pt((PAGE_H - cy_top) * MM_TO_PT),
        );
        let mode = match (fill, outline) {
            (Some(_), Some(_)) => PaintMode::FillStroke,
            (Some(_), None) => PaintMode::Fill,
            _ => PaintMode::Stroke,
        };
        if let Some(c) = fill {
            layer.set_fill_color(Self::color(c));
        }
        if let Some(c) = outline {
            layer.set_outline_color(Self::color(c));
            layer.set_outline_thickness(0.6);
        }
        layer.add_polygon(Polygon {
            rings: vec![points],
            mode,
            winding_order: WindingOrder::NonZero,
        });
    }

    /// Draw wrapped lines with per-line page breaking; returns the moved cursor
    fn draw_wrapped(
        &mut self,
        mut cursor: LayoutCursor,
        lines: &[String],
        style: &Style,
        x: f32,
    ) -> LayoutCursor {
        let lh = line_height(style.size);
        for line in lines {
            if cursor.y + lh > BOTTOM {
                cursor = self.ensure_space(cursor, BOTTOM);
            }
            self.text(cursor, line, style, x);
            cursor.y += lh;
        }
        cursor
    }

    /// First-page header: full-bleed title band plus a metadata line below it
    fn render_header(&mut self, mut cursor: LayoutCursor, meta: &DocumentMeta) -> LayoutCursor {
        let title_style = StyleRegistry::get(StyleKey::Title);
        let meta_style = StyleRegistry::get(StyleKey::Meta);

        let title_lines = wrap(&meta.title, title_style.size, CONTENT_W);
        let title_lh = line_height(title_style.size);
        let band_h = 8.0 + title_lines.len() as f32 * title_lh + 5.0;

        if let Some(fill) = title_style.fill {
            self.rect(cursor.page, 0.0, 0.0, PAGE_W, band_h, fill);
        }
        cursor.y = 8.0;
        for line in &title_lines {
            self.text(cursor, line, &title_style, MARGIN);
            cursor.y += title_lh;
        }

        cursor.y = band_h + 5.0;
        self.text(cursor, &meta.subtitle, &meta_style, MARGIN);
        cursor.y += line_height(meta_style.size) + 6.0;
        cursor
    }

    fn render_heading(&mut self, mut cursor: LayoutCursor, level: u8, text: &str) -> LayoutCursor {
        let style = StyleRegistry::get(StyleRegistry::heading(level));
        let lines = wrap(text, style.size, CONTENT_W);
        let lh = line_height(style.size);
        let block_h = lines.len() as f32 * lh;

        cursor = self.ensure_space(cursor, block_h + 4.0);
        cursor.y += 2.0;

        if level == 1 {
            if let Some(fill) = style.fill {
                self.rect(
                    cursor.page,
                    MARGIN - 2.0,
                    cursor.y - 1.0,
                    CONTENT_W + 4.0,
                    block_h + 2.0,
                    fill,
                );
            }
        }

        for line in &lines {
            self.text(cursor, line, &style, MARGIN);
            cursor.y += lh;
        }

        if level == 2 {
            if let Some(accent) = style.accent {
                let last = lines.last().map(String::as_str).unwrap_or("");
                let width = text_width(last, style.size);
                self.hline(cursor.page, MARGIN, MARGIN + width, cursor.y - 1.0, accent, 0.8);
            }
        }

        cursor.y += 2.5;
        cursor
    }

    fn render_bullet(&mut self, mut cursor: LayoutCursor, indent_level: u8, text: &str) -> LayoutCursor {
        let style = StyleRegistry::get(StyleRegistry::bullet(indent_level));
        let lh = line_height(style.size);
        let x_marker = MARGIN + 2.0 + indent_level as f32 * 6.0;
        let x_text = x_marker + 4.0;
        let lines = wrap(text, style.size, PAGE_W - MARGIN - x_text);

        cursor = self.ensure_space(cursor, lh);
        let radius = if indent_level == 0 { 1.1 } else { 0.85 };
        self.circle(
            cursor.page,
            x_marker,
            cursor.y + lh * 0.55,
            radius,
            Some(style.color),
            None,
        );
        cursor = self.draw_wrapped(cursor, &lines, &style, x_text);
        cursor.y += 1.5;
        cursor
    }

    fn render_term_definition(
        &mut self,
        mut cursor: LayoutCursor,
        term: &str,
        definition: &str,
        example: Option<&str>,
    ) -> LayoutCursor {
        if !term.is_empty() {
            let label_style = StyleRegistry::get(StyleKey::TermLabel);
            let body_style = StyleRegistry::get(StyleKey::ParagraphBody);
            let label = format!("{term}: ");
            let label_w = text_width(&label, label_style.size);
            let avail = (CONTENT_W - label_w).max(30.0);
            let lines = wrap(definition, body_style.size, avail);
            let lh = line_height(body_style.size);

            cursor = self.ensure_space(cursor, lines.len() as f32 * lh + 2.0);
            self.text(cursor, &label, &label_style, MARGIN);
            // Definition wraps with a hanging indent past the term label
            cursor = self.draw_wrapped(cursor, &lines, &body_style, MARGIN + label_w);
            cursor.y += 1.5;
        }

        if let Some(example) = example {
            cursor = self.render_example(cursor, example);
        }
        cursor
    }

    /// Indented, bordered, monospace snippet
    fn render_example(&mut self, mut cursor: LayoutCursor, example: &str) -> LayoutCursor {
        let style = StyleRegistry::get(StyleKey::ExampleCode);
        let x = MARGIN + 6.0;
        let box_w = CONTENT_W - 6.0;
        let lines = wrap(example, style.size, box_w - 6.0);
        let lh = line_height(style.size);
        let box_h = lines.len() as f32 * lh + 3.0;

        cursor = self.ensure_space(cursor, box_h + 2.0);
        if let Some(fill) = style.fill {
            self.rect(cursor.page, x, cursor.y, box_w, box_h, fill);
        }
        if let Some(accent) = style.accent {
            self.rect(cursor.page, x, cursor.y, 1.0, box_h, accent);
        }
        cursor.y += 1.5;
        cursor = self.draw_wrapped(cursor, &lines, &style, x + 3.5);
        cursor.y += 3.0;
        cursor
    }

    fn render_divider(&mut self, mut cursor: LayoutCursor) -> LayoutCursor {
        let style = StyleRegistry::get(StyleKey::Divider);
        cursor = self.ensure_space(cursor, 5.0);
        cursor.y += 2.0;
        self.hline(
            cursor.page,
            MARGIN,
            PAGE_W - MARGIN,
            cursor.y,
            style.accent.unwrap_or(style.color),
            0.5,
        );
        cursor.y += 3.5;
        cursor
    }

    fn render_paragraph(&mut self, mut cursor: LayoutCursor, text: &str) -> LayoutCursor {
        let style = StyleRegistry::get(StyleKey::ParagraphBody);
        let lines = wrap(text, style.size, CONTENT_W);
        let lh = line_height(style.size);

        // Keep short paragraphs whole; long ones break line by line.
        let needed = (lines.len() as f32 * lh).min(4.0 * lh);
        cursor = self.ensure_space(cursor, needed);
        cursor = self.draw_wrapped(cursor, &lines, &style, MARGIN);
        cursor.y += 2.0;
        cursor
    }

    #[allow(clippy::too_many_arguments)]
    fn render_mcq(
        &mut self,
        mut cursor: LayoutCursor,
        index: usize,
        question: &str,
        options: &[String],
        correct_answer: &str,
        explanation: Option<&str>,
        follows_mcq: bool,
    ) -> LayoutCursor {
        // Thin separator between consecutive questions, never after the last
        if follows_mcq {
            let rule = StyleRegistry::get(StyleKey::Divider);
            cursor = self.ensure_space(cursor, 5.0);
            self.hline(
                cursor.page,
                MARGIN,
                PAGE_W - MARGIN,
                cursor.y + 1.0,
                rule.accent.unwrap_or(rule.color),
                0.3,
            );
            cursor.y += 4.0;
        }

        let badge_style = StyleRegistry::get(StyleKey::McqIndexBadge);
        let question_style = StyleRegistry::get(StyleKey::TermLabel);
        let option_lh = line_height(StyleRegistry::get(StyleKey::McqOptionDefault).size);

        let x_question = MARGIN + 9.5;
        let q_lines = wrap(question, question_style.size, PAGE_W - MARGIN - x_question);
        let q_lh = line_height(question_style.size);
        let q_h = (q_lines.len() as f32 * q_lh).max(7.0);

        // Keep the badge, the question, and the first option together
        cursor = self.ensure_space(cursor, q_h + option_lh + 2.0);

        let badge_r = 3.4;
        let number = (index + 1).to_string();
        self.circle(
            cursor.page,
            MARGIN + badge_r,
            cursor.y + badge_r,
            badge_r,
            badge_style.fill,
            None,
        );
        let num_x = MARGIN + badge_r - text_width(&number, badge_style.size) / 2.0;
        let num_cursor = LayoutCursor {
            y: cursor.y + badge_r - line_height(badge_style.size) / 2.0,
            ..cursor
        };
        self.text(num_cursor, &number, &badge_style, num_x);

        let question_bottom = self.draw_wrapped(cursor, &q_lines, &question_style, x_question);
        if question_bottom.page == cursor.page {
            cursor.y = question_bottom.y.max(cursor.y + 2.0 * badge_r);
        } else {
            cursor = question_bottom;
        }
        cursor.page = question_bottom.page;
        cursor.y += 2.0;

        for (i, option) in options.iter().enumerate() {
            let correct = is_correct_option(i, option, correct_answer);
            let style = StyleRegistry::get(StyleRegistry::option(correct));
            let label = if correct {
                format!("{option} [Correct]")
            } else {
                option.clone()
            };
            let lines = wrap(&label, style.size, CONTENT_W - 16.0);
            cursor = self.ensure_space(cursor, option_lh);

            let letter_r = 2.6;
            let letter = option_letter(i).to_string();
            if correct {
                self.circle(
                    cursor.page,
                    MARGIN + 8.0,
                    cursor.y + letter_r,
                    letter_r,
                    style.fill,
                    style.accent,
                );
            } else {
                self.circle(
                    cursor.page,
                    MARGIN + 8.0,
                    cursor.y + letter_r,
                    letter_r,
                    None,
                    style.accent,
                );
            }
            let letter_x = MARGIN + 8.0 - text_width(&letter, style.size) / 2.0;
            let letter_cursor = LayoutCursor {
                y: cursor.y + letter_r - line_height(style.size) / 2.0,
                ..cursor
            };
            self.text(letter_cursor, &letter, &style, letter_x);

            cursor = self.draw_wrapped(cursor, &lines, &style, MARGIN + 13.0);
            cursor.y += 1.5;
        }

        if let Some(explanation) = explanation {
            let style = StyleRegistry::get(StyleKey::McqExplanation);
            let text = format!("Explanation: {explanation}");
            let lines = wrap(&text, style.size, CONTENT_W - 10.0);
            let lh = line_height(style.size);
            let box_h = lines.len() as f32 * lh + 3.0;

            cursor = self.ensure_space(cursor, box_h + 2.0);
            cursor.y += 1.0;
            if let Some(fill) = style.fill {
                self.rect(cursor.page, MARGIN + 2.0, cursor.y, CONTENT_W - 2.0, box_h, fill);
            }
            if let Some(accent) = style.accent {
                self.rect(cursor.page, MARGIN + 2.0, cursor.y, 1.0, box_h, accent);
            }
            cursor.y += 1.5;
            cursor = self.draw_wrapped(cursor, &lines, &style, MARGIN + 6.0);
            cursor.y += 2.0;
        }

        cursor.y += 2.5;
        cursor
    }

    fn render_role_header(
        &mut self,
        mut cursor: LayoutCursor,
        role: noteport_core::MessageRole,
    ) -> LayoutCursor {
        let style = StyleRegistry::get(StyleRegistry::role(role));
        let label = role.badge_label();
        let lh = line_height(style.size);
        let badge_w = text_width(label, style.size) + 6.0;
        let badge_h = lh + 1.5;

        cursor = self.ensure_space(cursor, badge_h + lh + 2.0);
        cursor.y += 1.5;
        if let Some(fill) = style.fill {
            self.rect(cursor.page, MARGIN, cursor.y, badge_w, badge_h, fill);
        }
        let text_cursor = LayoutCursor {
            y: cursor.y + 0.75,
            ..cursor
        };
        self.text(text_cursor, label, &style, MARGIN + 3.0);
        cursor.y += badge_h + 2.0;
        cursor
    }

    /// Stamp every page with the footer rule, product label, and page count
    fn stamp_footers(&mut self) {
        let style = StyleRegistry::get(StyleKey::FooterText);
        let rule = StyleRegistry::get(StyleKey::Divider);
        let total = self.pages.len();
        let rule_y = PAGE_H - 11.0;

        for page in 0..total {
            self.hline(
                page,
                MARGIN,
                PAGE_W - MARGIN,
                rule_y,
                rule.accent.unwrap_or(rule.color),
                0.3,
            );
            let footer_cursor = LayoutCursor {
                y: rule_y + 1.0,
                page,
            };
            self.text(footer_cursor, "Noteport", &style, MARGIN);

            let label = footer_label(page + 1, total);
            let x = PAGE_W - MARGIN - text_width(&label, style.size);
            self.text(footer_cursor, &label, &style, x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noteport_core::tokenize_content;

    fn meta() -> DocumentMeta {
        DocumentMeta {
            title: "Test Document".into(),
            subtitle: "Summary · 2024-03-09".into(),
        }
    }

    #[test]
    fn test_footer_label_format() {
        assert_eq!(footer_label(2, 7), "Page 2 of 7");
    }

    #[test]
    fn test_empty_content_is_single_valid_page() {
        let rendered = render_pdf(&meta(), &[]).unwrap();
        assert_eq!(rendered.page_count, 1);
        assert!(rendered.bytes.starts_with(b"%PDF"));
        assert!(rendered
            .texts
            .iter()
            .any(|(page, s)| *page == 0 && s == "Page 1 of 1"));
    }

    #[test]
    fn test_long_content_paginates() {
        let content = (0..200)
            .map(|i| format!("Paragraph {i} with enough words to take a full line or two of space."))
            .collect::<Vec<_>>()
            .join("\n");
        let blocks = tokenize_content(&content);
        let rendered = render_pdf(&meta(), &blocks).unwrap();
        assert!(rendered.page_count > 1, "expected multiple pages, got {}", rendered.page_count);
    }

    #[test]
    fn test_mcq_blocks_render() {
        let blocks = vec![
            Block::Mcq {
                index: 0,
                question: "2+2=?".into(),
                options: vec!["3".into(), "4".into(), "5".into()],
                correct_answer: "4".into(),
                explanation: Some("basic arithmetic".into()),
            },
            Block::Mcq {
                index: 1,
                question: "Pick B".into(),
                options: vec!["first".into(), "second".into()],
                correct_answer: "B".into(),
                explanation: None,
            },
        ];
        let rendered = render_pdf(&meta(), &blocks).unwrap();
        assert!(rendered.bytes.starts_with(b"%PDF"));

        // One marked option per question, for both answer formats
        let marked: Vec<&String> = rendered
            .texts
            .iter()
            .map(|(_, s)| s)
            .filter(|s| s.contains("[Correct]"))
            .collect();
        assert_eq!(marked.len(), 2, "marked options: {marked:?}");
        assert!(marked[0].contains('4'));
        assert!(marked[1].contains("second"));
    }

    #[test]
    fn test_stamped_footers_match_final_page_count() {
        let content = (0..200)
            .map(|i| format!("Paragraph {i} with enough words to take a full line or two of space."))
            .collect::<Vec<_>>()
            .join("\n");
        let blocks = tokenize_content(&content);
        let rendered = render_pdf(&meta(), &blocks).unwrap();
        assert!(rendered.page_count > 1);

        for page in 0..rendered.page_count {
            let expected = footer_label(page + 1, rendered.page_count);
            assert!(
                rendered.texts.iter().any(|(p, s)| *p == page && s == &expected),
                "page {page} missing footer {expected:?}"
            );
        }
    }

    #[test]
    fn test_deterministic_page_count() {
        let blocks = tokenize_content("# Heading\nSome body text\n---\n* bullet");
        let a = render_pdf(&meta(), &blocks).unwrap();
        let b = render_pdf(&meta(), &blocks).unwrap();
        assert_eq!(a.page_count, b.page_count);
    }
}
