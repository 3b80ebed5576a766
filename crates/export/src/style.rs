//! Style Registry: the single lookup table both renderers style through
//!
//! Every visual decision in the paginated and the flow renderer resolves
//! to a `Style` from this table, so the two formats stay in lockstep.
//! Conventions shared by both renderers: `fill` is a background paint,
//! `accent` is a border/underline/outline paint; which attributes a given
//! block context consumes is fixed by its rendering rule, never ad hoc.

use noteport_core::MessageRole;

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex form without leading `#`, as OOXML wants it
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Visual attributes for one block context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Rgb8,
    /// Font size in points
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub mono: bool,
    /// Background paint, when the context has one
    pub fill: Option<Rgb8>,
    /// Border/underline/outline paint, when the context has one
    pub accent: Option<Rgb8>,
}

/// Every block context the renderers can ask about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    Title,
    Meta,
    H1,
    H2,
    H3,
    BulletPrimary,
    BulletNested,
    TermLabel,
    ExampleCode,
    Divider,
    ParagraphBody,
    McqIndexBadge,
    McqOptionDefault,
    McqOptionCorrect,
    McqExplanation,
    FooterText,
    UserBadge,
    AssistantBadge,
}

const WHITE: Rgb8 = Rgb8::new(255, 255, 255);
const INK: Rgb8 = Rgb8::new(33, 33, 33);
const INDIGO: Rgb8 = Rgb8::new(63, 81, 181);
const INDIGO_LIGHT: Rgb8 = Rgb8::new(232, 234, 246);
const GREEN: Rgb8 = Rgb8::new(46, 125, 50);
const GREEN_LIGHT: Rgb8 = Rgb8::new(232, 245, 233);
const AMBER_INK: Rgb8 = Rgb8::new(130, 100, 20);
const AMBER_LIGHT: Rgb8 = Rgb8::new(255, 248, 225);
const AMBER_EDGE: Rgb8 = Rgb8::new(255, 224, 130);
const SLATE: Rgb8 = Rgb8::new(55, 71, 79);
const SLATE_LIGHT: Rgb8 = Rgb8::new(236, 239, 241);
const SLATE_EDGE: Rgb8 = Rgb8::new(176, 190, 197);
const MUTED: Rgb8 = Rgb8::new(117, 117, 117);
const RULE: Rgb8 = Rgb8::new(189, 189, 189);
const TEAL: Rgb8 = Rgb8::new(0, 121, 107);

const fn style(color: Rgb8, size: f32) -> Style {
    Style {
        color,
        size,
        bold: false,
        italic: false,
        mono: false,
        fill: None,
        accent: None,
    }
}

const fn bold(mut s: Style) -> Style {
    s.bold = true;
    s
}

const fn italic(mut s: Style) -> Style {
    s.italic = true;
    s
}

const fn mono(mut s: Style) -> Style {
    s.mono = true;
    s
}

const fn fill(mut s: Style, c: Rgb8) -> Style {
    s.fill = Some(c);
    s
}

const fn accent(mut s: Style, c: Rgb8) -> Style {
    s.accent = Some(c);
    s
}

/// Read-only style table shared by both renderers
pub struct StyleRegistry;

impl StyleRegistry {
    /// Resolve the style for a block context
    pub fn get(key: StyleKey) -> Style {
        match key {
            StyleKey::Title => accent(fill(bold(style(WHITE, 20.0)), INDIGO), INDIGO),
            StyleKey::Meta => italic(style(MUTED, 10.0)),
            StyleKey::H1 => accent(fill(bold(style(INDIGO, 16.0)), INDIGO_LIGHT), INDIGO),
            StyleKey::H2 => accent(bold(style(INDIGO, 13.5)), INDIGO),
            StyleKey::H3 => bold(style(INK, 12.0)),
            StyleKey::BulletPrimary => style(INK, 11.0),
            StyleKey::BulletNested => style(SLATE, 10.5),
            StyleKey::TermLabel => fill(bold(style(INDIGO, 11.0)), INDIGO_LIGHT),
            StyleKey::ExampleCode => accent(fill(mono(style(SLATE, 10.0)), SLATE_LIGHT), SLATE_EDGE),
            StyleKey::Divider => accent(style(RULE, 11.0), RULE),
            StyleKey::ParagraphBody => style(INK, 11.0),
            StyleKey::McqIndexBadge => fill(bold(style(WHITE, 10.0)), INDIGO),
            StyleKey::McqOptionDefault => accent(style(INK, 11.0), RULE),
            StyleKey::McqOptionCorrect => accent(fill(bold(style(GREEN, 11.0)), GREEN_LIGHT), GREEN),
            StyleKey::McqExplanation => accent(fill(style(AMBER_INK, 10.5), AMBER_LIGHT), AMBER_EDGE),
            StyleKey::FooterText => style(MUTED, 9.0),
            StyleKey::UserBadge => fill(bold(style(WHITE, 10.0)), TEAL),
            StyleKey::AssistantBadge => fill(bold(style(WHITE, 10.0)), INDIGO),
        }
    }

    /// Heading key for a tokenized level (1-6); 3 and deeper share H3
    pub fn heading(level: u8) -> StyleKey {
        match level {
            1 => StyleKey::H1,
            2 => StyleKey::H2,
            _ => StyleKey::H3,
        }
    }

    /// Bullet key for an indent level
    pub fn bullet(indent_level: u8) -> StyleKey {
        if indent_level == 0 {
            StyleKey::BulletPrimary
        } else {
            StyleKey::BulletNested
        }
    }

    /// Option key given the shared correctness decision
    pub fn option(is_correct: bool) -> StyleKey {
        if is_correct {
            StyleKey::McqOptionCorrect
        } else {
            StyleKey::McqOptionDefault
        }
    }

    /// Badge key for a chat role
    pub fn role(role: MessageRole) -> StyleKey {
        match role {
            MessageRole::User => StyleKey::UserBadge,
            MessageRole::Assistant => StyleKey::AssistantBadge,
        }
    }
}
