use serde::{Deserialize, Serialize};

use crate::sanitizer::sanitize;

/// The typographic roles a line can take.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Style {
    Title,
    Subtitle,
    Body,
    Footnote,
}

impl Style {
    pub const ALL: [Style; 4] = [Style::Title, Style::Subtitle, Style::Body, Style::Footnote];

    /// The label under which the style is written in the inline dialect.
    pub fn label(&self) -> &'static str {
        match self {
            Style::Title => "Title",
            Style::Subtitle => "Subtitle",
            Style::Body => "Body",
            Style::Footnote => "Footnote",
        }
    }

    /// Exact, case-sensitive match against the four known labels.
    pub fn from_label(label: &str) -> Option<Style> {
        Style::ALL.into_iter().find(|style| style.label() == label)
    }
}

/// The style of a segment as it was found in the source, either one of the known roles or
/// a label that the style resolver will have to fall back from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StyleLabel {
    Known(Style),
    Unresolved(String),
}

impl StyleLabel {
    pub fn parse(label: &str) -> StyleLabel {
        match Style::from_label(label) {
            Some(style) => StyleLabel::Known(style),
            None => StyleLabel::Unresolved(label.to_string()),
        }
    }
}

impl From<Style> for StyleLabel {
    fn from(style: Style) -> Self {
        StyleLabel::Known(style)
    }
}

/// Horizontal placement of a line inside the canvas.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// One semantic line of a document, or an explicit vertical break.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StyledSegment {
    pub style: StyleLabel,
    pub raw_text: String,
    pub alignment: Alignment,
    pub is_break: bool,
}

impl StyledSegment {
    /// A left-aligned line of text in the given style.
    pub fn text<L: Into<StyleLabel>, S: Into<String>>(style: L, raw_text: S) -> StyledSegment {
        StyledSegment {
            style: style.into(),
            raw_text: raw_text.into(),
            alignment: Alignment::Left,
            is_break: false,
        }
    }

    /// An explicit vertical gap, which carries no text.
    pub fn line_break() -> StyledSegment {
        StyledSegment {
            style: StyleLabel::Known(Style::Body),
            raw_text: String::new(),
            alignment: Alignment::Left,
            is_break: true,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> StyledSegment {
        self.alignment = alignment;
        self
    }

    /// The text as it will be drawn, that is after sanitization.
    pub fn sanitized_text(&self) -> String {
        if self.is_break {
            return String::new();
        }
        sanitize(&self.raw_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_case_sensitive() {
        assert_eq!(StyleLabel::parse("Title"), StyleLabel::Known(Style::Title));
        assert_eq!(
            StyleLabel::parse("title"),
            StyleLabel::Unresolved("title".into())
        );
        assert_eq!(StyleLabel::parse(""), StyleLabel::Unresolved(String::new()));
    }

    #[test]
    fn breaks_never_carry_text() {
        let segment = StyledSegment::line_break();
        assert!(segment.is_break);
        assert_eq!(segment.sanitized_text(), "");
    }

    #[test]
    fn text_segments_default_to_left() {
        let segment = StyledSegment::text(Style::Body, "Hello there");
        assert_eq!(segment.alignment, Alignment::Left);
        assert_eq!(segment.sanitized_text(), "HELLO    THERE");
    }
}
