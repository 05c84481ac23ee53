//! Normalizers turn one of the supported input dialects into the ordered sequence of
//! `StyledSegment`s consumed by the layout engine. The dialect is chosen once, at the entry
//! point, through `Dialect::normalizer`.

use serde::{Deserialize, Serialize};

use crate::segment::StyledSegment;
use crate::style::StyleResolver;

pub mod html;
pub mod inline;
pub mod rtf;

pub use html::HtmlNormalizer;
pub use inline::InlineNormalizer;
pub use rtf::RtfNormalizer;

/// Parses a whole document of one dialect. Anomalies are absorbed with best-effort defaults,
/// and a document without any segment is not an error at this level.
pub trait Normalizer {
    fn normalize(&self, source: &str) -> Vec<StyledSegment>;
}

/// A finite and restartable sequence of raw lines, such as a file, a fixture or the lines
/// typed on a console.
pub trait LineSource {
    fn raw_lines(&self) -> Box<dyn Iterator<Item = &str> + '_>;
}

impl LineSource for str {
    fn raw_lines(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(str::lines(self))
    }
}

impl LineSource for String {
    fn raw_lines(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(str::lines(self))
    }
}

impl LineSource for [String] {
    fn raw_lines(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.iter().map(String::as_str))
    }
}

impl LineSource for Vec<String> {
    fn raw_lines(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        self.as_slice().raw_lines()
    }
}

/// The supported input dialects.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// One `label:content` record per line.
    Inline,
    /// An RTF document whose runs are styled through `\fs` font sizes.
    Rtf,
    /// An HTML fragment using headings, paragraphs and small print.
    Html,
}

impl Dialect {
    pub fn normalizer(&self, style_resolver: StyleResolver) -> Box<dyn Normalizer> {
        match self {
            Dialect::Inline => Box::new(InlineNormalizer),
            Dialect::Rtf => Box::new(RtfNormalizer::new(style_resolver)),
            Dialect::Html => Box::new(HtmlNormalizer),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inline" | "text" | "txt" => Ok(Dialect::Inline),
            "rtf" => Ok(Dialect::Rtf),
            "html" | "htm" => Ok(Dialect::Html),
            other => Err(format!("Unknown input dialect {:?}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Style;

    #[test]
    fn dialects_parse_from_their_names() {
        assert_eq!("RTF".parse::<Dialect>(), Ok(Dialect::Rtf));
        assert_eq!("htm".parse::<Dialect>(), Ok(Dialect::Html));
        assert_eq!("txt".parse::<Dialect>(), Ok(Dialect::Inline));
        assert!("markdown".parse::<Dialect>().is_err());
    }

    #[test]
    fn each_dialect_gets_its_own_normalizer() {
        let resolver = StyleResolver::default();
        let inline = Dialect::Inline.normalizer(resolver).normalize("Title:Hello");
        let rtf = Dialect::Rtf
            .normalizer(resolver)
            .normalize(r"{\rtf1 \fs48 Hello\par}");
        let html = Dialect::Html.normalizer(resolver).normalize("<h1>Hello</h1>");

        for segments in [inline, rtf, html] {
            assert_eq!(segments, vec![StyledSegment::text(Style::Title, "Hello")]);
        }
    }

    #[test]
    fn line_sources_are_interchangeable() {
        let text = "a\nb";
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            text.raw_lines().collect::<Vec<_>>(),
            lines.raw_lines().collect::<Vec<_>>()
        );
    }
}
