use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::normalizer::Normalizer;
use crate::sanitizer::sanitize;
use crate::segment::{Alignment, Style, StyledSegment};

/// Elements which never have a closing tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// The style carried by each of the recognized elements, every other element is ignored.
pub fn element_style(tag: &str) -> Option<Style> {
    match tag {
        "h1" => Some(Style::Title),
        "h2" => Some(Style::Subtitle),
        "p" => Some(Style::Body),
        "small" | "footer" => Some(Style::Footnote),
        _ => None,
    }
}

/// Normalizes HTML fragments. The tokenizer is tolerant: mismatched or missing closing tags,
/// unquoted attributes and void elements written without a slash are all accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlNormalizer;

impl Normalizer for HtmlNormalizer {
    fn normalize(&self, source: &str) -> Vec<StyledSegment> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(false);
        reader.config_mut().check_end_names = false;
        reader.config_mut().allow_unmatched_ends = true;

        let mut builder = SegmentBuilder::default();
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let tag = tag_name(e.name().as_ref());
                    if VOID_ELEMENTS.contains(&tag.as_str()) {
                        builder.empty_element(&tag);
                    } else {
                        builder.start_element(tag, &e);
                    }
                }
                Ok(Event::Empty(e)) => builder.empty_element(&tag_name(e.name().as_ref())),
                Ok(Event::End(e)) => builder.end_element(&tag_name(e.name().as_ref())),
                Ok(Event::Text(e)) => match e.decode() {
                    Ok(text) => builder.text(&text),
                    Err(error) => log::debug!("Skipping an undecodable text node: {:?}", error),
                },
                Ok(Event::CData(e)) => match reader.decoder().decode(&e) {
                    Ok(text) => builder.text(&text),
                    Err(error) => log::debug!("Skipping an undecodable CDATA node: {:?}", error),
                },
                Ok(Event::GeneralRef(e)) => match e.decode() {
                    Ok(entity_name) => builder.text(&resolve_entity(&entity_name)),
                    Err(error) => log::debug!("Skipping an undecodable entity: {:?}", error),
                },
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(error) => {
                    log::warn!(
                        "Stopping at byte {} of the HTML document because of a tokenizer error: {}",
                        reader.buffer_position(),
                        error
                    );
                    break;
                }
            }
        }

        builder.finish()
    }
}

/// The mapped element currently collecting text.
#[derive(Debug)]
struct OpenSegment {
    tag: String,
    style: Style,
    alignment: Alignment,
    text: String,
    /// The depth of the element in the stack of open elements.
    depth: usize,
}

#[derive(Debug, Default)]
struct SegmentBuilder {
    segments: Vec<StyledSegment>,
    open_elements: Vec<String>,
    open_segment: Option<OpenSegment>,
}

impl SegmentBuilder {
    fn start_element(&mut self, tag: String, element: &BytesStart<'_>) {
        if let Some(style) = element_style(&tag) {
            // An open paragraph is implicitly closed by the next mapped element
            if self.open_segment.as_ref().is_some_and(|open| open.tag == "p") {
                if let Some(open_segment) = self.open_segment.take() {
                    self.open_elements.truncate(open_segment.depth);
                    self.finish_segment(open_segment);
                }
            }
            if self.open_segment.is_none() {
                self.open_segment = Some(OpenSegment {
                    tag: tag.clone(),
                    style,
                    alignment: element_alignment(element),
                    text: String::new(),
                    depth: self.open_elements.len(),
                });
            }
        }
        self.open_elements.push(tag);
    }

    fn empty_element(&mut self, tag: &str) {
        if tag != "br" {
            return;
        }
        match self.open_segment.as_mut() {
            Some(open_segment) => open_segment.text.push(' '),
            None => self.segments.push(StyledSegment::line_break()),
        }
    }

    fn end_element(&mut self, tag: &str) {
        // Closing tags without a matching opening tag are ignored
        let Some(depth) = self.open_elements.iter().rposition(|open| open == tag) else {
            return;
        };
        self.open_elements.truncate(depth);
        if self.open_segment.as_ref().is_some_and(|open| open.depth >= depth) {
            if let Some(open_segment) = self.open_segment.take() {
                self.finish_segment(open_segment);
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(open_segment) = self.open_segment.as_mut() {
            open_segment.text.push_str(text);
        }
    }

    fn finish_segment(&mut self, open_segment: OpenSegment) {
        let text = open_segment.text.split_whitespace().collect::<Vec<_>>().join(" ");
        // Elements holding only digits or punctuation would be laid out as blank lines
        if sanitize(&text).is_empty() {
            log::debug!("Skipping the <{}> element without letters: {:?}", open_segment.tag, text);
            return;
        }
        self.segments
            .push(StyledSegment::text(open_segment.style, text).with_alignment(open_segment.alignment));
    }

    fn finish(mut self) -> Vec<StyledSegment> {
        if let Some(open_segment) = self.open_segment.take() {
            self.finish_segment(open_segment);
        }
        self.segments
    }
}

fn tag_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_ascii_lowercase()
}

/// Reads the alignment from the `align` attribute or from the `text-align` property of the
/// `style` attribute, the latter taking precedence. Only `center` and `right` are recognized.
fn element_alignment(element: &BytesStart<'_>) -> Alignment {
    let mut alignment = None;
    let mut style_alignment = None;
    for attribute in element.html_attributes().flatten() {
        let key = String::from_utf8_lossy(attribute.key.as_ref()).to_ascii_lowercase();
        let value = String::from_utf8_lossy(&attribute.value).to_string();
        match key.as_str() {
            "align" => alignment = Some(parse_alignment(&value)),
            "style" => {
                style_alignment = value
                    .split(';')
                    .filter_map(|declaration| declaration.split_once(':'))
                    .filter(|(property, _)| property.trim().eq_ignore_ascii_case("text-align"))
                    .map(|(_, value)| parse_alignment(value))
                    .last()
            }
            _ => {}
        }
    }

    style_alignment.or(alignment).unwrap_or_default()
}

fn parse_alignment(value: &str) -> Alignment {
    match value.trim().to_ascii_lowercase().as_str() {
        "center" => Alignment::Center,
        "right" => Alignment::Right,
        _ => Alignment::Left,
    }
}

/// Resolves the name of an entity reference into its text. Character references and the
/// predefined XML entities are supported, together with the non-breaking space.
fn resolve_entity(entity_name: &str) -> String {
    if entity_name == "nbsp" {
        return " ".to_string();
    }
    match quick_xml::escape::unescape(&format!("&{};", entity_name)) {
        Ok(resolved) => resolved.into_owned(),
        Err(_) => {
            log::debug!("Dropping the unknown entity &{};", entity_name);
            String::new()
        }
    }
}
