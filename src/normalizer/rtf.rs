use std::iter::Peekable;
use std::str::Chars;

use crate::normalizer::Normalizer;
use crate::segment::{Style, StyledSegment};
use crate::style::StyleResolver;

/// Destinations whose contents are document metadata rather than text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "object",
    "header",
    "footer",
    "listtable",
    "listoverridetable",
    "generator",
    "themedata",
    "colorschememapping",
    "datastore",
    "latentstyles",
    "rsidtbl",
    "xmlnstbl",
];

/// Normalizes RTF documents. Every run of text sharing the same `\fs` size becomes one segment,
/// whose style is the one with the nearest point size in the style table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RtfNormalizer {
    style_resolver: StyleResolver,
}

impl RtfNormalizer {
    pub fn new(style_resolver: StyleResolver) -> Self {
        RtfNormalizer { style_resolver }
    }

    /// The style of a run given its size in half-points, `Body` when the run has no size.
    pub fn style_for_half_points(&self, half_points: Option<u32>) -> Style {
        match half_points {
            Some(half_points) => self.style_resolver.nearest_style(half_points / 2),
            None => Style::Body,
        }
    }
}

impl Normalizer for RtfNormalizer {
    fn normalize(&self, source: &str) -> Vec<StyledSegment> {
        let runs = extract_runs(source);
        log::debug!("Extracted {} text runs from the RTF document", runs.len());

        runs.into_iter()
            .map(|run| StyledSegment::text(self.style_for_half_points(run.half_points), run.text))
            .collect()
    }
}

/// A piece of plain text extracted from an RTF document, with the `\fs` size it was set in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub half_points: Option<u32>,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
struct GroupState {
    half_points: Option<u32>,
    skipped: bool,
    unicode_fallback_length: usize,
}

impl Default for GroupState {
    fn default() -> Self {
        GroupState {
            half_points: None,
            skipped: false,
            unicode_fallback_length: 1,
        }
    }
}

#[derive(Debug, Default)]
struct RunCollector {
    runs: Vec<TextRun>,
    text: String,
    half_points: Option<u32>,
    /// Characters still to be ignored after a `\u` escape.
    pending_fallback: usize,
}

impl RunCollector {
    fn push(&mut self, group: &GroupState, character: char) {
        if group.skipped {
            return;
        }
        if self.pending_fallback > 0 {
            self.pending_fallback -= 1;
            return;
        }
        if self.half_points != group.half_points {
            self.finish_run();
            self.half_points = group.half_points;
        }
        self.text.push(character);
    }

    fn finish_run(&mut self) {
        let text = self.text.trim();
        if !text.is_empty() {
            self.runs.push(TextRun {
                half_points: self.half_points,
                text: text.to_string(),
            });
        }
        self.text.clear();
    }
}

/// Extracts the plain-text runs of an RTF document. A run ends at a paragraph or line break,
/// at a change of font size and at the end of the document. Runs made only of whitespace
/// are dropped.
pub fn extract_runs(source: &str) -> Vec<TextRun> {
    let mut characters = source.chars().peekable();
    let mut groups: Vec<GroupState> = Vec::new();
    let mut group = GroupState::default();
    let mut collector = RunCollector::default();
    let mut group_just_opened = false;

    while let Some(character) = characters.next() {
        let opens_group = character == '{';
        match character {
            '{' => {
                groups.push(group);
            }
            '}' => {
                // Unbalanced closing braces are tolerated and leave the state untouched
                if let Some(enclosing_group) = groups.pop() {
                    group = enclosing_group;
                }
            }
            '\\' => match characters.peek().copied() {
                Some(next) if next.is_ascii_alphabetic() => {
                    let (name, parameter) = read_control_word(&mut characters);
                    if group_just_opened && SKIPPED_DESTINATIONS.contains(&name.as_str()) {
                        group.skipped = true;
                    }
                    apply_control_word(&name, parameter, &mut group, &mut collector);
                }
                Some('\'') => {
                    characters.next();
                    // Only hex digits are consumed, so a truncated escape never swallows a brace
                    let hex_digits: String = std::iter::from_fn(|| {
                        characters.next_if(|character| character.is_ascii_hexdigit())
                    })
                    .take(2)
                    .collect();
                    match u8::from_str_radix(&hex_digits, 16) {
                        Ok(byte) if hex_digits.len() == 2 => {
                            collector.push(&group, char::from(byte))
                        }
                        _ => log::debug!("Ignoring the malformed hex escape {:?}", hex_digits),
                    }
                }
                Some('*') => {
                    characters.next();
                    group.skipped = true;
                }
                Some(symbol @ ('\\' | '{' | '}')) => {
                    characters.next();
                    collector.push(&group, symbol);
                }
                Some('~') => {
                    characters.next();
                    collector.push(&group, ' ');
                }
                Some('\n' | '\r') => {
                    characters.next();
                    if !group.skipped {
                        collector.finish_run();
                    }
                }
                Some(_) => {
                    // Other control symbols such as optional hyphens carry no text
                    characters.next();
                }
                None => {}
            },
            '\n' | '\r' => {}
            other => collector.push(&group, other),
        }
        group_just_opened = opens_group;
    }
    collector.finish_run();

    collector.runs
}

/// Reads the letters of a control word and its optional signed numeric parameter. A single
/// space following the control word is its delimiter and is consumed with it.
fn read_control_word(characters: &mut Peekable<Chars<'_>>) -> (String, Option<i32>) {
    let mut name = String::new();
    while let Some(letter) = characters.next_if(|character| character.is_ascii_alphabetic()) {
        name.push(letter);
    }

    let mut digits = String::new();
    if let Some(sign) = characters.next_if_eq(&'-') {
        digits.push(sign);
    }
    while let Some(digit) = characters.next_if(|character| character.is_ascii_digit()) {
        digits.push(digit);
    }
    characters.next_if_eq(&' ');

    (name, digits.parse().ok())
}

fn apply_control_word(
    name: &str,
    parameter: Option<i32>,
    group: &mut GroupState,
    collector: &mut RunCollector,
) {
    match name {
        "fs" => {
            group.half_points = parameter
                .and_then(|half_points| u32::try_from(half_points).ok())
                .filter(|half_points| *half_points > 0);
        }
        "plain" => group.half_points = None,
        "par" | "line" | "sect" | "page" => {
            if !group.skipped {
                collector.finish_run();
            }
        }
        "tab" => collector.push(group, ' '),
        "uc" => {
            group.unicode_fallback_length = parameter
                .and_then(|length| usize::try_from(length).ok())
                .unwrap_or(1);
        }
        "u" => {
            if let Some(code) = parameter {
                // Code points above 32767 are written as negative numbers
                let code = if code < 0 { code + 65536 } else { code };
                if let Some(character) = u32::try_from(code).ok().and_then(char::from_u32) {
                    collector.push(group, character);
                }
                if !group.skipped {
                    collector.pending_fallback = group.unicode_fallback_length;
                }
            }
        }
        _ => {}
    }
}
