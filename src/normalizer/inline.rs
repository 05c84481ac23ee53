use crate::normalizer::{LineSource, Normalizer};
use crate::segment::{StyleLabel, StyledSegment};

/// The separator between the style label and the content of an inline record.
pub const SEPARATOR: char = ':';

/// Normalizes the inline dialect, where every line reads `<style-label>:<content>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineNormalizer;

impl InlineNormalizer {
    /// Normalizes every line of the source. A line without a separator is skipped, while the
    /// remaining lines produce exactly one segment each, even when their content is empty.
    pub fn normalize_lines<S: LineSource + ?Sized>(&self, source: &S) -> Vec<StyledSegment> {
        source
            .raw_lines()
            .enumerate()
            .filter_map(|(line_index, line)| parse_record(line_index + 1, line))
            .collect()
    }
}

impl Normalizer for InlineNormalizer {
    fn normalize(&self, source: &str) -> Vec<StyledSegment> {
        self.normalize_lines(source)
    }
}

fn parse_record(line_number: usize, line: &str) -> Option<StyledSegment> {
    if line.trim().is_empty() {
        return None;
    }
    let Some((label, content)) = line.split_once(SEPARATOR) else {
        log::warn!(
            "Skipping the malformed line {}, it has no {:?} separator: {:?}",
            line_number,
            SEPARATOR,
            line
        );
        return None;
    };

    Some(StyledSegment::text(
        StyleLabel::parse(label.trim()),
        content.trim(),
    ))
}
