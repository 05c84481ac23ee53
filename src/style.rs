use serde::{Deserialize, Serialize};

use crate::segment::{Style, StyleLabel};

/// How `StyleResolver::nearest_style` settles a point size that is exactly halfway between
/// two entries of the style table.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SizeTieBreak {
    #[default]
    PreferLarger,
    PreferSmaller,
}

/// The point size of each style, together with the tie-break used by the nearest-size mapping.
/// The table is immutable once handed to a `StyleResolver`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleTable {
    pub title: u32,
    pub subtitle: u32,
    pub body: u32,
    pub footnote: u32,
    pub tie_break: SizeTieBreak,
}

impl Default for StyleTable {
    fn default() -> Self {
        StyleTable {
            title: 24,
            subtitle: 16,
            body: 12,
            footnote: 8,
            tie_break: SizeTieBreak::default(),
        }
    }
}

impl StyleTable {
    pub fn point_size(&self, style: Style) -> u32 {
        match style {
            Style::Title => self.title,
            Style::Subtitle => self.subtitle,
            Style::Body => self.body,
            Style::Footnote => self.footnote,
        }
    }
}

/// The typographic parameters a style resolves to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    pub style: Style,
    pub point_size: u32,
}

/// Maps style labels and numeric sizes onto the style table. Every input resolves to exactly
/// one descriptor: anything that is not a known label falls back to `Body`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleResolver {
    table: StyleTable,
}

impl StyleResolver {
    pub fn new(table: StyleTable) -> Self {
        StyleResolver { table }
    }

    pub fn table(&self) -> &StyleTable {
        &self.table
    }

    pub fn descriptor(&self, style: Style) -> StyleDescriptor {
        StyleDescriptor {
            style,
            point_size: self.table.point_size(style),
        }
    }

    /// Resolves a raw label with an exact, case-sensitive match.
    pub fn resolve_style(&self, label: &str) -> StyleDescriptor {
        self.resolve_label(&StyleLabel::parse(label))
    }

    pub fn resolve_label(&self, label: &StyleLabel) -> StyleDescriptor {
        match label {
            StyleLabel::Known(style) => self.descriptor(*style),
            StyleLabel::Unresolved(label) => {
                log::debug!("Unknown style label {:?}, falling back to Body", label);
                self.descriptor(Style::Body)
            }
        }
    }

    /// Finds the style whose point size is the closest to the given one. Equidistant
    /// candidates are settled by the table's `SizeTieBreak`, never by iteration order.
    pub fn nearest_style(&self, point_size: u32) -> Style {
        let distance = |style: &Style| self.table.point_size(*style).abs_diff(point_size);

        Style::ALL
            .into_iter()
            .min_by(|first, second| {
                distance(first).cmp(&distance(second)).then_with(|| {
                    let (first_size, second_size) =
                        (self.table.point_size(*first), self.table.point_size(*second));
                    match self.table.tie_break {
                        SizeTieBreak::PreferLarger => second_size.cmp(&first_size),
                        SizeTieBreak::PreferSmaller => first_size.cmp(&second_size),
                    }
                })
            })
            .unwrap_or(Style::Body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_labels_fall_back_to_body() {
        let resolver = StyleResolver::default();
        assert_eq!(
            resolver.resolve_style("Unknown"),
            resolver.resolve_style("Body")
        );
        assert_eq!(resolver.resolve_style(""), resolver.resolve_style("Body"));
        assert_eq!(resolver.resolve_style("body").point_size, 12);
    }

    #[test]
    fn known_labels_use_the_table() {
        let resolver = StyleResolver::default();
        let sizes: Vec<_> = ["Title", "Subtitle", "Body", "Footnote"]
            .iter()
            .map(|label| resolver.resolve_style(label).point_size)
            .collect();
        assert_eq!(sizes, vec![24, 16, 12, 8]);
    }

    #[test]
    fn overridden_tables_are_honored() {
        let resolver = StyleResolver::new(StyleTable {
            body: 14,
            ..StyleTable::default()
        });
        assert_eq!(resolver.resolve_style("Nope").point_size, 14);
    }

    #[test]
    fn nearest_size_prefers_the_closest_entry() {
        let resolver = StyleResolver::default();
        assert_eq!(resolver.nearest_style(36), Style::Title);
        assert_eq!(resolver.nearest_style(15), Style::Subtitle);
        assert_eq!(resolver.nearest_style(11), Style::Body);
        assert_eq!(resolver.nearest_style(0), Style::Footnote);
    }

    #[test]
    fn equidistant_sizes_prefer_the_larger_entry_by_default() {
        let resolver = StyleResolver::default();
        assert_eq!(resolver.nearest_style(10), Style::Body);
        assert_eq!(resolver.nearest_style(14), Style::Subtitle);
        assert_eq!(resolver.nearest_style(20), Style::Title);
    }

    #[test]
    fn equidistant_sizes_can_prefer_the_smaller_entry() {
        let resolver = StyleResolver::new(StyleTable {
            tie_break: SizeTieBreak::PreferSmaller,
            ..StyleTable::default()
        });
        assert_eq!(resolver.nearest_style(10), Style::Footnote);
        assert_eq!(resolver.nearest_style(14), Style::Body);
        assert_eq!(resolver.nearest_style(20), Style::Subtitle);
    }
}
