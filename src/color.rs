use image::Rgba;
use owned_ttf_parser::{colr, GlyphId, RgbaColor};
use std::collections::BTreeMap;

use crate::font::FontResource;

/// The fill used for every glyph without an entry in the color map.
pub const DEFAULT_FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A mapping from the upper-case latin letters to the color of their first color layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphColorMap {
    colors: BTreeMap<char, Rgba<u8>>,
}

impl GlyphColorMap {
    /// Records the color of a letter. Anything outside `A..=Z` is discarded.
    pub fn insert(&mut self, letter: char, color: Rgba<u8>) -> bool {
        if !letter.is_ascii_uppercase() {
            return false;
        }
        self.colors.insert(letter, color);
        true
    }

    pub fn get(&self, letter: char) -> Option<Rgba<u8>> {
        self.colors.get(&letter).copied()
    }

    /// The color a character is drawn with: its recorded color, or opaque black.
    pub fn fill(&self, character: char) -> Rgba<u8> {
        self.get(character).unwrap_or(DEFAULT_FILL)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, Rgba<u8>)> + '_ {
        self.colors.iter().map(|(letter, color)| (*letter, *color))
    }
}

/// Builds the color map of a font from its `COLR` and `CPAL` tables. A font without them
/// gives an empty map, in which case every glyph is drawn with `DEFAULT_FILL`.
///
/// Only the first palette is consulted and only the first layer of each color glyph is kept:
/// a letter gets a single flat fill rather than the full layered composite.
pub fn build_color_map(font: &FontResource) -> GlyphColorMap {
    let mut color_map = GlyphColorMap::default();
    let face = font.face();
    if face.tables().colr.is_none() {
        log::debug!("The font has no color table, every glyph will be filled with black");
        return color_map;
    }

    for letter in 'A'..='Z' {
        let glyph_id = font.glyph_id(letter);
        if glyph_id == GlyphId(0) || !face.is_color_glyph(glyph_id) {
            continue;
        }
        let mut first_layer = FirstLayerPainter::default();
        if face.paint_color_glyph(glyph_id, 0, &mut first_layer).is_none() {
            log::warn!(
                "The color glyph of the letter {:?} refers to a missing palette entry",
                letter
            );
        }
        if let Some(LayerFill::Color(color)) = first_layer.fill {
            color_map.insert(letter, Rgba([color.red, color.green, color.blue, color.alpha]));
        }
    }
    log::debug!("Found the color of {} letters in the font", color_map.len());

    color_map
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayerFill {
    Foreground,
    Color(RgbaColor),
}

/// Remembers how the first layer of a color glyph is painted and ignores the others.
#[derive(Debug, Default)]
struct FirstLayerPainter {
    fill: Option<LayerFill>,
}

impl colr::Painter for FirstLayerPainter {
    fn outline(&mut self, _glyph_id: GlyphId) {}

    fn paint_foreground(&mut self) {
        self.fill.get_or_insert(LayerFill::Foreground);
    }

    fn paint_color(&mut self, color: RgbaColor) {
        self.fill.get_or_insert(LayerFill::Color(color));
    }
}
