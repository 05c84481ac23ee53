use owned_ttf_parser::{AsFaceRef as _, Face, GlyphId, OwnedFace};
use std::path::Path;
use std::sync::Arc;

use crate::error::{ContextError, ErrorKind};

/// Anything able to measure a line of text in pixels at a given point size.
///
/// The provider is read-only, so a single instance can be shared between concurrent
/// layout computations.
pub trait MetricsProvider {
    /// Returns the `(width, height)` of the text, in pixels.
    fn measure(&self, text: &str, point_size: u32) -> (u32, u32);
}

/// The (insofar) relevant vertical metrics of a font, in font units.
#[derive(Clone, Copy, Debug, Default)]
pub struct FontMetrics {
    /// The ascent of the font.
    pub ascent: i16,
    /// The descent of the font, which is negative for most fonts.
    pub descent: i16,
    /// The number of units per em of the font.
    pub units_per_em: u16,
}

impl FontMetrics {
    /// The factor converting font units into pixels when the em square is `point_size` pixels.
    pub fn scale(&self, point_size: u32) -> f32 {
        point_size as f32 / f32::from(self.units_per_em.max(1))
    }
}

/// A font face loaded from a TTF/OTF file. The face is shared behind an `Arc`, so cloning is
/// cheap and the resource can be handed to several layouts at once.
#[derive(Clone, Debug)]
pub struct FontResource {
    /// The underlying font face which is represented through the `ttf_parser` crate.
    inner: Arc<OwnedFace>,
    /// The number of units per em of the font face.
    units_per_em: u16,
}

impl FontResource {
    /// Read and parse the font at the given path.
    pub fn from_path(font_path: &Path) -> Result<Self, ContextError> {
        let font_bytes = std::fs::read(font_path).map_err(|error| {
            ContextError::with_error(
                ErrorKind::ResourceUnavailable,
                format!("Failed to read the font {:?}", font_path),
                &error,
            )
        })?;
        log::debug!("Read {} bytes of font data from {:?}", font_bytes.len(), font_path);

        Self::from_bytes(font_bytes)
    }

    /// Constructs a font face from the underlying raw data extracted from the font file.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, ContextError> {
        let face = OwnedFace::from_vec(data, 0).map_err(|error| {
            ContextError::with_error(ErrorKind::ResourceUnavailable, "Failed to parse the font", &error)
        })?;
        let units_per_em = face.as_face_ref().units_per_em();

        Ok(Self {
            inner: Arc::new(face),
            units_per_em,
        })
    }

    /// Retrieve the underlying font face as a reference.
    pub fn face(&self) -> &Face<'_> {
        self.inner.as_face_ref()
    }

    /// Retrieve the font metrics from the associated font face.
    pub fn font_metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: self.face().ascender(),
            descent: self.face().descender(),
            units_per_em: self.units_per_em,
        }
    }

    /// Retrieve the glyph of a character, falling back to the `.notdef` glyph.
    pub fn glyph_id(&self, character: char) -> GlyphId {
        self.face().glyph_index(character).unwrap_or(GlyphId(0))
    }

    /// The horizontal advance of a glyph, in font units.
    pub fn advance(&self, glyph_id: GlyphId) -> u16 {
        self.face().glyph_hor_advance(glyph_id).unwrap_or(0)
    }
}

impl MetricsProvider for FontResource {
    fn measure(&self, text: &str, point_size: u32) -> (u32, u32) {
        let metrics = self.font_metrics();
        let scale = metrics.scale(point_size);

        let advance: u32 = text
            .chars()
            .map(|character| u32::from(self.advance(self.glyph_id(character))))
            .sum();
        let width = (advance as f32 * scale).ceil() as u32;
        let height =
            ((i32::from(metrics.ascent) - i32::from(metrics.descent)) as f32 * scale).ceil() as u32;

        (width, height)
    }
}
