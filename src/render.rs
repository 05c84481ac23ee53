use image::{ImageFormat, Rgba, RgbaImage};
use owned_ttf_parser::OutlineBuilder;
use std::path::Path;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::color::GlyphColorMap;
use crate::error::{ContextError, ErrorKind};
use crate::font::FontResource;
use crate::layout::LayoutPlan;

/// The color of the canvas before anything is drawn on it.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Draws a finalized layout plan onto a raster canvas.
pub trait Renderer {
    fn render(&self, plan: &LayoutPlan, colors: &GlyphColorMap) -> Result<RgbaImage, ContextError>;
}

/// A renderer filling the glyph outlines of a font, one character at a time so that every
/// letter can take its own color.
#[derive(Debug, Clone)]
pub struct RasterRenderer {
    font: FontResource,
}

impl RasterRenderer {
    pub fn new(font: FontResource) -> Self {
        RasterRenderer { font }
    }
}

impl Renderer for RasterRenderer {
    fn render(&self, plan: &LayoutPlan, colors: &GlyphColorMap) -> Result<RgbaImage, ContextError> {
        let mut pixmap = Pixmap::new(plan.canvas_width, plan.canvas_height).ok_or_else(|| {
            ContextError::with_context(
                ErrorKind::Render,
                format!(
                    "Unable to draw on a {}x{} canvas",
                    plan.canvas_width, plan.canvas_height
                ),
            )
        })?;
        pixmap.fill(Color::from_rgba8(
            BACKGROUND[0],
            BACKGROUND[1],
            BACKGROUND[2],
            BACKGROUND[3],
        ));
        let font_metrics = self.font.font_metrics();

        for line in plan.text_lines() {
            let scale = font_metrics.scale(line.style.point_size);
            let baseline = line.y_offset as f32 + f32::from(font_metrics.ascent) * scale;
            let mut pen_x = line.x_offset as f32;

            for character in line.text.chars() {
                let glyph_id = self.font.glyph_id(character);
                if !character.is_whitespace() {
                    let mut glyph_path = GlyphPathBuilder::new(scale, pen_x, baseline);
                    let outlined = self.font.face().outline_glyph(glyph_id, &mut glyph_path);
                    match outlined.and(glyph_path.finish()) {
                        Some(path) => pixmap.fill_path(
                            &path,
                            &glyph_paint(colors.fill(character)),
                            FillRule::Winding,
                            Transform::identity(),
                            None,
                        ),
                        None => log::trace!("The character {:?} has no outline", character),
                    }
                }
                pen_x += f32::from(self.font.advance(glyph_id)) * scale;
            }
        }

        Ok(pixmap_to_image(&pixmap))
    }
}

fn glyph_paint(color: Rgba<u8>) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;
    paint
}

/// Converts the premultiplied pixels of a pixmap into a straight-alpha image. Fully
/// transparent pixels are given the `BACKGROUND` color.
pub fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut canvas = RgbaImage::new(pixmap.width(), pixmap.height());
    for (pixel, premultiplied) in canvas.pixels_mut().zip(pixmap.pixels()) {
        let color = premultiplied.demultiply();
        *pixel = if color.alpha() == 0 {
            BACKGROUND
        } else {
            Rgba([color.red(), color.green(), color.blue(), color.alpha()])
        };
    }

    canvas
}

/// Encodes the canvas as a PNG file at the given path.
pub fn save_png(canvas: &RgbaImage, output_path: &Path) -> Result<(), ContextError> {
    canvas
        .save_with_format(output_path, ImageFormat::Png)
        .map_err(|error| {
            ContextError::with_error(
                ErrorKind::Render,
                format!("Failed to save the image {:?}", output_path),
                &error,
            )
        })?;
    log::info!("Saved the image to the path: {:?}", output_path);

    Ok(())
}

/// Builds the path of a glyph outline in canvas coordinates, converting font units into pixels
/// and flipping the vertical axis so that it grows downwards from the baseline.
pub struct GlyphPathBuilder {
    builder: PathBuilder,
    scale: f32,
    origin_x: f32,
    baseline: f32,
}

impl GlyphPathBuilder {
    pub fn new(scale: f32, origin_x: f32, baseline: f32) -> Self {
        GlyphPathBuilder {
            builder: PathBuilder::new(),
            scale,
            origin_x,
            baseline,
        }
    }

    /// The finished path, or `None` when the outline was empty.
    pub fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }

    fn x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        self.baseline - y * self.scale
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.x(x), self.y(y));
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.x(x), self.y(y));
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1, x, y) = (self.x(x1), self.y(y1), self.x(x), self.y(y));
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = (self.x(x1), self.y(y1));
        let (x2, y2) = (self.x(x2), self.y(y2));
        let (x, y) = (self.x(x), self.y(y));
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
