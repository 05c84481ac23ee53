use serde::{Deserialize, Serialize};

use crate::error::{ContextError, ErrorKind};
use crate::font::MetricsProvider;
use crate::segment::{Alignment, StyledSegment};
use crate::style::{StyleDescriptor, StyleResolver};

/// The fixed distances of the layout, in pixels.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSpacing {
    /// The margin on each side of the canvas.
    pub margin: u32,
    /// The space below every line of text.
    pub line_padding: u32,
    /// The vertical space taken by an explicit break.
    pub break_gap: u32,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        LayoutSpacing {
            margin: 10,
            line_padding: 10,
            break_gap: 20,
        }
    }
}

/// One laid out line. Breaks are kept as lines without extent, so that the plan mirrors the
/// document order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LineBox {
    pub segment: StyledSegment,
    /// The sanitized text drawn on the line.
    pub text: String,
    pub style: StyleDescriptor,
    pub width: u32,
    pub height: u32,
    pub x_offset: u32,
    pub y_offset: u32,
}

/// The resolved geometry of a whole document, independent of any rendering backend.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub lines: Vec<LineBox>,
}

impl LayoutPlan {
    /// The lines which carry text, skipping the breaks.
    pub fn text_lines(&self) -> impl Iterator<Item = &LineBox> {
        self.lines.iter().filter(|line| !line.segment.is_break)
    }
}

/// Measures and places segments. The layout is computed in two passes: the first one measures
/// every line and settles the canvas size, the second one assigns the horizontal offsets
/// that depend on the final canvas width.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    pub spacing: LayoutSpacing,
}

impl LayoutEngine {
    pub fn new(spacing: LayoutSpacing) -> Self {
        LayoutEngine { spacing }
    }

    pub fn compute<M: MetricsProvider + ?Sized>(
        &self,
        segments: &[StyledSegment],
        style_resolver: &StyleResolver,
        metrics_provider: &M,
        canvas_hint_width: Option<u32>,
    ) -> Result<LayoutPlan, ContextError> {
        let LayoutSpacing {
            margin,
            line_padding,
            break_gap,
        } = self.spacing;

        if segments.iter().all(|segment| segment.is_break) {
            return Err(ContextError::with_context(
                ErrorKind::EmptyDocument,
                format!(
                    "The document has no renderable line among its {} segments",
                    segments.len()
                ),
            ));
        }

        // First pass, measure the lines and accumulate them top-down
        let mut lines = Vec::with_capacity(segments.len());
        let mut cursor = margin;
        let mut widest_line = 0;
        for segment in segments {
            if segment.is_break {
                lines.push(LineBox {
                    segment: segment.clone(),
                    text: String::new(),
                    style: style_resolver.resolve_label(&segment.style),
                    width: 0,
                    height: 0,
                    x_offset: margin,
                    y_offset: cursor,
                });
                cursor = checked_sum(&[cursor, break_gap])?;
                continue;
            }

            let style = style_resolver.resolve_label(&segment.style);
            let text = segment.sanitized_text();
            let (width, height) = metrics_provider.measure(&text, style.point_size);
            log::trace!(
                "Measured {:?} at {}pt as {}x{} pixels",
                text,
                style.point_size,
                width,
                height
            );

            widest_line = widest_line.max(width);
            lines.push(LineBox {
                segment: segment.clone(),
                text,
                style,
                width,
                height,
                x_offset: margin,
                y_offset: cursor,
            });
            cursor = checked_sum(&[cursor, height, line_padding])?;
        }

        let canvas_width =
            checked_sum(&[margin, widest_line, margin])?.max(canvas_hint_width.unwrap_or(0));
        let canvas_height = checked_sum(&[cursor, margin])?;

        // Second pass, place every line horizontally now that the canvas width is known
        for line in lines.iter_mut().filter(|line| !line.segment.is_break) {
            line.x_offset = match line.segment.alignment {
                Alignment::Left => margin,
                Alignment::Center => (canvas_width - line.width) / 2,
                Alignment::Right => canvas_width - line.width - margin,
            };
        }
        log::debug!(
            "Laid out {} lines on a {}x{} canvas",
            lines.len(),
            canvas_width,
            canvas_height
        );

        Ok(LayoutPlan {
            canvas_width,
            canvas_height,
            lines,
        })
    }
}

/// Adds up pixel distances, failing when the canvas would not fit in 32 bits.
fn checked_sum(distances: &[u32]) -> Result<u32, ContextError> {
    distances
        .iter()
        .try_fold(0u32, |sum, distance| sum.checked_add(*distance))
        .ok_or_else(|| {
            ContextError::with_context(
                ErrorKind::Render,
                format!("The layout overflows the largest canvas: {:?}", distances),
            )
        })
}

/// Computes the layout of the segments with the default spacing.
pub fn compute_layout<M: MetricsProvider + ?Sized>(
    segments: &[StyledSegment],
    style_resolver: &StyleResolver,
    metrics_provider: &M,
    canvas_hint_width: Option<u32>,
) -> Result<LayoutPlan, ContextError> {
    LayoutEngine::default().compute(segments, style_resolver, metrics_provider, canvas_hint_width)
}
