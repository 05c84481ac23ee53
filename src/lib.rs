//! Lettering turns styled text into large, evenly tracked lettering. The input is written in one
//! of three dialects: inline `Style:content` records, RTF documents or HTML fragments. Every
//! dialect is normalized into the same sequence of `StyledSegment`s, which is then laid out
//! deterministically onto a canvas and finally rasterized into a PNG image.
//!
//! The heart of the crate is the layout engine, which is completely independent of the way
//! text is drawn: the `LayoutPlan` it produces describes the canvas size and the position of
//! every line, and any `Renderer` can draw it. The renderer shipped with the crate fills the
//! glyph outlines of a TTF font, coloring each letter with the first layer of its color glyph
//! when the font carries a `COLR`/`CPAL` palette.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

/// This module contains the `ContextError` type which is the error type used throughout this library.
///
/// Only the failures which leave no well-defined output are errors: a document without any
/// renderable line, a font or document that cannot be read, a broken configuration file or a
/// canvas that cannot be drawn. Everything else, such as a malformed inline record, an unknown
/// style label or a font without color tables, is absorbed with a sensible default and logged.
pub mod error;

/// The text transform applied to every segment before it is measured and drawn.
pub mod sanitizer;

/// The data model shared by the normalizers and the layout engine: styles, alignments and
/// the `StyledSegment` itself.
pub mod segment;

/// The module where the style table and the `StyleResolver` are presented.
///
/// # Introduction
///
/// Styles are resolved against an explicit and immutable `StyleTable` handed to the resolver at
/// construction. Labels are matched exactly and anything unknown falls back to `Body`. Dialects
/// which only know the numeric size of a run, such as RTF, are mapped onto the style with the
/// nearest size, with equidistant sizes settled by the table's `SizeTieBreak`.
pub mod style;

/// The input dialects and their normalizers.
///
/// # Introduction
///
/// Each dialect implements the `Normalizer` trait, and the one to use is selected once through
/// `Dialect::normalizer`. The inline dialect reads `Style:content` records from any `LineSource`,
/// the RTF dialect splits the document into runs by `\fs` font size and the HTML dialect maps
/// headings, paragraphs and small print onto the four styles.
pub mod normalizer;

/// Font loading and measurement, built on top of `owned_ttf_parser`.
pub mod font;

/// The extraction of the per-letter colors from the color tables of a font.
pub mod color;

/// The module where the two-pass layout engine is presented.
///
/// # Introduction
///
/// The first pass measures every line through a `MetricsProvider` and stacks the lines top-down,
/// separated by a fixed padding, while explicit breaks take a fixed gap. Once the canvas size is
/// known, the second pass places every line horizontally according to its alignment. Nothing is
/// drawn during layout, so the geometry can be tested without any font.
pub mod layout;

/// Rasterization of a `LayoutPlan` and PNG encoding.
pub mod render;

/// The JSON configuration of the engine.
pub mod configuration;

/// The normalization and layout stages chained together.
pub mod pipeline;

pub use color::{build_color_map, GlyphColorMap};
pub use configuration::Configuration;
pub use error::{ContextError, ErrorKind};
pub use font::{FontResource, MetricsProvider};
pub use layout::{compute_layout, LayoutEngine, LayoutPlan, LineBox};
pub use normalizer::{Dialect, Normalizer};
pub use pipeline::Pipeline;
pub use render::{RasterRenderer, Renderer};
pub use sanitizer::sanitize;
pub use segment::{Alignment, Style, StyleLabel, StyledSegment};
pub use style::{StyleDescriptor, StyleResolver};
