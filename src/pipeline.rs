use std::path::Path;

use crate::configuration::Configuration;
use crate::error::{ContextError, ErrorKind};
use crate::font::MetricsProvider;
use crate::layout::{LayoutEngine, LayoutPlan};
use crate::normalizer::Dialect;
use crate::segment::StyledSegment;
use crate::style::StyleResolver;

/// Runs a document through normalization and layout. The dialect is the only decision point
/// and it is taken once, before any line is parsed.
pub struct Pipeline<'a, M: MetricsProvider + ?Sized> {
    style_resolver: StyleResolver,
    layout_engine: LayoutEngine,
    metrics_provider: &'a M,
}

impl<'a, M: MetricsProvider + ?Sized> Pipeline<'a, M> {
    pub fn new(configuration: &Configuration, metrics_provider: &'a M) -> Self {
        Pipeline {
            style_resolver: StyleResolver::new(configuration.style_table),
            layout_engine: LayoutEngine::new(configuration.spacing),
            metrics_provider,
        }
    }

    pub fn style_resolver(&self) -> &StyleResolver {
        &self.style_resolver
    }

    pub fn normalize(&self, dialect: Dialect, source: &str) -> Vec<StyledSegment> {
        let segments = dialect.normalizer(self.style_resolver).normalize(source);
        log::debug!("Normalized the {:?} document into {} segments", dialect, segments.len());

        segments
    }

    pub fn layout(
        &self,
        segments: &[StyledSegment],
        canvas_hint_width: Option<u32>,
    ) -> Result<LayoutPlan, ContextError> {
        self.layout_engine.compute(
            segments,
            &self.style_resolver,
            self.metrics_provider,
            canvas_hint_width,
        )
    }

    /// Normalizes and lays out a document held in memory.
    pub fn run(
        &self,
        dialect: Dialect,
        source: &str,
        canvas_hint_width: Option<u32>,
    ) -> Result<LayoutPlan, ContextError> {
        let segments = self.normalize(dialect, source);
        self.layout(&segments, canvas_hint_width)
    }

    /// Reads a document from disk, then normalizes and lays it out. Bytes which are not valid
    /// UTF-8 are replaced rather than rejected.
    pub fn run_file(
        &self,
        dialect: Dialect,
        document_path: &Path,
        canvas_hint_width: Option<u32>,
    ) -> Result<LayoutPlan, ContextError> {
        let document_bytes = std::fs::read(document_path).map_err(|error| {
            ContextError::with_error(
                ErrorKind::ResourceUnavailable,
                format!("Failed to read the document {:?}", document_path),
                &error,
            )
        })?;
        let source = String::from_utf8_lossy(&document_bytes);

        self.run(dialect, &source, canvas_hint_width)
    }
}
