use serde::{Deserialize, Serialize};

/// The category of a fatal failure. Anomalies at the parsing level are never represented
/// here because they are absorbed with best-effort defaults and only logged.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// The normalized document has no renderable (non-break) segment.
    EmptyDocument,
    /// The font or the input document cannot be read or parsed.
    ResourceUnavailable,
    /// The configuration file cannot be read or parsed.
    InvalidConfiguration,
    /// The canvas could not be drawn or encoded.
    Render,
}

/// A struct that represents an error with a context and possibly the propagated source error.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ContextError {
    pub kind: ErrorKind,
    pub context: String,
    pub source_error: Option<String>,
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source_error {
            Some(source_error) => write!(
                formatter,
                "{}: {}",
                self.context,
                minimize_first_letter(source_error.to_string()),
            ),
            None => write!(formatter, "{}", self.context),
        }
    }
}

impl std::error::Error for ContextError {}

impl ContextError {
    /// Create a new `ContextError` of the given kind with the given context.
    pub fn with_context<S: Into<String>>(kind: ErrorKind, context: S) -> ContextError {
        ContextError {
            kind,
            context: context.into(),
            source_error: None,
        }
    }

    /// Create a new `ContextError` of the given kind with the given context and source error.
    pub fn with_error<S: Into<String>>(
        kind: ErrorKind,
        context: S,
        error: &dyn std::error::Error,
    ) -> ContextError {
        ContextError {
            kind,
            context: context.into(),
            source_error: Some(error.to_string()),
        }
    }
}

/// Minimizes the first letter of a string, it is used for standardizing the error message.
fn minimize_first_letter(string: String) -> String {
    let mut characters = string.chars();
    match characters.next() {
        None => String::new(),
        Some(character) => character.to_lowercase().chain(characters).collect(),
    }
}
