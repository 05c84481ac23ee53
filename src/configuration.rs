use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ContextError, ErrorKind};
use crate::layout::LayoutSpacing;
use crate::style::StyleTable;

/// The largest point size or spacing accepted from a configuration file, in pixels.
pub const MAXIMUM_DISTANCE: u32 = 1 << 16;

/// The tunable parameters of the engine. Every field has a default, so an empty JSON object
/// is a valid configuration.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    pub style_table: StyleTable,
    pub spacing: LayoutSpacing,
}

impl Configuration {
    pub fn from_path(configuration_file_path: &Path) -> Result<Self, ContextError> {
        let configuration_file_contents = std::fs::read_to_string(configuration_file_path)
            .map_err(|error| {
                ContextError::with_error(
                    ErrorKind::InvalidConfiguration,
                    format!(
                        "Failed to read the configuration file {:?}",
                        configuration_file_path
                    ),
                    &error,
                )
            })?;

        Self::from_json(&configuration_file_contents)
    }

    pub fn from_json(configuration_file_contents: &str) -> Result<Self, ContextError> {
        let configuration: Self =
            serde_json::from_str(configuration_file_contents).map_err(|error| {
                ContextError::with_error(
                    ErrorKind::InvalidConfiguration,
                    "Failed to parse the configuration file",
                    &error,
                )
            })?;
        configuration.validate()?;

        Ok(configuration)
    }

    /// Checks that every size and distance stays within `MAXIMUM_DISTANCE` pixels.
    pub fn validate(&self) -> Result<(), ContextError> {
        let StyleTable {
            title,
            subtitle,
            body,
            footnote,
            ..
        } = self.style_table;
        let LayoutSpacing {
            margin,
            line_padding,
            break_gap,
        } = self.spacing;
        let distances = [
            ("styleTable.title", title),
            ("styleTable.subtitle", subtitle),
            ("styleTable.body", body),
            ("styleTable.footnote", footnote),
            ("spacing.margin", margin),
            ("spacing.linePadding", line_padding),
            ("spacing.breakGap", break_gap),
        ];

        match distances
            .iter()
            .find(|(_, distance)| *distance > MAXIMUM_DISTANCE)
        {
            Some((field, distance)) => Err(ContextError::with_context(
                ErrorKind::InvalidConfiguration,
                format!(
                    "The configured {} of {} pixels exceeds the limit of {} pixels",
                    field, distance, MAXIMUM_DISTANCE
                ),
            )),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::SizeTieBreak;

    #[test]
    fn empty_objects_give_the_defaults() {
        assert_eq!(Configuration::from_json("{}").unwrap(), Configuration::default());
    }

    #[test]
    fn partial_overrides_keep_the_other_defaults() {
        let configuration = Configuration::from_json(
            r#"{ "styleTable": { "title": 36, "tieBreak": "prefer-smaller" }, "spacing": { "breakGap": 40 } }"#,
        )
        .unwrap();

        assert_eq!(configuration.style_table.title, 36);
        assert_eq!(configuration.style_table.body, 12);
        assert_eq!(configuration.style_table.tie_break, SizeTieBreak::PreferSmaller);
        assert_eq!(configuration.spacing.break_gap, 40);
        assert_eq!(configuration.spacing.margin, 10);
    }

    #[test]
    fn malformed_configurations_are_reported() {
        let error = Configuration::from_json("{ \"spacing\": 3 }").unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidConfiguration);

        let error = Configuration::from_path(Path::new("missing-configuration.json")).unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn oversized_distances_are_rejected() {
        let error =
            Configuration::from_json(r#"{ "spacing": { "margin": 3000000000 } }"#).unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidConfiguration);
        assert!(error.to_string().contains("spacing.margin"));

        let error = Configuration::from_json(r#"{ "styleTable": { "title": 70000 } }"#).unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidConfiguration);

        let configuration =
            Configuration::from_json(&format!(r#"{{ "spacing": {{ "breakGap": {} }} }}"#, MAXIMUM_DISTANCE))
                .unwrap();
        assert_eq!(configuration.spacing.break_gap, MAXIMUM_DISTANCE);
    }
}
