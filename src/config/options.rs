//! Plugin options and their schema
//!
//! The schema is deliberately shallow: an object whose declared properties,
//! when present, are booleans. Undeclared properties are accepted and only
//! reported as warnings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validator::{ValidationIssue, ValidationResult};
use crate::error::ReportError;

/// Name used in schema error messages
pub const PLUGIN_NAME: &str = "BuildReportPlugin";

/// Declared boolean properties of the options object
pub const BOOLEAN_OPTIONS: [&str; 2] = ["verboseFonts", "verboseImages"];

/// Options accepted by the report plugin.
///
/// Both listing switches are accepted and validated but do not change what
/// the report prints yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginOptions {
    /// List emitted font files individually
    pub verbose_fonts: bool,
    /// List emitted image files individually
    pub verbose_images: bool,
}

impl PluginOptions {
    /// Validate a raw options value against the schema and convert it.
    ///
    /// `null` stands for "no options" and yields the defaults. Any schema
    /// violation fails with [`ReportError::InvalidOptions`] listing every
    /// offending path.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_report::config::PluginOptions;
    /// use serde_json::json;
    ///
    /// let options = PluginOptions::from_value(&json!({"verboseImages": true})).unwrap();
    /// assert!(options.verbose_images);
    /// assert!(!options.verbose_fonts);
    ///
    /// assert!(PluginOptions::from_value(&json!([true])).is_err());
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, ReportError> {
        if value.is_null() {
            return Ok(Self::default());
        }

        let result = validate_options(value);
        for warning in result.warnings() {
            log::warn!("{}", warning.message);
        }
        if !result.valid {
            return Err(ReportError::InvalidOptions {
                plugin: PLUGIN_NAME.to_string(),
                issues: result.into_errors(),
            });
        }

        serde_json::from_value(value.clone()).map_err(|e| ReportError::InvalidOptions {
            plugin: PLUGIN_NAME.to_string(),
            issues: vec![ValidationIssue::error("options", format!("options {}", e))],
        })
    }
}

/// Check an options value against the schema.
pub fn validate_options(value: &Value) -> ValidationResult {
    let mut result = ValidationResult::success();

    let Some(object) = value.as_object() else {
        result.add_issue(ValidationIssue::error(
            "options",
            format!(
                "options should be an object:\n   object {{ {} }}",
                BOOLEAN_OPTIONS
                    .iter()
                    .map(|name| format!("{}?", name))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ));
        return result;
    };

    for name in BOOLEAN_OPTIONS {
        if let Some(property) = object.get(name) {
            if !property.is_boolean() {
                let path = format!("options.{}", name);
                result.add_issue(ValidationIssue::error(
                    path.clone(),
                    format!("{} should be a boolean.", path),
                ));
            }
        }
    }

    for key in object.keys() {
        if !BOOLEAN_OPTIONS.contains(&key.as_str()) {
            let path = format!("options.{}", key);
            result.add_issue(ValidationIssue::warning(
                path.clone(),
                format!("{} is not a known option and will be ignored.", path),
            ));
        }
    }

    result
}
