//! Error types with contextual suggestions
//!
//! Most failure modes of a build report are recovered locally: a missing
//! build folder becomes an empty snapshot, compiler errors are printed rather
//! than raised. What remains is surfaced through [`ReportError`]:
//! - invalid plugin options (fatal at construction)
//! - unreadable or malformed stats and options files
//! - a failed external build command and errored builds, for CLI exit codes
//!
//! # Examples
//!
//! ```
//! use build_report::config::PluginOptions;
//! use build_report::error::ReportError;
//! use serde_json::json;
//!
//! let err = PluginOptions::from_value(&json!({"verboseFonts": "yes"})).unwrap_err();
//! assert!(matches!(err, ReportError::InvalidOptions { .. }));
//! assert!(err.to_string().contains("options.verboseFonts should be a boolean."));
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ValidationIssue;

/// build-report errors
#[derive(Error, Debug)]
pub enum ReportError {
    /// Options object does not match the declared schema
    #[error("{}", render_invalid_options(.plugin, .issues))]
    InvalidOptions {
        /// Name of the component being constructed
        plugin: String,
        /// Every schema violation found, path-qualified
        issues: Vec<ValidationIssue>,
    },

    /// Options file could not be parsed
    #[error("Failed to parse options file {path}: {message}")]
    OptionsParse {
        /// Path to the options file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Stats JSON could not be parsed
    #[error("Failed to parse bundler stats from {origin}")]
    InvalidStats {
        /// File the stats came from
        origin: String,
        #[source]
        /// JSON error source
        source: serde_json::Error,
    },

    /// External build command exited unsuccessfully
    #[error("Build command failed: {command}")]
    BuildCommandFailed {
        /// Command line that was run
        command: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
    },

    /// One or more reported builds had compilation errors
    #[error("{errored} of {total} builds errored")]
    BuildsErrored {
        /// Number of failed builds
        errored: usize,
        /// Number of reported builds
        total: usize,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

fn render_invalid_options(plugin: &str, issues: &[ValidationIssue]) -> String {
    let mut message = format!(
        "Invalid options object. {} has been initialized using an options object that does not match the API schema.",
        plugin
    );
    for issue in issues {
        message.push_str(&format!("\n - {}", issue.message));
    }
    message
}

impl ReportError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_report::error::ReportError;
    ///
    /// let error = ReportError::BuildCommandFailed {
    ///     command: "npm run build".to_string(),
    ///     code: Some(2),
    /// };
    /// assert!(error.suggestion().unwrap().contains("npm run build"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::InvalidOptions { issues, .. } => {
                let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
                Some(format!(
                    "Check the value of: {}\nSupported options: verboseFonts (boolean), verboseImages (boolean)",
                    fields.join(", ")
                ))
            }
            Self::OptionsParse { path, .. } => Some(format!(
                "Fix the syntax of {} (JSON or TOML, chosen by extension)",
                path.display()
            )),
            Self::InvalidStats { .. } => Some(
                "Write stats with your bundler's JSON stats output (for example `webpack --json`)"
                    .to_string(),
            ),
            Self::BuildCommandFailed { command, code } => Some(match code {
                Some(code) => format!("`{}` exited with status {}; see its output above", command, code),
                None => format!("`{}` was terminated by a signal", command),
            }),
            Self::BuildsErrored { .. } => {
                Some("Fix the compilation errors printed above".to_string())
            }
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get documentation URL for this error.
    pub fn docs_url(&self) -> Option<&str> {
        match self {
            Self::InvalidStats { .. } => Some("https://webpack.js.org/api/stats/"),
            _ => None,
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Follows sysexits.h conventions where one applies.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_report::error::ReportError;
    ///
    /// let error = ReportError::BuildsErrored { errored: 1, total: 2 };
    /// assert_eq!(error.exit_code(), 1);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidOptions { .. } => 78, // EX_CONFIG
            Self::OptionsParse { .. } => 78,   // EX_CONFIG
            Self::InvalidStats { .. } => 65,   // EX_DATAERR
            Self::BuildCommandFailed { code, .. } => code.unwrap_or(1).clamp(1, 255),
            Self::BuildsErrored { .. } => 1,
            Self::Io { .. } => 74, // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with suggestions and documentation links
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        // Error chain (caused by)
        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(report_error) = error.downcast_ref::<ReportError>() {
            if let Some(suggestion) = report_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }

            if let Some(docs) = report_error.docs_url() {
                output.push_str(&format!("{} {}\n", style("docs:").blue(), docs));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(report_error) = error.downcast_ref::<ReportError>() {
            report_error.exit_code()
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_options() -> ReportError {
        ReportError::InvalidOptions {
            plugin: "BuildReportPlugin".to_string(),
            issues: vec![
                ValidationIssue::error("options.verboseFonts", "options.verboseFonts should be a boolean."),
                ValidationIssue::error("options.verboseImages", "options.verboseImages should be a boolean."),
            ],
        }
    }

    #[test]
    fn test_invalid_options_lists_every_issue() {
        let message = invalid_options().to_string();
        assert!(message.starts_with("Invalid options object. BuildReportPlugin"));
        assert!(message.contains("\n - options.verboseFonts should be a boolean."));
        assert!(message.contains("\n - options.verboseImages should be a boolean."));
    }

    #[test]
    fn test_invalid_options_suggestion_names_fields() {
        let suggestion = invalid_options().suggestion().unwrap();
        assert!(suggestion.contains("options.verboseFonts"));
        assert!(suggestion.contains("options.verboseImages"));
    }

    #[test]
    fn test_build_command_exit_code_is_propagated() {
        let err = ReportError::BuildCommandFailed {
            command: "make".to_string(),
            code: Some(3),
        };
        assert_eq!(err.exit_code(), 3);

        let signalled = ReportError::BuildCommandFailed {
            command: "make".to_string(),
            code: None,
        };
        assert_eq!(signalled.exit_code(), 1);
        assert!(signalled.suggestion().unwrap().contains("signal"));
    }

    #[test]
    fn test_all_error_variants_have_exit_codes_and_suggestions() {
        let errors = vec![
            invalid_options(),
            ReportError::OptionsParse {
                path: PathBuf::from("opts.toml"),
                message: "bad".to_string(),
            },
            ReportError::InvalidStats {
                origin: "stats.json".to_string(),
                source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
            },
            ReportError::BuildCommandFailed {
                command: "npm run build".to_string(),
                code: Some(1),
            },
            ReportError::BuildsErrored {
                errored: 1,
                total: 1,
            },
            ReportError::Io {
                context: "reading stats".to_string(),
                source: std::io::Error::other("test"),
            },
        ];

        for err in &errors {
            let code = err.exit_code();
            assert!(code > 0 && code < 256, "{:?} has bad exit code", err);
            assert!(err.suggestion().is_some(), "{:?} has no suggestion", err);
        }
    }

    #[test]
    fn test_formatter_includes_help_and_chain() {
        let err = anyhow::Error::new(ReportError::InvalidStats {
            origin: "stats.json".to_string(),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        });

        let output = ErrorFormatter::format(&err);
        assert!(output.contains("stats.json"));
        assert!(output.contains("caused by:"));
        assert!(output.contains("help:"));
        assert_eq!(ErrorFormatter::exit_code(&err), 65);
    }

    #[test]
    fn test_formatter_plain_anyhow_error_exits_one() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(ErrorFormatter::exit_code(&err), 1);
        assert!(ErrorFormatter::format(&err).contains("something else"));
    }
}
