//! Plugin configuration
//!
//! This module provides:
//! - the options object accepted by the report plugin and its schema
//! - path-qualified validation issues
//! - loading options from `.json` / `.toml` files

pub mod loader;
pub mod options;
pub mod validator;

pub use loader::{OptionsLoader, OPTIONS_FILE_NAME};
pub use options::{validate_options, PluginOptions, PLUGIN_NAME};
pub use validator::{ValidationIssue, ValidationResult, ValidationSeverity};
