#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! build-report library
//!
//! Human-oriented build reports for module bundlers. The library measures a
//! build folder before compilation, and after it prints gzip sizes with
//! deltas, the first compilation error, or every warning.
//!
//! # Basic Example
//!
//! Measuring a build folder and comparing a rebuilt file against it:
//!
//! ```
//! use build_report::delta::{DeltaLabel, DeltaTier};
//! use build_report::snapshot::SizeSnapshot;
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let build = TempDir::new().unwrap();
//! fs::write(build.path().join("main.1a2b3c4d.js"), "console.log('hello');").unwrap();
//!
//! let snapshot = SizeSnapshot::measure(build.path());
//! let previous = snapshot.size_of("main.js").unwrap();
//!
//! let label = DeltaLabel::between(previous + 60 * 1024, Some(previous)).unwrap();
//! assert_eq!(label.tier, DeltaTier::High);
//! ```
//!
//! # Advanced Example: Plugin Lifecycle
//!
//! Registering the plugin on a compiler and reporting a build:
//!
//! ```
//! use build_report::host::{Compiler, StatsPreset};
//! use build_report::plugin::BuildReportPlugin;
//! use build_report::stats::Stats;
//! use build_report::terminal::MemoryTerminal;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let terminal = MemoryTerminal::new();
//! let plugin = BuildReportPlugin::from_options(&json!({"verboseFonts": false}))
//!     .unwrap()
//!     .with_terminal(Arc::new(terminal.clone()));
//!
//! let mut compiler = Compiler::new("build").with_plugin(&plugin);
//! compiler
//!     .run(|_| Ok(Stats::from_json(r#"{"time": 900, "errors": ["Oops"]}"#)?))
//!     .unwrap();
//! compiler.close();
//!
//! assert_eq!(compiler.options.stats, StatsPreset::None);
//! let output = terminal.plain_output();
//! assert!(output.contains("Build errored in 0.9s"));
//! assert!(output.contains("Oops"));
//! ```

/// Command handlers for CLI operations
pub mod cmd;
/// Plugin options, schema validation and options files
pub mod config;
/// Size-delta labels and severity tiers
pub mod delta;
/// Error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Typed lifecycle events of the host bundler
pub mod host;
/// Infrastructure traits for filesystem and command execution
pub mod infra;
/// Compiler diagnostics cleanup
pub mod messages;
/// Hash-stripping of emitted file names
pub mod naming;
/// Log-once deduplication
pub mod once;
/// The build report plugin and its session state
pub mod plugin;
/// Post-build size report
pub mod report;
/// Gzip size snapshots of build folders
pub mod snapshot;
/// Bundler stats model and asset-tree flattening
pub mod stats;
/// Line-oriented console output
pub mod terminal;
