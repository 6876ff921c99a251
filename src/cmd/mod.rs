//! Command handlers for the build-report CLI
//!
//! Each submodule handles one subcommand.

pub mod measure;
pub mod run;

pub use measure::cmd_measure;
pub use run::{cmd_run, RunArgs};
