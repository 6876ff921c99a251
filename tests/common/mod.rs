//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - build folder and stats file fixtures
//! - assertion helpers for captured terminal output
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::fixtures;
//!
//! fn test_report() {
//!     let (_dir, build) = fixtures::create_build_folder(&[("main.js", b"1")]).unwrap();
//! }
//! ```

pub mod assertions;
pub mod fixtures;
