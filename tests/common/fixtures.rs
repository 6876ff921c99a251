//! Test fixture helpers for build folders and bundler stats

#![allow(dead_code)]

use build_report::plugin::BuildReportPlugin;
use build_report::terminal::MemoryTerminal;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Re-export anyhow for convenience
pub use anyhow;

/// Creates a `build` folder inside a fresh temp dir holding `files`.
///
/// File names may contain `/` to create nested folders.
///
/// # Returns
///
/// A tuple of (TempDir, PathBuf to the build folder) - the TempDir must be kept alive
pub fn create_build_folder(files: &[(&str, &[u8])]) -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let build = temp_dir.path().join("build");
    fs::create_dir_all(&build)?;
    for (name, contents) in files {
        write_asset(&build, name, contents)?;
    }
    Ok((temp_dir, build))
}

/// Write one asset below `build`, creating parent folders.
pub fn write_asset(build: &Path, name: &str, contents: &[u8]) -> anyhow::Result<PathBuf> {
    let path = build.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    Ok(path)
}

/// Write `stats` as JSON to `dir/stats.json`.
pub fn write_stats(dir: &Path, stats: &serde_json::Value) -> anyhow::Result<PathBuf> {
    let path = dir.join("stats.json");
    fs::write(&path, serde_json::to_string_pretty(stats)?)?;
    Ok(path)
}

/// Bytes gzip cannot shrink, so their gzip size is close to `len`.
///
/// Deterministic xorshift output.
pub fn incompressible_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

/// Plugin with default options writing into a fresh memory terminal.
pub fn memory_plugin() -> (BuildReportPlugin, MemoryTerminal) {
    let terminal = MemoryTerminal::new();
    let plugin = BuildReportPlugin::new().with_terminal(Arc::new(terminal.clone()));
    (plugin, terminal)
}
