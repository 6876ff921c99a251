//! Infrastructure traits for abstracting I/O operations.
//!
//! The measurer and the renderer only ever read from the build folder, and
//! the CLI only ever spawns the user's build command. Both sit behind traits
//! so tests and embedders can swap in another implementation.

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use walkdir::WalkDir;

/// Trait for abstracting read-only filesystem operations.
pub trait FileSystem {
    /// Read the entire contents of a file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Get metadata for a file or directory.
    fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// List every regular file below `root`, recursively.
    ///
    /// Fails if `root` itself cannot be read (missing, not a directory,
    /// permission denied).
    fn list_files_recursive(&self, root: &Path) -> io::Result<Vec<PathBuf>>;

    /// Whether a regular file is present at `path`.
    fn is_file(&self, path: &Path) -> bool {
        self.metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }
}

/// Real filesystem implementation that delegates to std::fs and walkdir.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        std::fs::metadata(path)
    }

    fn list_files_recursive(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        // walkdir reports a missing root as an error on the first entry;
        // check up front so the caller sees a plain NotFound.
        if !std::fs::metadata(root)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", root.display()),
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

/// Trait for abstracting command execution.
pub trait CommandExecutor {
    /// Run a command to completion, inheriting stdio, and return its status.
    fn status(&self, cmd: &mut Command) -> io::Result<ExitStatus>;
}

/// Real command executor that delegates to std::process::Command.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealCommandExecutor;

impl CommandExecutor for RealCommandExecutor {
    fn status(&self, cmd: &mut Command) -> io::Result<ExitStatus> {
        cmd.status()
    }
}

/// Create an ExitStatus with the given exit code for use in test mocks.
#[cfg(all(test, unix))]
pub fn mock_exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(all(test, windows))]
pub fn mock_exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}
