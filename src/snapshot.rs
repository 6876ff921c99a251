//! Gzip size snapshots of a build folder
//!
//! A snapshot is taken before each compilation so the report printed after it
//! can show how much every script and stylesheet grew or shrank.

use crate::infra::{FileSystem, RealFileSystem};
use crate::naming::remove_file_name_hash;
use flate2::write::GzEncoder;
use flate2::Compression;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static MEASURED_EXTENSION_RE: OnceLock<Regex> = OnceLock::new();
static PRECACHE_MANIFEST_RE: OnceLock<Regex> = OnceLock::new();

/// Whether a file takes part in size reporting.
///
/// Only scripts and stylesheets are measured. The service worker and its
/// versioned precache manifest are generated per build and excluded.
///
/// # Examples
///
/// ```
/// use build_report::snapshot::can_read_asset;
///
/// assert!(can_read_asset("static/js/main.abc123.js"));
/// assert!(can_read_asset("static/css/main.css"));
/// assert!(!can_read_asset("service-worker.js"));
/// assert!(!can_read_asset("precache-manifest.0a1b2c.js"));
/// assert!(!can_read_asset("logo.svg"));
/// ```
#[allow(clippy::unwrap_used)]
pub fn can_read_asset(name: &str) -> bool {
    let measured = MEASURED_EXTENSION_RE.get_or_init(|| Regex::new(r"\.(js|css)$").unwrap());
    let precache =
        PRECACHE_MANIFEST_RE.get_or_init(|| Regex::new(r"precache-manifest\.[0-9a-f]+\.js").unwrap());

    measured.is_match(name) && !name.contains("service-worker.js") && !precache.is_match(name)
}

/// Size of `contents` after gzip at the best compression level.
pub fn gzip_size(contents: &[u8]) -> io::Result<u64> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(contents)?;
    let compressed = encoder.finish()?;
    Ok(compressed.len() as u64)
}

/// Gzip sizes of a build folder, keyed by hash-stripped file name.
///
/// Once captured a snapshot is never modified; the next compilation replaces
/// it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeSnapshot {
    root: PathBuf,
    sizes: BTreeMap<String, u64>,
}

impl SizeSnapshot {
    /// An empty snapshot for `root`, used before the first build.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sizes: BTreeMap::new(),
        }
    }

    /// Build a snapshot from already-normalized keys.
    pub fn from_sizes(root: impl Into<PathBuf>, sizes: BTreeMap<String, u64>) -> Self {
        Self {
            root: root.into(),
            sizes,
        }
    }

    /// Measure `build_folder` on the real filesystem.
    ///
    /// See [`SizeSnapshot::measure_with_fs`].
    pub fn measure(build_folder: &Path) -> Self {
        Self::measure_with_fs(build_folder, &RealFileSystem)
    }

    /// Measure every reportable file below `build_folder`.
    ///
    /// A folder that is missing or cannot be listed yields an empty snapshot:
    /// before the first build there is simply nothing to compare against.
    /// Individual files that cannot be read are skipped.
    pub fn measure_with_fs<FS: FileSystem>(build_folder: &Path, fs: &FS) -> Self {
        log::debug!("Measuring file sizes in {}", build_folder.display());

        let files = match fs.list_files_recursive(build_folder) {
            Ok(files) => files,
            Err(e) => {
                log::debug!(
                    "No previous build at {} ({}), starting from an empty snapshot",
                    build_folder.display(),
                    e
                );
                return Self::empty(build_folder);
            }
        };

        let mut sizes = BTreeMap::new();
        for file in files {
            if !can_read_asset(&file.to_string_lossy()) {
                continue;
            }

            let size = match fs.read(&file).and_then(|contents| gzip_size(&contents)) {
                Ok(size) => size,
                Err(e) => {
                    log::warn!("Skipping {}: {}", file.display(), e);
                    continue;
                }
            };

            let key = remove_file_name_hash(build_folder, &file);
            log::trace!("{} -> {} bytes gzipped", key, size);
            sizes.insert(key, size);
        }

        log::debug!("Snapshot holds {} files", sizes.len());
        Self::from_sizes(build_folder, sizes)
    }

    /// Build folder the snapshot was taken from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Previous gzip size of a hash-stripped name.
    pub fn size_of(&self, key: &str) -> Option<u64> {
        self.sizes.get(key).copied()
    }

    /// All measured sizes, ordered by key.
    pub fn sizes(&self) -> &BTreeMap<String, u64> {
        &self.sizes
    }

    /// Number of measured files.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether nothing was measured.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_gzip_size_compresses_repetitive_content() {
        let contents = "a".repeat(10_000);
        let size = gzip_size(contents.as_bytes()).unwrap();
        assert!(size > 0);
        assert!(size < 200);
    }

    #[test]
    fn test_gzip_size_of_empty_input_is_header_only() {
        // gzip header + trailer, no payload
        assert!(gzip_size(b"").unwrap() > 0);
    }

    #[test]
    fn test_can_read_asset_filters_extensions() {
        assert!(can_read_asset("main.js"));
        assert!(can_read_asset("main.css"));
        assert!(!can_read_asset("main.js.map"));
        assert!(!can_read_asset("main.css.map"));
        assert!(!can_read_asset("fonts/icons.woff2"));
    }

    #[test]
    fn test_can_read_asset_excludes_service_worker_files() {
        assert!(!can_read_asset("/app/build/service-worker.js"));
        assert!(!can_read_asset("precache-manifest.9f8e7d.js"));
        assert!(can_read_asset("precache-manifest.js"));
    }

    #[test]
    fn test_measure_missing_folder_yields_empty_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("build");

        let snapshot = SizeSnapshot::measure(&missing);

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.root(), missing.as_path());
    }

    #[test]
    fn test_measure_keys_by_hash_stripped_name() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("static/js")).unwrap();
        fs::create_dir_all(root.join("static/css")).unwrap();
        fs::write(root.join("static/js/main.1a2b3c4d.js"), "x".repeat(400)).unwrap();
        fs::write(root.join("static/css/main.99aa88.chunk.css"), "body{}").unwrap();
        fs::write(root.join("index.html"), "<html></html>").unwrap();
        fs::write(root.join("service-worker.js"), "self").unwrap();

        let snapshot = SizeSnapshot::measure(root);

        assert_eq!(snapshot.len(), 2);
        let js = snapshot.size_of("static/js/main.js").unwrap();
        assert_eq!(js, gzip_size("x".repeat(400).as_bytes()).unwrap());
        assert!(snapshot.size_of("static/css/main.css").is_some());
        assert!(snapshot.size_of("index.html").is_none());
    }

    #[test]
    fn test_from_sizes_round_trips_lookups() {
        let mut sizes = BTreeMap::new();
        sizes.insert("main.js".to_string(), 1000);
        let snapshot = SizeSnapshot::from_sizes("/build", sizes);

        assert_eq!(snapshot.size_of("main.js"), Some(1000));
        assert_eq!(snapshot.size_of("other.js"), None);
        assert_eq!(snapshot.sizes().len(), 1);
    }
}
