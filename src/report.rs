//! Post-build size report
//!
//! Lists every emitted script and stylesheet with its gzip size and the
//! change since the previous build, largest first, and suggests code
//! splitting when a script is over its recommended size.

use console::{measure_text_width, style};
use std::path::{Path, MAIN_SEPARATOR};

use crate::delta::DeltaLabel;
use crate::fmt::human_size;
use crate::infra::{FileSystem, RealFileSystem};
use crate::naming::remove_file_name_hash;
use crate::snapshot::{can_read_asset, gzip_size, SizeSnapshot};
use crate::stats::Stats;
use crate::terminal::Terminal;

/// Recommended gzip size of the main bundle.
pub const WARN_AFTER_BUNDLE_GZIP_SIZE: u64 = 512 * 1024;

/// Recommended gzip size of any other chunk.
pub const WARN_AFTER_CHUNK_GZIP_SIZE: u64 = 1024 * 1024;

/// Advisory size limits. A limit of zero disables the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportThresholds {
    /// Limit for files named `main.*`
    pub max_bundle_gzip_size: u64,
    /// Limit for every other file
    pub max_chunk_gzip_size: u64,
}

impl Default for ReportThresholds {
    fn default() -> Self {
        Self {
            max_bundle_gzip_size: WARN_AFTER_BUNDLE_GZIP_SIZE,
            max_chunk_gzip_size: WARN_AFTER_CHUNK_GZIP_SIZE,
        }
    }
}

impl ReportThresholds {
    /// Limit that applies to a file name.
    pub fn limit_for(&self, name: &str) -> u64 {
        if name.starts_with("main.") {
            self.max_bundle_gzip_size
        } else {
            self.max_chunk_gzip_size
        }
    }
}

/// One measured asset of the current build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Display folder: build folder name plus the asset's directory
    pub folder: String,
    /// File name without directories
    pub name: String,
    /// Gzip size in bytes
    pub size: u64,
    /// Change since the previous build, if any
    pub delta: Option<DeltaLabel>,
}

impl AssetRecord {
    /// `size (+delta)`, coloured.
    pub fn size_label(&self) -> String {
        match &self.delta {
            Some(delta) => format!("{} ({})", human_size(self.size as i64), delta),
            None => human_size(self.size as i64),
        }
    }

    /// Whether this is a script.
    pub fn is_script(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .is_some_and(|ext| ext == "js")
    }
}

/// A rendered line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRow {
    /// The measured asset
    pub record: AssetRecord,
    /// Size label right-padded to the widest label
    pub size_label: String,
    /// Over its recommended size
    pub is_large: bool,
}

/// The full size report of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeReport {
    /// Rows, largest asset first
    pub rows: Vec<AssetRow>,
    /// A script is over its recommended size
    pub suggest_bundle_splitting: bool,
}

impl SizeReport {
    /// Whether no asset was measured.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Print the rows and, if needed, the code-splitting advice.
    pub fn print(&self, terminal: &dyn Terminal) {
        for row in &self.rows {
            let size_label = if row.is_large {
                style(&row.size_label).yellow().to_string()
            } else {
                row.size_label.clone()
            };
            terminal.line(&format!(
                "  {}  {}{}",
                size_label,
                style(format!("{}{}", row.record.folder, MAIN_SEPARATOR)).dim(),
                style(&row.record.name).cyan()
            ));
        }

        if self.suggest_bundle_splitting {
            terminal.blank();
            terminal.line(
                &style("The bundle size is significantly larger than recommended.")
                    .yellow()
                    .to_string(),
            );
            terminal.line(
                &style("Consider reducing it with code splitting: https://create-react-app.dev/docs/code-splitting/")
                    .yellow()
                    .to_string(),
            );
            terminal.line(
                &style("You can also analyze the project dependencies: https://create-react-app.dev/docs/analyzing-the-bundle-size/")
                    .yellow()
                    .to_string(),
            );
        }
    }
}

/// Measures the assets of a finished build and lays out the report.
///
/// # Examples
///
/// ```no_run
/// use build_report::report::ReportRenderer;
/// use build_report::snapshot::SizeSnapshot;
/// use build_report::stats::Stats;
/// use build_report::terminal::StdoutTerminal;
/// use std::path::Path;
///
/// let build = Path::new("build");
/// let previous = SizeSnapshot::measure(build);
/// // ... run the bundler ...
/// let stats = Stats::from_file(Path::new("build/stats.json"))?;
///
/// let report = ReportRenderer::new().render(&stats, &previous, build);
/// report.print(&StdoutTerminal);
/// # Ok::<(), build_report::error::ReportError>(())
/// ```
pub struct ReportRenderer<FS: FileSystem = RealFileSystem> {
    fs: FS,
    thresholds: ReportThresholds,
}

impl ReportRenderer<RealFileSystem> {
    /// Renderer on the real filesystem with default thresholds
    pub fn new() -> Self {
        Self::with_fs(RealFileSystem)
    }
}

impl Default for ReportRenderer<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<FS: FileSystem> ReportRenderer<FS> {
    /// Renderer with a custom filesystem implementation
    pub fn with_fs(fs: FS) -> Self {
        Self {
            fs,
            thresholds: ReportThresholds::default(),
        }
    }

    /// Use other advisory limits.
    pub fn with_thresholds(mut self, thresholds: ReportThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Active advisory limits.
    pub fn thresholds(&self) -> ReportThresholds {
        self.thresholds
    }

    /// Measure every reportable asset of `stats`.
    ///
    /// Assets are read from the snapshot's root. Assets the compiler
    /// declared but never wrote (for example after a partial failure) are
    /// skipped.
    pub fn collect_assets(
        &self,
        stats: &Stats,
        previous: &SizeSnapshot,
        build_folder: &Path,
    ) -> Vec<AssetRecord> {
        let root = previous.root();
        let folder_name = build_folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| build_folder.display().to_string());

        let mut records = Vec::new();
        for asset in stats.assets() {
            if !can_read_asset(&asset.name) {
                continue;
            }

            let path = root.join(&asset.name);
            if !self.fs.is_file(&path) {
                log::debug!("{} was not emitted, leaving it out of the report", asset.name);
                continue;
            }

            let size = match self.fs.read(&path).and_then(|contents| gzip_size(&contents)) {
                Ok(size) => size,
                Err(e) => {
                    log::warn!("Could not measure {}: {}", path.display(), e);
                    continue;
                }
            };

            let key = remove_file_name_hash(root, Path::new(&asset.name));
            let delta = DeltaLabel::between(size, previous.size_of(&key));

            let asset_path = Path::new(&asset.name);
            let folder = match asset_path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => {
                    Path::new(&folder_name).join(dir).display().to_string()
                }
                _ => folder_name.clone(),
            };
            let name = asset_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| asset.name.clone());

            records.push(AssetRecord {
                folder,
                name,
                size,
                delta,
            });
        }
        records
    }

    /// Measure, sort and align the report for a finished build.
    pub fn render(&self, stats: &Stats, previous: &SizeSnapshot, build_folder: &Path) -> SizeReport {
        self.layout(self.collect_assets(stats, previous, build_folder))
    }

    /// Sort records largest first, pad labels and flag oversized scripts.
    pub fn layout(&self, mut records: Vec<AssetRecord>) -> SizeReport {
        records.sort_by(|a, b| b.size.cmp(&a.size));

        let labels: Vec<String> = records.iter().map(|r| r.size_label()).collect();
        let longest = labels
            .iter()
            .map(|l| measure_text_width(l))
            .max()
            .unwrap_or(0);

        let mut suggest_bundle_splitting = false;
        let rows = records
            .into_iter()
            .zip(labels)
            .map(|(record, mut size_label)| {
                let width = measure_text_width(&size_label);
                if width < longest {
                    size_label.push_str(&" ".repeat(longest - width));
                }

                let limit = self.thresholds.limit_for(&record.name);
                let is_large = limit > 0 && record.size > limit;
                if is_large && record.is_script() {
                    suggest_bundle_splitting = true;
                }

                AssetRow {
                    record,
                    size_label,
                    is_large,
                }
            })
            .collect();

        SizeReport {
            rows,
            suggest_bundle_splitting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{AssetNode, BuildStats};
    use crate::terminal::MemoryTerminal;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn record(name: &str, size: u64) -> AssetRecord {
        AssetRecord {
            folder: "build/static/js".to_string(),
            name: name.to_string(),
            size,
            delta: None,
        }
    }

    #[test]
    fn test_layout_sorts_by_size_descending() {
        let report = ReportRenderer::new().layout(vec![
            record("a.js", 500),
            record("b.js", 1500),
            record("c.js", 200),
        ]);

        let sizes: Vec<u64> = report.rows.iter().map(|r| r.record.size).collect();
        assert_eq!(sizes, [1500, 500, 200]);
    }

    #[test]
    fn test_layout_pads_labels_to_same_width() {
        let mut grown = record("a.js", 2048);
        grown.delta = DeltaLabel::between(2048, Some(1024));
        let report = ReportRenderer::new().layout(vec![grown, record("b.js", 10)]);

        let widths: Vec<usize> = report
            .rows
            .iter()
            .map(|r| measure_text_width(&r.size_label))
            .collect();
        assert_eq!(widths[0], widths[1]);
        assert_eq!(console::strip_ansi_codes(&report.rows[0].size_label), "2 KB (+1 KB)");
        assert_eq!(report.rows[1].size_label, "10 B        ");
    }

    #[test]
    fn test_main_bundle_uses_bundle_threshold() {
        let thresholds = ReportThresholds {
            max_bundle_gzip_size: 100,
            max_chunk_gzip_size: 1000,
        };
        let report = ReportRenderer::new()
            .with_thresholds(thresholds)
            .layout(vec![record("main.abc.js", 500), record("vendor.js", 500)]);

        let main = report.rows.iter().find(|r| r.record.name == "main.abc.js").unwrap();
        let vendor = report.rows.iter().find(|r| r.record.name == "vendor.js").unwrap();
        assert!(main.is_large);
        assert!(!vendor.is_large);
        assert!(report.suggest_bundle_splitting);
    }

    #[test]
    fn test_oversized_stylesheet_does_not_suggest_splitting() {
        let thresholds = ReportThresholds {
            max_bundle_gzip_size: 100,
            max_chunk_gzip_size: 100,
        };
        let report = ReportRenderer::new()
            .with_thresholds(thresholds)
            .layout(vec![record("main.css", 500)]);

        assert!(report.rows[0].is_large);
        assert!(!report.suggest_bundle_splitting);
    }

    #[test]
    fn test_zero_threshold_disables_check() {
        let thresholds = ReportThresholds {
            max_bundle_gzip_size: 0,
            max_chunk_gzip_size: 0,
        };
        let report = ReportRenderer::new()
            .with_thresholds(thresholds)
            .layout(vec![record("main.js", u64::MAX / 2)]);
        assert!(!report.rows[0].is_large);
    }

    #[test]
    fn test_render_skips_unemitted_and_non_reportable_assets() {
        let temp_dir = TempDir::new().unwrap();
        let build = temp_dir.path().join("build");
        fs::create_dir_all(build.join("static/js")).unwrap();
        fs::write(build.join("static/js/main.abc123.js"), "x".repeat(2000)).unwrap();
        fs::write(build.join("logo.svg"), "<svg/>").unwrap();

        let stats: Stats = BuildStats {
            assets: vec![
                AssetNode::file("static/js/main.abc123.js", true),
                AssetNode::file("static/js/missing.def456.js", false),
                AssetNode::file("logo.svg", true),
            ],
            ..Default::default()
        }
        .into();

        let previous = SizeSnapshot::empty(&build);
        let report = ReportRenderer::new().render(&stats, &previous, &build);

        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.record.name, "main.abc123.js");
        assert_eq!(row.record.folder, Path::new("build").join("static/js").display().to_string());
        assert!(row.record.delta.is_none());
    }

    #[test]
    fn test_render_computes_delta_against_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let build = temp_dir.path().join("build");
        fs::create_dir_all(&build).unwrap();
        fs::write(build.join("main.9f8e7d.js"), "x".repeat(100)).unwrap();

        let mut sizes = BTreeMap::new();
        sizes.insert("main.js".to_string(), 5000);
        let previous = SizeSnapshot::from_sizes(&build, sizes);

        let stats: Stats = BuildStats {
            assets: vec![AssetNode::file("main.9f8e7d.js", true)],
            ..Default::default()
        }
        .into();

        let report = ReportRenderer::new().render(&stats, &previous, &build);
        let delta = report.rows[0].record.delta.as_ref().unwrap();
        assert_eq!(delta.tier, crate::delta::DeltaTier::Improved);
        assert_eq!(report.rows[0].record.folder, "build");
    }

    #[test]
    fn test_folder_without_final_component_is_shown_as_given() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("static/js")).unwrap();
        fs::write(temp_dir.path().join("main.1a2b3c.js"), "x".repeat(300)).unwrap();
        fs::write(temp_dir.path().join("static/js/2.4d5e6f.chunk.js"), "y".repeat(300)).unwrap();

        let stats: Stats = BuildStats {
            assets: vec![
                AssetNode::file("main.1a2b3c.js", true),
                AssetNode::file("static/js/2.4d5e6f.chunk.js", true),
            ],
            ..Default::default()
        }
        .into();

        let previous = SizeSnapshot::empty(temp_dir.path());
        let records = ReportRenderer::new().collect_assets(&stats, &previous, Path::new("."));

        let mut folders: Vec<&str> = records.iter().map(|r| r.folder.as_str()).collect();
        folders.sort_unstable();
        assert_eq!(folders[0], ".");
        assert_eq!(Path::new(folders[1]), Path::new("./static/js"));

        let terminal = MemoryTerminal::new();
        ReportRenderer::new().layout(records).print(&terminal);
        assert!(!terminal.plain_output().contains(" /main.1a2b3c.js"));
    }

    #[test]
    fn test_empty_stats_yield_empty_report() {
        let temp_dir = TempDir::new().unwrap();
        let stats: Stats = BuildStats::default().into();
        let report = ReportRenderer::new().render(
            &stats,
            &SizeSnapshot::empty(temp_dir.path()),
            temp_dir.path(),
        );

        assert!(report.is_empty());
        let terminal = MemoryTerminal::new();
        report.print(&terminal);
        assert_eq!(terminal.write_count(), 0);
    }

    #[test]
    fn test_print_includes_splitting_advice() {
        let thresholds = ReportThresholds {
            max_bundle_gzip_size: 1,
            max_chunk_gzip_size: 1,
        };
        let report = ReportRenderer::new()
            .with_thresholds(thresholds)
            .layout(vec![record("main.js", 10)]);

        let terminal = MemoryTerminal::new();
        report.print(&terminal);

        let output = terminal.plain_output();
        assert!(output.contains("main.js"));
        assert!(output.contains("build/static/js"));
        assert!(output.contains("significantly larger than recommended"));
        assert!(output.contains("code splitting"));
    }
}
