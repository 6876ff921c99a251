//! Measure command implementation
//!
//! Prints the gzip sizes `build-report run` would compare against, without
//! running a build.

use anyhow::Result;
use console::{measure_text_width, style};
use std::path::Path;

use crate::error::ReportError;
use crate::fmt::{human_size, CHART};
use crate::infra::{FileSystem, RealFileSystem};
use crate::snapshot::SizeSnapshot;
use crate::terminal::{StdoutTerminal, Terminal};

/// Print the size snapshot of `dir`, largest file first.
///
/// # Examples
///
/// ```no_run
/// use build_report::cmd::measure::cmd_measure;
/// use std::path::Path;
///
/// cmd_measure(Path::new("build"))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if `dir` does not exist.
pub fn cmd_measure(dir: &Path) -> Result<()> {
    cmd_measure_with(dir, &RealFileSystem, &StdoutTerminal)
}

/// [`cmd_measure`] with injected filesystem and terminal.
pub fn cmd_measure_with<FS: FileSystem>(
    dir: &Path,
    fs: &FS,
    terminal: &dyn Terminal,
) -> Result<()> {
    fs.metadata(dir).map_err(|source| ReportError::Io {
        context: format!("reading build folder {}", dir.display()),
        source,
    })?;

    let snapshot = SizeSnapshot::measure_with_fs(dir, fs);

    terminal.line(&format!(
        "{} {} {}",
        CHART,
        style("Gzip sizes in").bold(),
        dir.display()
    ));
    terminal.blank();

    if snapshot.is_empty() {
        terminal.line(&format!("  {}", style("No scripts or stylesheets found.").dim()));
        return Ok(());
    }

    let mut entries: Vec<(&String, u64)> = snapshot.sizes().iter().map(|(k, v)| (k, *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    let total: u64 = entries.iter().map(|(_, size)| size).sum();
    let labels: Vec<String> = entries
        .iter()
        .map(|(_, size)| human_size(*size as i64))
        .collect();
    let width = labels
        .iter()
        .map(|l| measure_text_width(l))
        .chain(std::iter::once(measure_text_width(&human_size(total as i64))))
        .max()
        .unwrap_or(0);

    for ((name, _), label) in entries.iter().zip(&labels) {
        terminal.line(&format!("  {:<width$}  {}", label, style(name).cyan(), width = width));
    }

    terminal.blank();
    let total_label = format!("{:<width$}", human_size(total as i64), width = width);
    terminal.line(&format!(
        "  {}  {}",
        style(total_label).bold(),
        style(format!("total ({} files)", entries.len())).dim()
    ));
    Ok(())
}
