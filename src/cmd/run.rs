//! Run command implementation
//!
//! Drives one compilation through the plugin lifecycle from the outside:
//! snapshot the current output, run the user's build command, read the stats
//! file it wrote, report, summarize.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use crate::config::{OptionsLoader, PluginOptions};
use crate::error::ReportError;
use crate::host::Compiler;
use crate::infra::{CommandExecutor, RealCommandExecutor};
use crate::plugin::BuildReportPlugin;
use crate::stats::Stats;
use crate::terminal::{StdoutTerminal, Terminal};

/// Arguments of `build-report run`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    /// Build output folder
    pub output_path: PathBuf,
    /// Stats JSON written by the build
    pub stats: PathBuf,
    /// Compiler name shown in the report
    pub name: Option<String>,
    /// Options file; `.build-report.toml` in the working directory otherwise
    pub config: Option<PathBuf>,
    /// Build command and its arguments
    pub build_command: Vec<String>,
}

/// Report on one build.
///
/// # Examples
///
/// ```no_run
/// use build_report::cmd::run::{cmd_run, RunArgs};
///
/// cmd_run(&RunArgs {
///     output_path: "build".into(),
///     stats: "build/stats.json".into(),
///     build_command: vec!["npm".into(), "run".into(), "build".into()],
///     ..Default::default()
/// })?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - the options file is invalid
/// - the build command cannot be spawned, or fails without writing stats
/// - the stats file is missing or malformed
/// - any reported build had compilation errors
pub fn cmd_run(args: &RunArgs) -> Result<()> {
    let options = load_options(args.config.as_deref())?;
    cmd_run_with(args, options, &RealCommandExecutor, Arc::new(StdoutTerminal))
}

fn load_options(config: Option<&Path>) -> Result<PluginOptions> {
    let options = match config {
        Some(path) => OptionsLoader::load(path)?,
        None => {
            let cwd = env::current_dir().context("Failed to resolve the working directory")?;
            OptionsLoader::discover(&cwd)?
        }
    };
    Ok(options)
}

/// [`cmd_run`] with injected options, command executor and terminal.
pub fn cmd_run_with<E: CommandExecutor>(
    args: &RunArgs,
    options: PluginOptions,
    executor: &E,
    terminal: Arc<dyn Terminal>,
) -> Result<()> {
    let plugin = BuildReportPlugin::new()
        .with_options(options)
        .with_terminal(terminal);

    let mut compiler = Compiler::new(&args.output_path);
    if let Some(name) = &args.name {
        compiler = compiler.with_name(name);
    }
    compiler.register(&plugin);

    compiler.before_compile()?;

    let command_failure = match args.build_command.split_first() {
        Some((program, rest)) => run_build_command(executor, program, rest)?,
        None => None,
    };

    if let Some(failure) = command_failure {
        if !args.stats.exists() {
            return Err(failure.into());
        }
        log::warn!("{}; reporting the stats it wrote anyway", failure);
        report(&mut compiler, &plugin, &args.stats)?;
        return Err(failure.into());
    }

    report(&mut compiler, &plugin, &args.stats)
}

fn run_build_command<E: CommandExecutor>(
    executor: &E,
    program: &str,
    rest: &[String],
) -> Result<Option<ReportError>> {
    let command_line = std::iter::once(program)
        .chain(rest.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    log::debug!("Running build command: {}", command_line);

    let status = executor
        .status(Command::new(program).args(rest))
        .map_err(|source| ReportError::Io {
            context: format!("spawning build command `{}`", command_line),
            source,
        })?;

    if status.success() {
        Ok(None)
    } else {
        Ok(Some(ReportError::BuildCommandFailed {
            command: command_line,
            code: status.code(),
        }))
    }
}

fn report(compiler: &mut Compiler, plugin: &BuildReportPlugin, stats_path: &Path) -> Result<()> {
    let stats = Stats::from_file(stats_path)?;
    compiler.done(&stats);
    compiler.close();

    let session = plugin.session();
    let session = session.lock();
    let errored = session.errored_count();
    if errored > 0 {
        return Err(ReportError::BuildsErrored {
            errored,
            total: session.results().len(),
        }
        .into());
    }
    Ok(())
}
