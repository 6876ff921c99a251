//! Build report plugin
//!
//! [`BuildReportPlugin`] takes over the host's stats output. Before each
//! compilation it snapshots the gzip sizes of the current output folder;
//! after it, it prints either the first error or a size report with deltas
//! against that snapshot. At shutdown it prints a one-line summary of every
//! build recorded in its [`ReportSession`].

use console::style;
use parking_lot::Mutex;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::config::{PluginOptions, PLUGIN_NAME};
use crate::error::ReportError;
use crate::fmt::ms_to_s;
use crate::host::{Compiler, CompilerInfo, Plugin, StatsPreset};
use crate::messages::{DefaultMessageFormatter, MessageFormatter};
use crate::once::OnceLogger;
use crate::report::{ReportRenderer, ReportThresholds};
use crate::snapshot::SizeSnapshot;
use crate::stats::Stats;
use crate::terminal::{StdoutTerminal, Terminal};

/// Printed once per session when the first plugin is applied
pub const START_MESSAGE: &str = "Creating an optimized production build...\n";

/// Outcome of one finished build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// Compiler name, if the host named it
    pub name: Option<String>,
    /// No errors were reported
    pub success: bool,
    /// At least one warning was reported
    pub warnings: bool,
    /// Compilation time in milliseconds
    pub time: u64,
}

/// Report state shared by every plugin instance of one run.
pub struct ReportSession {
    terminal: Arc<dyn Terminal>,
    once: OnceLogger,
    results: Vec<BuildResult>,
}

/// A session shared between plugin instances
pub type SharedSession = Arc<Mutex<ReportSession>>;

impl ReportSession {
    /// Session printing to `terminal`.
    pub fn new(terminal: Arc<dyn Terminal>) -> Self {
        Self {
            terminal,
            once: OnceLogger::new(),
            results: Vec::new(),
        }
    }

    /// Session printing to `terminal`, ready to share.
    pub fn shared(terminal: Arc<dyn Terminal>) -> SharedSession {
        Arc::new(Mutex::new(Self::new(terminal)))
    }

    /// Terminal all report output goes to.
    pub fn terminal(&self) -> Arc<dyn Terminal> {
        Arc::clone(&self.terminal)
    }

    /// Print `message` unless it was printed before in this session.
    pub fn log_once(&mut self, message: &str) -> bool {
        self.once.log(self.terminal.as_ref(), message)
    }

    /// Record a finished build.
    pub fn record(&mut self, result: BuildResult) {
        log::debug!(
            "Recorded {} build {:?} ({} ms)",
            if result.success { "successful" } else { "errored" },
            result.name,
            result.time
        );
        self.results.push(result);
    }

    /// Every build recorded so far, in completion order.
    pub fn results(&self) -> &[BuildResult] {
        &self.results
    }

    /// One-line summary of the recorded builds, or `None` before any build.
    pub fn summary_message(&self) -> Option<String> {
        match self.results.as_slice() {
            [] => None,
            [only] => {
                let outcome = if only.success {
                    style("completed").green()
                } else {
                    style("errored").red()
                };
                Some(format!("Build {} in {}s", outcome, ms_to_s(only.time)))
            }
            results => {
                let succeeded = results.iter().filter(|r| r.success).count();
                let errored = results.len() - succeeded;

                let mut message = String::new();
                if succeeded > 0 {
                    message.push_str(
                        &style(format!("{} builds compiled successfully", succeeded))
                            .green()
                            .to_string(),
                    );
                }
                if succeeded > 0 && errored > 0 {
                    message.push_str(" and ");
                }
                if errored > 0 {
                    message.push_str(&style(format!("{} builds errored.", errored)).red().to_string());
                }
                Some(message)
            }
        }
    }

    /// Number of recorded builds that errored.
    pub fn errored_count(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }
}

impl Default for ReportSession {
    fn default() -> Self {
        Self::new(Arc::new(StdoutTerminal))
    }
}

/// Host plugin printing a human-oriented build report.
///
/// # Examples
///
/// ```
/// use build_report::host::Compiler;
/// use build_report::plugin::{BuildReportPlugin, ReportSession};
/// use build_report::stats::{BuildStats, Stats};
/// use build_report::terminal::MemoryTerminal;
/// use std::sync::Arc;
///
/// let terminal = MemoryTerminal::new();
/// let plugin = BuildReportPlugin::new()
///     .with_session(ReportSession::shared(Arc::new(terminal.clone())));
///
/// let mut compiler = Compiler::new("does-not-exist-yet").with_plugin(&plugin);
/// compiler
///     .run(|_| Ok(Stats::from(BuildStats { time: 1500, ..Default::default() })))
///     .unwrap();
/// compiler.close();
///
/// assert!(terminal.plain_output().contains("Compiled successfully."));
/// assert!(terminal.plain_output().contains("Build completed in 1.5s"));
/// ```
#[derive(Clone)]
pub struct BuildReportPlugin {
    options: PluginOptions,
    session: SharedSession,
    previous: Arc<Mutex<Option<SizeSnapshot>>>,
    formatter: Arc<dyn MessageFormatter>,
    renderer: Arc<ReportRenderer>,
}

impl Default for BuildReportPlugin {
    fn default() -> Self {
        Self {
            options: PluginOptions::default(),
            session: Arc::new(Mutex::new(ReportSession::default())),
            previous: Arc::new(Mutex::new(None)),
            formatter: Arc::new(DefaultMessageFormatter),
            renderer: Arc::new(ReportRenderer::new()),
        }
    }
}

impl BuildReportPlugin {
    /// Plugin with default options printing to stdout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plugin configured from a raw options object.
    ///
    /// Fails with [`ReportError::InvalidOptions`] when `options` does not
    /// match the schema.
    pub fn from_options(options: &Value) -> Result<Self, ReportError> {
        Ok(Self::new().with_options(PluginOptions::from_value(options)?))
    }

    /// Use already validated options.
    pub fn with_options(mut self, options: PluginOptions) -> Self {
        self.options = options;
        self
    }

    /// Share `session` with other plugin instances.
    pub fn with_session(mut self, session: SharedSession) -> Self {
        self.session = session;
        self
    }

    /// Print to `terminal` through a fresh session.
    pub fn with_terminal(self, terminal: Arc<dyn Terminal>) -> Self {
        self.with_session(ReportSession::shared(terminal))
    }

    /// Use a custom diagnostics formatter.
    pub fn with_formatter(mut self, formatter: Arc<dyn MessageFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Use other advisory size limits.
    pub fn with_thresholds(mut self, thresholds: ReportThresholds) -> Self {
        self.renderer = Arc::new(ReportRenderer::new().with_thresholds(thresholds));
        self
    }

    /// Validated options.
    pub fn options(&self) -> PluginOptions {
        self.options
    }

    /// Session this plugin records into.
    pub fn session(&self) -> SharedSession {
        Arc::clone(&self.session)
    }

    /// Snapshot taken before the latest compilation.
    pub fn previous_snapshot(&self) -> Option<SizeSnapshot> {
        self.previous.lock().clone()
    }

    fn before_compile(&self, info: &CompilerInfo) {
        let snapshot = SizeSnapshot::measure(&info.output_path);
        *self.previous.lock() = Some(snapshot);
    }

    fn done(&self, info: &CompilerInfo, stats: &Stats) {
        let terminal = self.session.lock().terminal();
        terminal.blank();

        let errors = stats.errors();
        let warnings = stats.warnings();
        let messages = self.formatter.format(&errors, &warnings);
        let assets = stats.assets();
        let time = ms_to_s(stats.time());

        let success = match messages.errors.first() {
            Some(first_error) => {
                match &info.name {
                    Some(name) => terminal.line(&format!(
                        "{} errored in {}s.",
                        style(name).bold().red(),
                        time
                    )),
                    None => terminal.line(&format!("Build errored in {}s", time)),
                }
                let emitted = assets.iter().filter(|a| a.emitted).count();
                terminal.line(&format!("{} of {} assets emitted.", emitted, assets.len()));
                // The rest usually follow from the first one
                terminal.line(first_error);
                false
            }
            None => {
                let built = format!(
                    "Built {} assets in {}s. File sizes after gzip:\n",
                    assets.len(),
                    time
                );
                match &info.name {
                    Some(name) => terminal.line(&format!(
                        "{} compiled successfully.\n{}",
                        style(name).bold().green(),
                        built
                    )),
                    None => terminal.line(&format!("Compiled successfully.\n{}", built)),
                }

                let previous = self
                    .previous
                    .lock()
                    .clone()
                    .unwrap_or_else(|| SizeSnapshot::empty(&info.output_path));
                self.renderer
                    .render(stats, &previous, &info.output_path)
                    .print(terminal.as_ref());

                for asset in assets.iter().filter(|a| !is_script_or_stylesheet(&a.name)) {
                    terminal.line(&format!("  {}", style(&asset.name).dim()));
                }

                if !messages.warnings.is_empty() {
                    print_warnings(terminal.as_ref(), &messages.warnings);
                }
                true
            }
        };

        self.session.lock().record(BuildResult {
            name: info.name.clone(),
            success,
            warnings: !messages.warnings.is_empty(),
            time: stats.time(),
        });
    }

    fn shutdown(&self) {
        let mut session = self.session.lock();
        if let Some(summary) = session.summary_message() {
            session.log_once(&format!("\n{}\n", summary));
        }
    }
}

impl Plugin for BuildReportPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn apply(&self, compiler: &mut Compiler) {
        self.session.lock().log_once(START_MESSAGE);
        if self.options.verbose_fonts || self.options.verbose_images {
            log::debug!("Verbose font and image listings have no effect on the report yet");
        }

        let plugin = self.clone();
        compiler.hooks.before_compile.tap(
            PLUGIN_NAME,
            Box::new(move |info, options| {
                plugin.before_compile(info);
                options.stats = StatsPreset::None;
                Ok(())
            }),
        );

        let plugin = self.clone();
        compiler
            .hooks
            .done
            .tap(PLUGIN_NAME, Box::new(move |info, stats| plugin.done(info, stats)));

        let plugin = self.clone();
        compiler
            .hooks
            .shutdown
            .tap(PLUGIN_NAME, Box::new(move |_| plugin.shutdown()));
    }
}

fn is_script_or_stylesheet(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == "js" || ext == "css")
}

fn print_warnings(terminal: &dyn Terminal, warnings: &[String]) {
    terminal.blank();
    terminal.line(&style("Compiled with warnings.\n").yellow().to_string());
    terminal.line(&warnings.join("\n\n"));
    terminal.line(&format!(
        "\nSearch for the {} to learn more about each warning.",
        style("keywords").underlined().yellow()
    ));
    terminal.line(&format!(
        "To ignore, add {} to the line before.\n",
        style("// eslint-disable-next-line").cyan()
    ));
}
