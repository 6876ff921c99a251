//! Host bundler lifecycle
//!
//! A [`Compiler`] stands for one compilation target of the host bundler. It
//! exposes three typed lifecycle events that plugins subscribe to by name:
//!
//! 1. `before_compile` - fallible, runs to completion before compiling
//! 2. `done` - once per finished compilation, with its stats
//! 3. `shutdown` - once, after the last compilation
//!
//! Handlers run sequentially in registration order; the host never invokes
//! two handlers of one compiler concurrently.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::stats::Stats;

/// Boxed error returned by fallible hook handlers
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while driving the lifecycle
#[derive(Error, Debug)]
pub enum HostError {
    /// A before-compile handler failed; compilation did not start
    #[error("before-compile hook '{plugin}' failed")]
    BeforeCompile {
        /// Name the failing handler was registered under
        plugin: String,
        #[source]
        /// Handler error
        source: BoxError,
    },

    /// The compilation step did not produce stats
    #[error("compilation did not produce stats")]
    Compile(#[source] BoxError),
}

/// How much the host prints about a compilation on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatsPreset {
    /// The host's regular stats output
    #[default]
    Normal,
    /// No host output; a plugin renders stats instead
    None,
}

/// Mutable compiler options plugins may adjust.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Host stats output preset
    pub stats: StatsPreset,
}

/// Read-only facts about a compiler handed to every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerInfo {
    /// Target name in multi-target configurations
    pub name: Option<String>,
    /// Directory the compilation writes to
    pub output_path: PathBuf,
}

/// Handler of the before-compile event
pub type BeforeCompileHandler =
    Box<dyn FnMut(&CompilerInfo, &mut CompilerOptions) -> Result<(), BoxError> + Send>;

/// Handler of the done event
pub type DoneHandler = Box<dyn FnMut(&CompilerInfo, &Stats) + Send>;

/// Handler of the shutdown event
pub type ShutdownHandler = Box<dyn FnMut(&CompilerInfo) + Send>;

struct Tap<F> {
    name: String,
    handler: F,
}

/// Ordered, named subscriptions to one lifecycle event.
pub struct Hook<F> {
    taps: Vec<Tap<F>>,
}

impl<F> Default for Hook<F> {
    fn default() -> Self {
        Self { taps: Vec::new() }
    }
}

impl<F> Hook<F> {
    /// Subscribe `handler` under `name`.
    pub fn tap(&mut self, name: impl Into<String>, handler: F) {
        let name = name.into();
        log::debug!("Registered hook handler '{}'", name);
        self.taps.push(Tap { name, handler });
    }

    /// Names of the subscribed handlers, in dispatch order.
    pub fn names(&self) -> Vec<&str> {
        self.taps.iter().map(|t| t.name.as_str()).collect()
    }

    /// Number of subscribed handlers.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Whether nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}

/// The three lifecycle events of a compiler.
#[derive(Default)]
pub struct CompilerHooks {
    /// Fired before each compilation
    pub before_compile: Hook<BeforeCompileHandler>,
    /// Fired after each compilation
    pub done: Hook<DoneHandler>,
    /// Fired once when the run ends
    pub shutdown: Hook<ShutdownHandler>,
}

/// A component that subscribes itself to compiler events.
pub trait Plugin {
    /// Plugin name, used as the tap name
    fn name(&self) -> &str;

    /// Register handlers on `compiler`.
    fn apply(&self, compiler: &mut Compiler);
}

/// One compilation target of the host bundler.
///
/// # Examples
///
/// ```
/// use build_report::host::Compiler;
/// use build_report::stats::{BuildStats, Stats};
///
/// let mut compiler = Compiler::new("dist").with_name("client");
/// compiler.hooks.done.tap("print-time", Box::new(|info, stats: &Stats| {
///     println!("{:?} finished in {} ms", info.name, stats.time());
/// }));
///
/// compiler
///     .run(|_| Ok(Stats::from(BuildStats { time: 42, ..Default::default() })))
///     .unwrap();
/// compiler.close();
/// ```
pub struct Compiler {
    info: CompilerInfo,
    /// Options plugins may adjust
    pub options: CompilerOptions,
    /// Lifecycle events
    pub hooks: CompilerHooks,
}

impl Compiler {
    /// Unnamed compiler writing to `output_path`.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            info: CompilerInfo {
                name: None,
                output_path: output_path.into(),
            },
            options: CompilerOptions::default(),
            hooks: CompilerHooks::default(),
        }
    }

    /// Set the target name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.info.name = Some(name.into());
        self
    }

    /// Register a plugin.
    pub fn with_plugin(mut self, plugin: &dyn Plugin) -> Self {
        self.register(plugin);
        self
    }

    /// Register a plugin.
    pub fn register(&mut self, plugin: &dyn Plugin) {
        log::debug!("Applying plugin '{}'", plugin.name());
        plugin.apply(self);
    }

    /// Target name, if any.
    pub fn name(&self) -> Option<&str> {
        self.info.name.as_deref()
    }

    /// Directory the compilation writes to.
    pub fn output_path(&self) -> &Path {
        &self.info.output_path
    }

    /// Facts handed to handlers.
    pub fn info(&self) -> &CompilerInfo {
        &self.info
    }

    /// Fire before-compile, stopping at the first failing handler.
    pub fn before_compile(&mut self) -> Result<(), HostError> {
        for tap in &mut self.hooks.before_compile.taps {
            log::trace!("before-compile -> {}", tap.name);
            (tap.handler)(&self.info, &mut self.options).map_err(|source| {
                HostError::BeforeCompile {
                    plugin: tap.name.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    /// Fire done for a finished compilation.
    pub fn done(&mut self, stats: &Stats) {
        for tap in &mut self.hooks.done.taps {
            log::trace!("done -> {}", tap.name);
            (tap.handler)(&self.info, stats);
        }
        if self.options.stats == StatsPreset::Normal {
            log::info!(
                "{} compiled in {} ms with {} assets",
                self.info.name.as_deref().unwrap_or("compilation"),
                stats.time(),
                stats.assets().len()
            );
        }
    }

    /// Run one compilation: before-compile, `compile`, then done.
    ///
    /// `compile` stands for the host's actual work; it only starts after
    /// every before-compile handler has returned.
    pub fn run<F>(&mut self, compile: F) -> Result<(), HostError>
    where
        F: FnOnce(&CompilerInfo) -> Result<Stats, BoxError>,
    {
        self.before_compile()?;
        let stats = compile(&self.info).map_err(HostError::Compile)?;
        self.done(&stats);
        Ok(())
    }

    /// Fire shutdown.
    pub fn close(&mut self) {
        for tap in &mut self.hooks.shutdown.taps {
            log::trace!("shutdown -> {}", tap.name);
            (tap.handler)(&self.info);
        }
    }
}
