//! Log-once deduplication
//!
//! When several compilers share one report session, each of them fires the
//! same start and shutdown messages. The session prints each distinct
//! message a single time.

use crate::terminal::Terminal;
use std::collections::HashSet;

/// Remembers which exact messages were already printed.
#[derive(Debug, Clone, Default)]
pub struct OnceLogger {
    logged: HashSet<String>,
}

impl OnceLogger {
    /// Create a logger that has printed nothing yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Print `message` unless the identical string was printed before.
    ///
    /// Returns whether the message was written.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_report::once::OnceLogger;
    /// use build_report::terminal::MemoryTerminal;
    ///
    /// let terminal = MemoryTerminal::new();
    /// let mut logger = OnceLogger::new();
    ///
    /// assert!(logger.log(&terminal, "Build completed in 1.5s"));
    /// assert!(!logger.log(&terminal, "Build completed in 1.5s"));
    /// assert_eq!(terminal.write_count(), 1);
    /// ```
    pub fn log(&mut self, terminal: &dyn Terminal, message: &str) -> bool {
        if self.logged.contains(message) {
            log::trace!("Suppressing repeated message {:?}", message);
            return false;
        }
        terminal.line(message);
        self.logged.insert(message.to_string());
        true
    }

    /// Whether `message` was already printed.
    pub fn has_logged(&self, message: &str) -> bool {
        self.logged.contains(message)
    }
}
