//! Line-oriented console output
//!
//! Every piece of the report is written through a [`Terminal`]. Each call to
//! [`Terminal::line`] is one console write, even when the text spans several
//! lines.

use parking_lot::Mutex;
use std::sync::Arc;

/// Destination for report output.
pub trait Terminal: Send + Sync {
    /// Terminal name, for logs
    fn name(&self) -> &str;

    /// Write one message followed by a newline.
    fn line(&self, text: &str);

    /// Write an empty line.
    fn blank(&self) {
        self.line("");
    }
}

/// Writes to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutTerminal;

impl Terminal for StdoutTerminal {
    fn name(&self) -> &str {
        "stdout"
    }

    fn line(&self, text: &str) {
        println!("{}", text);
    }
}

/// In-memory terminal for tests and embedding.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryTerminal {
    writes: Arc<Mutex<Vec<String>>>,
}

impl MemoryTerminal {
    /// Create an empty memory terminal
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write so far, ANSI codes included.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }

    /// Number of writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.lock().len()
    }

    /// Everything written, joined by newlines, with ANSI codes removed.
    pub fn plain_output(&self) -> String {
        self.writes
            .lock()
            .iter()
            .map(|w| console::strip_ansi_codes(w).into_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Clear all recorded writes
    pub fn clear(&self) {
        self.writes.lock().clear();
    }
}

impl Terminal for MemoryTerminal {
    fn name(&self) -> &str {
        "memory"
    }

    fn line(&self, text: &str) {
        self.writes.lock().push(text.to_string());
    }
}
