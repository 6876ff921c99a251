//! Compiler diagnostics cleanup
//!
//! Raw bundler diagnostics carry loader headers, stack traces and resolver
//! jargon. The formatter turns them into short messages fit for a terminal.

use crate::stats::Diagnostic;
use regex::Regex;
use std::sync::OnceLock;

/// Human-readable errors and warnings of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedMessages {
    /// Formatted errors, most relevant first
    pub errors: Vec<String>,
    /// Formatted warnings, in compiler order
    pub warnings: Vec<String>,
}

/// Turns raw compiler diagnostics into terminal messages.
pub trait MessageFormatter: Send + Sync {
    /// Format all diagnostics of one build.
    fn format(&self, errors: &[&Diagnostic], warnings: &[&Diagnostic]) -> FormattedMessages;
}

/// Default cleanup for webpack-style diagnostics.
///
/// - prefixes structured diagnostics with their module name
/// - drops `Module Error (from ...)` style loader headers
/// - rewrites unresolved imports as `Cannot find module: '...'`
/// - removes stack-trace lines and repeated blank lines
/// - keeps only syntax errors when there are any, since the rest usually
///   follow from them
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessageFormatter;

const SYNTAX_ERROR_LABEL: &str = "Syntax error:";

struct Patterns {
    loader_header: Regex,
    module_not_found: Regex,
    build_failed: Regex,
    stack_frame: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

#[allow(clippy::unwrap_used)]
fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        loader_header: Regex::new(r"Module [A-Za-z ]+\(from").unwrap(),
        module_not_found: Regex::new(
            r"^Module not found: Error: (?:Can't|Cannot) resolve '([^']+)'(?: in '[^']*')?",
        )
        .unwrap(),
        build_failed: Regex::new(r"^Module build failed(?: \(from [^)]*\))?:\s*(?:Error:\s*)?")
            .unwrap(),
        stack_frame: Regex::new(r"^\s*at\s").unwrap(),
    })
}

impl DefaultMessageFormatter {
    /// Format a single diagnostic.
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let raw = match diagnostic {
            Diagnostic::Text(text) => text.clone(),
            Diagnostic::Detailed(details) => {
                let origin = details
                    .module_name
                    .as_deref()
                    .or(details.file.as_deref())
                    .map(|name| match &details.loc {
                        Some(loc) => format!("{} {}", name, loc),
                        None => name.to_string(),
                    });
                match origin {
                    Some(origin) if !details.message.starts_with(&origin) => {
                        format!("{}\n{}", origin, details.message)
                    }
                    _ => details.message.clone(),
                }
            }
        };
        clean_message(&raw)
    }
}

fn clean_message(raw: &str) -> String {
    let p = patterns();
    let raw = raw.replace("SyntaxError:", SYNTAX_ERROR_LABEL);

    let mut lines: Vec<String> = Vec::new();
    for line in raw.lines() {
        if p.loader_header.is_match(line) || p.stack_frame.is_match(line) {
            continue;
        }

        if let Some(captures) = p.module_not_found.captures(line) {
            let request = &captures[1];
            let mut rewritten = format!("Cannot find module: '{}'.", request);
            if !request.starts_with('.') && !request.starts_with('/') {
                rewritten.push_str(" Make sure this package is installed.\n\n");
                rewritten.push_str(&format!(
                    "You can install this package by running: npm install {}.",
                    package_name(request)
                ));
            }
            lines.push(rewritten);
            continue;
        }

        let line = p.build_failed.replace(line, "");
        let line = line.trim_end();

        // Collapse runs of blank lines to one
        if line.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(line.to_string());
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Package part of a bare import (`@scope/pkg/sub` -> `@scope/pkg`).
fn package_name(request: &str) -> &str {
    let mut segments = request.splitn(3, '/');
    let first = segments.next().unwrap_or(request);
    if first.starts_with('@') {
        match segments.next() {
            Some(second) => &request[..first.len() + 1 + second.len()],
            None => request,
        }
    } else {
        first
    }
}

impl MessageFormatter for DefaultMessageFormatter {
    fn format(&self, errors: &[&Diagnostic], warnings: &[&Diagnostic]) -> FormattedMessages {
        let mut errors: Vec<String> = errors.iter().map(|d| self.format_diagnostic(d)).collect();
        let warnings = warnings.iter().map(|d| self.format_diagnostic(d)).collect();

        if errors.iter().any(|e| e.contains(SYNTAX_ERROR_LABEL)) {
            errors.retain(|e| e.contains(SYNTAX_ERROR_LABEL));
        }

        FormattedMessages { errors, warnings }
    }
}
