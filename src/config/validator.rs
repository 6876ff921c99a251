//! Schema validation issues
//!
//! Validation collects every problem it finds instead of stopping at the
//! first, so a user fixing their options sees the whole list at once.

/// Validation severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    /// Accepted, but probably not what the user meant
    Warning,
    /// Must be fixed; construction fails
    Error,
}

/// A validation issue found in an options object
///
/// # Examples
///
/// ```
/// use build_report::config::{ValidationIssue, ValidationSeverity};
///
/// let issue = ValidationIssue::error("options.verboseFonts", "options.verboseFonts should be a boolean.");
/// assert_eq!(issue.severity, ValidationSeverity::Error);
/// assert_eq!(issue.field, "options.verboseFonts");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Severity level
    pub severity: ValidationSeverity,
    /// Path of the offending value, rooted at `options`
    pub field: String,
    /// Description of the issue
    pub message: String,
}

impl ValidationIssue {
    /// Create a new validation issue
    pub fn new(
        severity: ValidationSeverity,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an error issue
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Error, field, message)
    }

    /// Create a warning issue
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Warning, field, message)
    }
}

/// Result of options validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors)
    pub valid: bool,
    /// Issues found during validation
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        Self {
            valid: true,
            issues: Vec::new(),
        }
    }

    /// Add an issue
    pub fn add_issue(&mut self, issue: ValidationIssue) {
        if issue.severity == ValidationSeverity::Error {
            self.valid = false;
        }
        self.issues.push(issue);
    }

    /// Get only errors
    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Error)
            .collect()
    }

    /// Get only warnings
    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Warning)
            .collect()
    }

    /// Split into the error issues, consuming the result.
    pub fn into_errors(self) -> Vec<ValidationIssue> {
        self.issues
            .into_iter()
            .filter(|i| i.severity == ValidationSeverity::Error)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_result_detects_errors() {
        let mut result = ValidationResult::success();
        assert!(result.valid);

        result.add_issue(ValidationIssue::warning("options.extra", "unknown"));
        assert!(result.valid);

        result.add_issue(ValidationIssue::error("options.verboseFonts", "bad"));
        assert!(!result.valid);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn test_into_errors_drops_warnings() {
        let mut result = ValidationResult::success();
        result.add_issue(ValidationIssue::warning("options.a", "a"));
        result.add_issue(ValidationIssue::error("options.b", "b"));

        let errors = result.into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "options.b");
    }

    #[test]
    fn test_error_severity_outranks_warning() {
        assert!(ValidationSeverity::Error > ValidationSeverity::Warning);
        assert_eq!(ValidationIssue::warning("options.a", "a").severity, ValidationSeverity::Warning);
    }
}
