//! Size delta labels between two builds

use crate::fmt::human_size;
use console::{style, Color};
use std::fmt;

/// Growth at or above this many bytes is flagged as high severity.
///
/// There is no configuration surface for this value.
pub const FIFTY_KILOBYTES: i64 = 1024 * 50;

/// Severity tier of a size change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeltaTier {
    /// The file got smaller
    Improved,
    /// The file grew by less than [`FIFTY_KILOBYTES`]
    Low,
    /// The file grew by [`FIFTY_KILOBYTES`] or more
    High,
}

impl DeltaTier {
    /// Terminal colour of the tier.
    pub fn color(&self) -> Color {
        match self {
            DeltaTier::Improved => Color::Green,
            DeltaTier::Low => Color::Yellow,
            DeltaTier::High => Color::Red,
        }
    }
}

/// A non-empty size change label such as `+12 KB` or `-3.5 KB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaLabel {
    /// Signed byte difference, current minus previous
    pub difference: i64,
    /// Severity of the change
    pub tier: DeltaTier,
    text: String,
}

impl DeltaLabel {
    /// Compare the current gzip size with the previous one.
    ///
    /// Returns `None` when there is nothing to show: the file is new (no
    /// previous size) or its size did not change.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_report::delta::{DeltaLabel, DeltaTier};
    ///
    /// let label = DeltaLabel::between(2048, Some(1024)).unwrap();
    /// assert_eq!(label.text(), "+1 KB");
    /// assert_eq!(label.tier, DeltaTier::Low);
    ///
    /// assert!(DeltaLabel::between(1024, Some(1024)).is_none());
    /// assert!(DeltaLabel::between(1024, None).is_none());
    /// ```
    pub fn between(current: u64, previous: Option<u64>) -> Option<Self> {
        let previous = previous?;
        let difference = current as i64 - previous as i64;

        let (tier, text) = if difference >= FIFTY_KILOBYTES {
            (DeltaTier::High, format!("+{}", human_size(difference)))
        } else if difference > 0 {
            (DeltaTier::Low, format!("+{}", human_size(difference)))
        } else if difference < 0 {
            (DeltaTier::Improved, human_size(difference))
        } else {
            return None;
        };

        Some(Self {
            difference,
            tier,
            text,
        })
    }

    /// Plain label text without colour.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for DeltaLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", style(&self.text).fg(self.tier.color()))
    }
}
