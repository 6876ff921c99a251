//! Shared formatting utilities for size display and console output

use console::Emoji;

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊", "~");

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format a (possibly negative) byte count with binary units.
///
/// Values are rounded to two decimals and trailing zeros are dropped, so a
/// whole number of units prints without a fractional part. Negative values
/// keep their sign, which is how shrinking files are labelled.
///
/// # Examples
///
/// ```
/// use build_report::fmt::human_size;
///
/// assert_eq!(human_size(512), "512 B");
/// assert_eq!(human_size(1024), "1 KB");
/// assert_eq!(human_size(1536), "1.5 KB");
/// assert_eq!(human_size(-2048), "-2 KB");
/// assert_eq!(human_size(1_048_576), "1 MB");
/// ```
pub fn human_size(bytes: i64) -> String {
    let magnitude = bytes.unsigned_abs();
    let sign = if bytes < 0 { "-" } else { "" };

    let mut exponent = 0;
    let mut scaled = magnitude as f64;
    while scaled >= 1024.0 && exponent < UNITS.len() - 1 {
        scaled /= 1024.0;
        exponent += 1;
    }

    if exponent == 0 {
        return format!("{}{} B", sign, magnitude);
    }

    format!(
        "{}{} {}",
        sign,
        trim_decimal(&format!("{:.2}", scaled)),
        UNITS[exponent]
    )
}

/// Format a millisecond duration as decimal seconds.
///
/// The value is rendered with three decimals, then trailing zeros and a
/// dangling decimal point are removed.
///
/// # Examples
///
/// ```
/// use build_report::fmt::ms_to_s;
///
/// assert_eq!(ms_to_s(1500), "1.5");
/// assert_eq!(ms_to_s(1000), "1");
/// assert_eq!(ms_to_s(1234), "1.234");
/// ```
pub fn ms_to_s(ms: u64) -> String {
    trim_decimal(&format!("{}.{:03}", ms / 1000, ms % 1000))
}

fn trim_decimal(value: &str) -> String {
    if !value.contains('.') {
        return value.to_string();
    }
    value
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size_various_sizes() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1024), "1 KB");
        assert_eq!(human_size(51_200), "50 KB");
        assert_eq!(human_size(2_621_440), "2.5 MB");
        assert_eq!(human_size(1024 * 1024 * 1024), "1 GB");
    }

    #[test]
    fn test_human_size_rounds_to_two_decimals() {
        // 1100 / 1024 = 1.0742...
        assert_eq!(human_size(1100), "1.07 KB");
        assert_eq!(human_size(1030), "1.01 KB");
    }

    #[test]
    fn test_human_size_negative_values_keep_sign() {
        assert_eq!(human_size(-1), "-1 B");
        assert_eq!(human_size(-1536), "-1.5 KB");
    }

    #[test]
    fn test_ms_to_s_strips_trailing_zeros() {
        assert_eq!(ms_to_s(1500), "1.5");
        assert_eq!(ms_to_s(1000), "1");
        assert_eq!(ms_to_s(1234), "1.234");
        assert_eq!(ms_to_s(10_000), "10");
        assert_eq!(ms_to_s(1050), "1.05");
    }

    #[test]
    fn test_ms_to_s_sub_second_values() {
        assert_eq!(ms_to_s(0), "0");
        assert_eq!(ms_to_s(5), "0.005");
        assert_eq!(ms_to_s(250), "0.25");
    }

    #[test]
    fn test_trim_decimal_leaves_integers_alone() {
        assert_eq!(trim_decimal("100"), "100");
        assert_eq!(trim_decimal("100.00"), "100");
    }
}
