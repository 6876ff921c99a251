//! Assertion helpers for captured report output
//!
//! Report output is plain text once ANSI codes are stripped; these helpers
//! give clearer failure messages than bare `contains` checks.

#![allow(dead_code)]

/// Assert `needle` occurs exactly once in `output`.
pub fn assert_appears_once(output: &str, needle: &str) {
    let count = output.matches(needle).count();
    assert_eq!(
        count, 1,
        "expected {:?} exactly once, found it {} times in:\n{}",
        needle, count, output
    );
}

/// Assert `needle` does not occur in `output`.
pub fn assert_absent(output: &str, needle: &str) {
    assert!(
        !output.contains(needle),
        "expected {:?} to be absent from:\n{}",
        needle,
        output
    );
}

/// Assert every needle occurs in `output`, in the given order.
pub fn assert_in_order(output: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        match output[from..].find(needle) {
            Some(at) => from += at + needle.len(),
            None => panic!(
                "expected {:?} after byte {} (order {:?}) in:\n{}",
                needle, from, needles, output
            ),
        }
    }
}
