//! Assertion helpers for generated text and errors.

use std::path::Path;

/// Assert that `haystack` contains `needle`, printing the whole text on failure.
pub fn assert_contains(haystack: &str, needle: &str) {
    assert!(
        haystack.contains(needle),
        "expected to find {:?} in:\n{}",
        needle,
        haystack
    );
}

pub fn assert_not_contains(haystack: &str, needle: &str) {
    assert!(
        !haystack.contains(needle),
        "did not expect {:?} in:\n{}",
        needle,
        haystack
    );
}

/// Assert that an error's full context chain mentions `expected`.
pub fn assert_error_contains<T: std::fmt::Debug>(result: anyhow::Result<T>, expected: &str) {
    match result {
        Ok(v) => panic!("expected an error mentioning {:?}, got Ok({:?})", expected, v),
        Err(e) => {
            let msg = format!("{:#}", e);
            assert!(
                msg.contains(expected),
                "error {:?} does not mention {:?}",
                msg,
                expected
            );
        }
    }
}

/// Read a generated stub, panicking with the path if it is missing.
pub fn read_stub(root: &Path, relative: &str) -> String {
    let path = root.join(relative);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}
