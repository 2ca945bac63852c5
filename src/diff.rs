//! Unified diff rendering.
//!
//! Rendering sits behind [`DiffRenderer`] so callers can swap in another
//! formatter. [`UnifiedDiff`] is the default, built on `similar`.

use similar::TextDiff;
use thiserror::Error;

/// Lines of context around each hunk.
pub const CONTEXT_LINES: usize = 3;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("diff rendering failed: {0}")]
    Render(String),
}

/// Produces a textual diff between two versions of a file.
pub trait DiffRenderer {
    /// `name` labels both sides of the diff.
    fn render(&self, name: &str, before: &str, after: &str) -> Result<String, DiffError>;
}

/// Unified diff with a fixed three-line context window.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnifiedDiff;

impl DiffRenderer for UnifiedDiff {
    fn render(&self, name: &str, before: &str, after: &str) -> Result<String, DiffError> {
        let diff = TextDiff::from_lines(before, after);
        Ok(diff
            .unified_diff()
            .context_radius(CONTEXT_LINES)
            .header(name, name)
            .to_string())
    }
}

/// Text shown in place of a diff that could not be rendered.
pub fn placeholder(error: &DiffError) -> String {
    format!("<diff unavailable: {error}>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_diff_headers_and_hunk() {
        let diff = UnifiedDiff
            .render("src/app.py", "a\nold\nc\n", "a\nnew\nc\n")
            .unwrap();

        assert!(diff.starts_with("--- src/app.py\n+++ src/app.py\n"));
        assert!(diff.contains("@@ -1,3 +1,3 @@"));
        assert!(diff.contains("-old\n"));
        assert!(diff.contains("+new\n"));
    }

    #[test]
    fn test_context_is_limited_to_three_lines() {
        let before: String = (1..=20).map(|n| format!("{n}\n")).collect();
        let after = before.replace("10\n", "ten\n");
        let diff = UnifiedDiff.render("n.txt", &before, &after).unwrap();

        assert!(diff.contains(" 7\n"));
        assert!(!diff.contains(" 6\n"));
        assert!(diff.contains(" 13\n"));
        assert!(!diff.contains(" 14\n"));
    }

    #[test]
    fn test_placeholder_text() {
        let text = placeholder(&DiffError::Render("boom".to_string()));
        assert_eq!(text, "<diff unavailable: diff rendering failed: boom>");
    }
}
