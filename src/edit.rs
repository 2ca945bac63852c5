use serde::{Deserialize, Serialize};

use crate::engine::ChangeError;

/// A single requested change, always scoped to one file path.
///
/// The request shape decides what happens:
///
/// | `search_pattern` | `replace_content` | behaviour   |
/// |------------------|-------------------|-------------|
/// | absent           | present           | insertion   |
/// | present          | present           | replacement |
/// | present          | absent            | deletion    |
/// | absent           | absent            | invalid     |
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[must_use = "EditRequest does nothing until handed to the engine"]
pub struct EditRequest {
    /// Target file, relative to the workspace root
    pub path: String,
    /// Text (or regex) to locate; absent for insertions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_pattern: Option<String>,
    /// 1-based line. Insertion point, or scan anchor for literal search.
    pub start_line: usize,
    /// New text; absent for deletions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_content: Option<String>,
    #[serde(default)]
    pub use_regex: bool,
    /// Literal mode only
    #[serde(default = "default_true")]
    pub ignore_leading_whitespace: bool,
    #[serde(default = "default_true")]
    pub preserve_indentation: bool,
    /// 1-based ordinal of the match to target
    #[serde(default = "default_occurrence")]
    pub match_occurrence: usize,
}

fn default_true() -> bool {
    true
}

fn default_occurrence() -> usize {
    1
}

/// Borrowed view of what an [`EditRequest`] asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind<'a> {
    Insert { content: &'a str },
    Replace { pattern: &'a str, content: &'a str },
    Delete { pattern: &'a str },
}

impl EditRequest {
    fn blank(path: impl Into<String>, start_line: usize) -> Self {
        Self {
            path: path.into(),
            search_pattern: None,
            start_line,
            replace_content: None,
            use_regex: false,
            ignore_leading_whitespace: true,
            preserve_indentation: true,
            match_occurrence: 1,
        }
    }

    /// Insert `content` before `start_line`.
    pub fn insert(path: impl Into<String>, start_line: usize, content: impl Into<String>) -> Self {
        Self {
            replace_content: Some(content.into()),
            ..Self::blank(path, start_line)
        }
    }

    /// Replace the first match of `pattern` at or after `start_line`.
    pub fn replace(
        path: impl Into<String>,
        start_line: usize,
        pattern: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            search_pattern: Some(pattern.into()),
            replace_content: Some(content.into()),
            ..Self::blank(path, start_line)
        }
    }

    /// Delete the first match of `pattern` at or after `start_line`.
    pub fn delete(path: impl Into<String>, start_line: usize, pattern: impl Into<String>) -> Self {
        Self {
            search_pattern: Some(pattern.into()),
            ..Self::blank(path, start_line)
        }
    }

    /// Match `search_pattern` as a regular expression.
    pub fn regex(mut self) -> Self {
        self.use_regex = true;
        self
    }

    /// Target the `n`th match instead of the first.
    pub fn occurrence(mut self, n: usize) -> Self {
        self.match_occurrence = n;
        self
    }

    pub fn preserve_indentation(mut self, enabled: bool) -> Self {
        self.preserve_indentation = enabled;
        self
    }

    pub fn ignore_leading_whitespace(mut self, enabled: bool) -> Self {
        self.ignore_leading_whitespace = enabled;
        self
    }

    /// Classify the request.
    ///
    /// Plans are validated before reaching the engine, but a request carrying
    /// neither a pattern nor content still yields an error here rather than
    /// a silent no-op.
    pub fn kind(&self) -> Result<EditKind<'_>, ChangeError> {
        match (self.search_pattern.as_deref(), self.replace_content.as_deref()) {
            (None, Some(content)) => Ok(EditKind::Insert { content }),
            (Some(pattern), Some(content)) => Ok(EditKind::Replace { pattern, content }),
            (Some(pattern), None) => Ok(EditKind::Delete { pattern }),
            (None, None) => Err(ChangeError::MissingContent {
                start_line: self.start_line,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let insert = EditRequest::insert("a.txt", 1, "x");
        assert_eq!(insert.kind().unwrap(), EditKind::Insert { content: "x" });

        let replace = EditRequest::replace("a.txt", 1, "foo", "bar");
        assert_eq!(
            replace.kind().unwrap(),
            EditKind::Replace {
                pattern: "foo",
                content: "bar"
            }
        );

        let delete = EditRequest::delete("a.txt", 1, "foo");
        assert_eq!(delete.kind().unwrap(), EditKind::Delete { pattern: "foo" });
    }

    #[test]
    fn test_kind_rejects_empty_request() {
        let mut request = EditRequest::insert("a.txt", 3, "x");
        request.replace_content = None;
        assert!(matches!(
            request.kind(),
            Err(ChangeError::MissingContent { start_line: 3 })
        ));
    }

    #[test]
    fn test_deserialize_defaults() {
        let request: EditRequest = serde_json::from_str(
            r#"{"path": "src/lib.rs", "start_line": 4, "search_pattern": "old"}"#,
        )
        .unwrap();

        assert!(!request.use_regex);
        assert!(request.ignore_leading_whitespace);
        assert!(request.preserve_indentation);
        assert_eq!(request.match_occurrence, 1);
        assert!(request.replace_content.is_none());
    }
}
