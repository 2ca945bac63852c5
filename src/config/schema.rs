use serde::{Deserialize, Serialize};
use std::fmt;

use crate::edit::EditRequest;

/// A batch of edit requests plus batch-level flags.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct EditPlan {
    /// Compute outcomes and diffs without writing files
    #[serde(default)]
    pub dry_run: bool,
    /// Attach a unified diff to every changed file
    #[serde(default)]
    pub output_diff: bool,
    #[serde(default)]
    pub edits: Vec<EditRequest>,
}

impl EditPlan {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.edits.is_empty() {
            issues.push(ValidationIssue::EmptyEditList);
        }

        for (index, edit) in self.edits.iter().enumerate() {
            if edit.path.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    index,
                    field: "path",
                });
            }
            if edit.search_pattern.is_none() && edit.replace_content.is_none() {
                issues.push(ValidationIssue::InvalidCombo {
                    index,
                    message: "either search_pattern or replace_content is required".to_string(),
                });
            }
            if edit.search_pattern.as_deref() == Some("") {
                issues.push(ValidationIssue::MissingField {
                    index,
                    field: "search_pattern",
                });
            }
            if edit.start_line == 0 {
                issues.push(ValidationIssue::NotPositive {
                    index,
                    field: "start_line",
                });
            }
            if edit.match_occurrence == 0 {
                issues.push(ValidationIssue::NotPositive {
                    index,
                    field: "match_occurrence",
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Requests grouped by path, in the order each path first appears.
    pub fn grouped_by_path(&self) -> Vec<(&str, Vec<&EditRequest>)> {
        group_by_path(&self.edits)
    }
}

/// Group requests by their `path`, keeping first-appearance order of paths and
/// input order within each group.
pub fn group_by_path(edits: &[EditRequest]) -> Vec<(&str, Vec<&EditRequest>)> {
    let mut groups: Vec<(&str, Vec<&EditRequest>)> = Vec::new();
    let mut positions: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();

    for edit in edits {
        let slot = *positions.entry(edit.path.as_str()).or_insert_with(|| {
            groups.push((edit.path.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(edit);
    }

    groups
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyEditList,
    MissingField { index: usize, field: &'static str },
    NotPositive { index: usize, field: &'static str },
    InvalidCombo { index: usize, message: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyEditList => write!(f, "edit plan contains no edits"),
            ValidationIssue::MissingField { index, field } => {
                write!(f, "edit #{} missing required field '{field}'", index + 1)
            }
            ValidationIssue::NotPositive { index, field } => {
                write!(f, "edit #{} has '{field}' of 0; it must be 1 or greater", index + 1)
            }
            ValidationIssue::InvalidCombo { index, message } => {
                write!(f, "edit #{} has invalid configuration: {message}", index + 1)
            }
        }
    }
}
