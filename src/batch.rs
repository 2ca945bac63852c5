//! Batch handler: runs a flat list of edit requests across files.
//!
//! Requests are grouped by path. Each file is resolved, read, edited by the
//! engine, optionally diffed, and written back unless running dry. One file
//! failing never affects the others.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{error, info};

use crate::config::{group_by_path, EditPlan};
use crate::diff::{placeholder, DiffRenderer, UnifiedDiff};
use crate::edit::EditRequest;
use crate::engine::apply_file_changes;
use crate::safety::{PathResolver, SafetyError};
use crate::store::{ContentStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// At least one edit applied
    Success,
    /// Nothing applied; usually a pattern that never matched
    Skipped,
    /// The file could not be resolved, read or written
    Failed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Success => write!(f, "success"),
            FileStatus::Skipped => write!(f, "skipped"),
            FileStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Per-file result reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEditOutcome {
    pub path: String,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Unified diff; present only when requested and the content changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl FileEditOutcome {
    fn failed(path: &str, message: String) -> Self {
        Self {
            path: path.to_string(),
            status: FileStatus::Failed,
            message: Some(message),
            diff: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Compute everything but write nothing
    pub dry_run: bool,
    pub output_diff: bool,
}

/// File-level failures.
#[derive(Error, Debug)]
enum FileError {
    #[error("{0}")]
    Safety(#[from] SafetyError),

    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Applies edit requests through pluggable collaborators.
pub struct BatchEditor<'a> {
    resolver: &'a dyn PathResolver,
    store: &'a dyn ContentStore,
    differ: &'a dyn DiffRenderer,
}

impl<'a> BatchEditor<'a> {
    /// Editor using [`UnifiedDiff`] for diffs.
    pub fn new(resolver: &'a dyn PathResolver, store: &'a dyn ContentStore) -> Self {
        Self {
            resolver,
            store,
            differ: &UnifiedDiff,
        }
    }

    pub fn with_diff_renderer(mut self, differ: &'a dyn DiffRenderer) -> Self {
        self.differ = differ;
        self
    }

    /// Run a loaded plan using its own flags.
    pub fn apply_plan(&self, plan: &EditPlan) -> Vec<FileEditOutcome> {
        self.apply(
            &plan.edits,
            BatchOptions {
                dry_run: plan.dry_run,
                output_diff: plan.output_diff,
            },
        )
    }

    /// Apply `requests`, one outcome per distinct path in first-appearance order.
    pub fn apply(&self, requests: &[EditRequest], options: BatchOptions) -> Vec<FileEditOutcome> {
        group_by_path(requests)
            .into_iter()
            .map(|(path, group)| {
                let group: Vec<EditRequest> = group.into_iter().cloned().collect();
                let outcome = match self.process_file(path, &group, options) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        error!(path, error = %e, "file edit failed");
                        FileEditOutcome::failed(path, e.to_string())
                    }
                };
                info!(path, status = %outcome.status, "file processed");
                outcome
            })
            .collect()
    }

    fn process_file(
        &self,
        path: &str,
        requests: &[EditRequest],
        options: BatchOptions,
    ) -> Result<FileEditOutcome, FileError> {
        let absolute = self.resolver.resolve(path)?;
        let original = self.store.read(&absolute)?;

        let summary = apply_file_changes(&original, requests);
        if !summary.changed() {
            return Ok(FileEditOutcome {
                path: path.to_string(),
                status: FileStatus::Skipped,
                message: Some(summary.message()),
                diff: None,
            });
        }

        // An edit can apply and still leave the bytes as they were.
        let diff = (options.output_diff && summary.content != original).then(|| {
            self.differ
                .render(path, &original, &summary.content)
                .unwrap_or_else(|e| placeholder(&e))
        });

        let mut message = summary.message();
        if options.dry_run {
            message.push_str(" (dry run)");
        } else {
            self.store.write(&absolute, &summary.content)?;
        }

        Ok(FileEditOutcome {
            path: path.to_string(),
            status: FileStatus::Success,
            message: Some(message),
            diff,
        })
    }
}
