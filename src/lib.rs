//! Batch Edit: occurrence-indexed text edits for automated callers
//!
//! Applies insertions, deletions and replacements to files, located by line
//! position and/or pattern, and reports a per-file outcome with an optional
//! unified diff.
//!
//! # Architecture
//!
//! The [`engine`] is pure: given a file's text and its [`EditRequest`]s it
//! locates the requested occurrence of each pattern (literal multi-line text
//! or a regex), rewrites the content while keeping surrounding indentation,
//! and returns the new text. Everything that touches the outside world sits
//! behind a trait in the batch layer:
//!
//! - [`PathResolver`] maps request paths into the workspace ([`WorkspaceGuard`])
//! - [`ContentStore`] reads and writes content ([`FsStore`], atomic writes)
//! - [`DiffRenderer`] formats diffs ([`UnifiedDiff`])
//!
//! # Ordering
//!
//! Requests for one file are applied bottom-to-top (descending `start_line`)
//! so anchors written against the original file stay valid. Overlapping
//! requests are not detected.
//!
//! # Example
//!
//! ```
//! use batch_edit::{apply_file_changes, EditRequest};
//!
//! let requests = vec![
//!     EditRequest::replace("app.py", 1, "foo", "baz").occurrence(2),
//! ];
//! let summary = apply_file_changes("foo\nbar\nfoo\nbar", &requests);
//!
//! assert!(summary.changed());
//! assert_eq!(summary.content, "foo\nbar\nbaz\nbar");
//! ```

pub mod batch;
pub mod config;
pub mod diff;
pub mod edit;
pub mod engine;
pub mod safety;
pub mod store;

// Re-exports
pub use batch::{BatchEditor, BatchOptions, FileEditOutcome, FileStatus};
pub use config::{load_from_path, load_from_str, ConfigError, EditPlan, PlanFormat};
pub use diff::{DiffError, DiffRenderer, UnifiedDiff};
pub use edit::{EditKind, EditRequest};
pub use engine::{
    apply_change, apply_file_changes, Change, ChangeError, FileChangeSummary, MatchSpan,
    RequestSkip,
};
pub use safety::{PathResolver, SafetyError, WorkspaceGuard};
pub use store::{ContentStore, FsStore, MemoryStore, StoreError};
