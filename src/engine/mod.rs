//! The structural edit engine.
//!
//! Pure and synchronous: content in, content out. Reading and writing files
//! is the batch layer's job.

pub mod applicator;
pub mod errors;
pub mod indent;
pub mod locator;
pub mod orchestrator;

pub use applicator::{apply_change, Change};
pub use errors::ChangeError;
pub use indent::{calculate_indent, leading_whitespace, reindent, IndentSource};
pub use locator::{find_literal_match, find_regex_match, LiteralQuery, MatchSpan};
pub use orchestrator::{apply_file_changes, application_order, FileChangeSummary, RequestSkip};
