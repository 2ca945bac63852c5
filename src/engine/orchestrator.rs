//! Per-file orchestration of edit requests.
//!
//! Requests are applied bottom-to-top: they are stable-sorted by descending
//! `start_line` and run one after another against a single buffer. An edit
//! near the top of a file shifts every line below it, so working upwards keeps
//! each request's anchor valid against the file as the caller saw it.
//!
//! Overlapping requests are not detected. When two requests touch the same
//! region the one with the larger `start_line` runs first and the other sees
//! its result.

use tracing::{debug, warn};

use super::applicator::apply_change;
use super::indent::leading_whitespace;
use crate::edit::EditRequest;

/// Minimum similarity for a line to be offered as a near-miss hint.
const NEAR_MISS_THRESHOLD: f64 = 0.6;

/// A request that did not change the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSkip {
    /// Position of the request in the caller's list
    pub index: usize,
    pub start_line: usize,
    pub reason: String,
}

/// Aggregate result of running every request for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "FileChangeSummary carries the final content"]
pub struct FileChangeSummary {
    pub content: String,
    pub applied: usize,
    pub total: usize,
    pub skipped: Vec<RequestSkip>,
}

impl FileChangeSummary {
    /// At least one request changed the content.
    pub fn changed(&self) -> bool {
        self.applied > 0
    }

    /// Short human-readable account of what happened.
    pub fn message(&self) -> String {
        let mut message = if self.changed() {
            format!("Applied {} of {} edit(s)", self.applied, self.total)
        } else if self.total == 0 {
            "No edits requested".to_string()
        } else {
            "No edits applied".to_string()
        };

        if !self.skipped.is_empty() {
            let reasons: Vec<String> = self
                .skipped
                .iter()
                .map(|skip| format!("line {}: {}", skip.start_line, skip.reason))
                .collect();
            message.push_str(&format!("; skipped {}", reasons.join("; ")));
        }
        message
    }
}

/// Order in which requests are applied: descending `start_line`, ties kept in
/// input order. Each entry carries the request's original index.
pub fn application_order(requests: &[EditRequest]) -> Vec<(usize, &EditRequest)> {
    let mut ordered: Vec<(usize, &EditRequest)> = requests.iter().enumerate().collect();
    ordered.sort_by(|(_, a), (_, b)| b.start_line.cmp(&a.start_line));
    ordered
}

/// Apply every request in `requests` to `original`.
///
/// Never fails: problems with individual requests are logged and recorded in
/// [`FileChangeSummary::skipped`].
pub fn apply_file_changes(original: &str, requests: &[EditRequest]) -> FileChangeSummary {
    let mut content = original.to_string();
    let mut applied = 0;
    let mut skipped = Vec::new();

    for (index, request) in application_order(requests) {
        let reason = match apply_change(&content, request) {
            Ok(change) if change.applied => {
                debug!(
                    path = %request.path,
                    start_line = request.start_line,
                    "edit applied"
                );
                content = change.content;
                applied += 1;
                continue;
            }
            Ok(_) => not_found_reason(&content, request),
            Err(e) => e.to_string(),
        };

        warn!(
            path = %request.path,
            start_line = request.start_line,
            %reason,
            "edit skipped"
        );
        skipped.push(RequestSkip {
            index,
            start_line: request.start_line,
            reason,
        });
    }

    FileChangeSummary {
        content,
        applied,
        total: requests.len(),
        skipped,
    }
}

fn not_found_reason(content: &str, request: &EditRequest) -> String {
    let mut reason = if request.match_occurrence > 1 {
        format!("occurrence {} of pattern not found", request.match_occurrence)
    } else {
        "pattern not found".to_string()
    };

    if !request.use_regex {
        if let Some((line_no, line)) = request
            .search_pattern
            .as_deref()
            .and_then(|pattern| closest_line(content, pattern))
        {
            reason.push_str(&format!(" (closest match at line {line_no}: {:?})", line.trim()));
        }
    }
    reason
}

/// Best fuzzy match for the first non-blank pattern line, 1-based.
fn closest_line<'a>(content: &'a str, pattern: &str) -> Option<(usize, &'a str)> {
    let needle = pattern.split('\n').find(|line| !line.trim().is_empty())?;
    let needle = &needle[leading_whitespace(needle).len()..];

    content
        .split('\n')
        .enumerate()
        .map(|(idx, line)| {
            let candidate = &line[leading_whitespace(line).len()..];
            (idx, line, strsim::normalized_levenshtein(needle, candidate))
        })
        .filter(|&(_, _, score)| score >= NEAR_MISS_THRESHOLD && score < 1.0)
        .max_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(idx, line, _)| (idx + 1, line))
}
