//! Single-request content transformation.
//!
//! [`apply_change`] is pure: it takes the current content and one request and
//! returns the new content together with whether anything changed. Only the
//! orchestrator threads results from one request into the next.

use regex::Regex;

use super::errors::ChangeError;
use super::indent::{calculate_indent, reindent, IndentSource};
use super::locator::{find_literal_match, find_regex_match, LiteralQuery, MatchSpan};
use crate::edit::{EditKind, EditRequest};

/// Result of applying one request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Change carries the new content"]
pub struct Change {
    pub content: String,
    /// `false` when the pattern was not found; `content` is then unchanged
    pub applied: bool,
}

impl Change {
    fn unchanged(content: &str) -> Self {
        Self {
            content: content.to_string(),
            applied: false,
        }
    }

    fn applied(content: String) -> Self {
        Self {
            content,
            applied: true,
        }
    }
}

/// Apply `request` to `content`.
pub fn apply_change(content: &str, request: &EditRequest) -> Result<Change, ChangeError> {
    match request.kind()? {
        EditKind::Insert { content: text } => Ok(insert_lines(content, request, text)),
        EditKind::Replace { pattern, content: text } => {
            substitute(content, request, pattern, Some(text))
        }
        EditKind::Delete { pattern } => substitute(content, request, pattern, None),
    }
}

fn insert_lines(content: &str, request: &EditRequest, text: &str) -> Change {
    let lines: Vec<&str> = content.split('\n').collect();
    let index = request.start_line.saturating_sub(1).min(lines.len());

    let indent = calculate_indent(
        content,
        IndentSource::Before(index),
        request.preserve_indentation,
    );
    let block = block_lines(
        &reindent(text, indent, true),
        uses_crlf(content),
        index == lines.len(),
    );

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + block.len());
    out.extend_from_slice(&lines[..index]);
    out.extend(block.iter().map(String::as_str));
    out.extend_from_slice(&lines[index..]);
    Change::applied(out.join("\n"))
}

fn uses_crlf(content: &str) -> bool {
    content.contains("\r\n")
}

/// Split `block` into lines to splice between `\n`-separated content lines.
///
/// In CRLF content every line gets its `\r` back, except a final line that
/// ends up last in the file (`at_end`) since no newline follows it.
fn block_lines(block: &str, crlf: bool, at_end: bool) -> Vec<String> {
    if !crlf {
        return block.split('\n').map(str::to_string).collect();
    }

    let count = block.split('\n').count();
    block
        .split('\n')
        .enumerate()
        .map(|(idx, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if at_end && idx + 1 == count {
                line.to_string()
            } else {
                format!("{line}\r")
            }
        })
        .collect()
}

/// Locate the requested match and substitute it, or remove it when
/// `replacement` is `None`.
fn substitute(
    content: &str,
    request: &EditRequest,
    pattern: &str,
    replacement: Option<&str>,
) -> Result<Change, ChangeError> {
    if request.use_regex {
        let compiled = Regex::new(pattern).map_err(|e| ChangeError::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        let Some(MatchSpan::Chars { start, end }) =
            find_regex_match(content, &compiled, request.match_occurrence)
        else {
            return Ok(Change::unchanged(content));
        };
        Ok(Change::applied(splice_chars(
            content,
            request,
            start,
            end,
            replacement,
        )))
    } else {
        let lines: Vec<&str> = content.split('\n').collect();
        let query = LiteralQuery {
            pattern,
            start_line: request.start_line,
            occurrence: request.match_occurrence,
            ignore_leading_whitespace: request.ignore_leading_whitespace,
        };
        let Some(MatchSpan::Lines { start, end }) = find_literal_match(&lines, &query) else {
            return Ok(Change::unchanged(content));
        };
        Ok(Change::applied(splice_lines(
            content,
            &lines,
            request,
            start,
            end,
            replacement,
        )))
    }
}

fn splice_chars(
    content: &str,
    request: &EditRequest,
    start: usize,
    end: usize,
    replacement: Option<&str>,
) -> String {
    let text = match replacement {
        Some(text) => {
            let indent = calculate_indent(
                content,
                IndentSource::Offset(start),
                request.preserve_indentation,
            );
            let at_line_start = start == 0 || content[..start].ends_with('\n');
            let text = reindent(text, indent, at_line_start);
            block_lines(&text, uses_crlf(content), true).join("\n")
        }
        None => String::new(),
    };

    let mut out = String::with_capacity(content.len() - (end - start) + text.len());
    out.push_str(&content[..start]);
    out.push_str(&text);
    out.push_str(&content[end..]);
    out
}

fn splice_lines(
    content: &str,
    lines: &[&str],
    request: &EditRequest,
    start: usize,
    end: usize,
    replacement: Option<&str>,
) -> String {
    let block = replacement.map(|text| {
        let indent = calculate_indent(
            content,
            IndentSource::Line(start),
            request.preserve_indentation,
        );
        block_lines(
            &reindent(text, indent, true),
            uses_crlf(content),
            end == lines.len(),
        )
    });

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend_from_slice(&lines[..start]);
    if let Some(block) = &block {
        out.extend(block.iter().map(String::as_str));
    }
    out.extend_from_slice(&lines[end..]);
    out.join("\n")
}
