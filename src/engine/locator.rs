//! Occurrence-indexed match location.
//!
//! Two pattern languages are supported and they treat the anchor line
//! differently:
//!
//! - **Regex** matches are counted from the start of the whole content.
//!   `start_line` is advisory only and does not bound the scan.
//! - **Literal** multi-line blocks are searched from `start_line` onwards.

use regex::Regex;

use super::indent::leading_whitespace;

/// Location of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSpan {
    /// Byte range `[start, end)` over the whole content (regex mode).
    Chars { start: usize, end: usize },
    /// Line range `[start, end)` over the content split on `\n` (literal mode).
    Lines { start: usize, end: usize },
}

/// Find the `occurrence`th (1-based) match of `pattern` in `content`.
///
/// Zero-width matches are counted like any other, after which the cursor
/// steps over one full character so the scan always makes progress.
pub fn find_regex_match(content: &str, pattern: &Regex, occurrence: usize) -> Option<MatchSpan> {
    if occurrence == 0 {
        return None;
    }

    let mut cursor = 0;
    let mut seen = 0;

    while cursor <= content.len() {
        let found = pattern.find_at(content, cursor)?;
        seen += 1;
        if seen == occurrence {
            return Some(MatchSpan::Chars {
                start: found.start(),
                end: found.end(),
            });
        }

        cursor = if found.start() == found.end() {
            let step = content[found.end()..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            found.end() + step
        } else {
            found.end()
        };
    }

    None
}

/// Options for literal block matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralQuery<'a> {
    pub pattern: &'a str,
    /// 1-based; scanning starts at `start_line - 1`
    pub start_line: usize,
    pub occurrence: usize,
    pub ignore_leading_whitespace: bool,
}

/// Find the `occurrence`th block of lines in `lines` equal to the query pattern.
pub fn find_literal_match(lines: &[&str], query: &LiteralQuery<'_>) -> Option<MatchSpan> {
    if query.occurrence == 0 {
        return None;
    }

    let pattern_lines: Vec<&str> = query.pattern.split('\n').collect();
    let first = query.start_line.saturating_sub(1);
    let last = lines.len().checked_sub(pattern_lines.len())?;

    let mut seen = 0;
    for candidate in first..=last {
        let block = &lines[candidate..candidate + pattern_lines.len()];
        let matched = pattern_lines
            .iter()
            .zip(block)
            .all(|(expected, actual)| lines_equal(expected, actual, query.ignore_leading_whitespace));

        if matched {
            seen += 1;
            if seen == query.occurrence {
                return Some(MatchSpan::Lines {
                    start: candidate,
                    end: candidate + pattern_lines.len(),
                });
            }
        }
    }

    None
}

fn lines_equal(expected: &str, actual: &str, ignore_leading_whitespace: bool) -> bool {
    // CRLF content splits on '\n' and leaves the '\r' behind.
    let expected = expected.strip_suffix('\r').unwrap_or(expected);
    let actual = actual.strip_suffix('\r').unwrap_or(actual);

    // Blank pattern lines are compared verbatim so they still have to line up.
    if ignore_leading_whitespace && !expected.trim().is_empty() {
        let expected = &expected[leading_whitespace(expected).len()..];
        let actual = &actual[leading_whitespace(actual).len()..];
        expected == actual
    } else {
        expected == actual
    }
}
