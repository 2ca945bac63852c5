//! Indentation handling for replacement and inserted text.
//!
//! The indentation of the surrounding context is prefixed to every line of
//! the replacement text. Whatever indentation the caller wrote is kept on top
//! of it, so the same request nests the same way under any context.

/// Where the indentation for a change is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentSource {
    /// The line containing this byte offset (regex matches).
    Offset(usize),
    /// This 0-based line (literal matches).
    Line(usize),
    /// The line preceding this 0-based insertion index.
    Before(usize),
}

/// Leading whitespace of a single line.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|&(_, c)| !c.is_whitespace() || c == '\r' || c == '\n')
        .map_or(line.len(), |(idx, _)| idx);
    &line[..end]
}

/// Indentation string to apply for a change, or `""` when preservation is off.
pub fn calculate_indent(content: &str, source: IndentSource, preserve: bool) -> &str {
    if !preserve {
        return "";
    }
    match source {
        IndentSource::Offset(offset) => line_indent_at_offset(content, offset),
        IndentSource::Line(index) => content.split('\n').nth(index).map_or("", leading_whitespace),
        IndentSource::Before(0) => "",
        IndentSource::Before(index) => content
            .split('\n')
            .nth(index - 1)
            .map_or("", leading_whitespace),
    }
}

fn line_indent_at_offset(content: &str, offset: usize) -> &str {
    let offset = offset.min(content.len());
    let line_start = content[..offset].rfind('\n').map_or(0, |idx| idx + 1);
    let rest = &content[line_start..];
    let line = rest.split('\n').next().unwrap_or(rest);
    leading_whitespace(line)
}

/// Prefix `indent` to every line of `text`.
///
/// With `indent_first == false` the first line is left bare, for text that
/// continues an existing line.
pub fn reindent(text: &str, indent: &str, indent_first: bool) -> String {
    if indent.is_empty() {
        return text.to_string();
    }

    text.split('\n')
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 && !indent_first {
                line.to_string()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
