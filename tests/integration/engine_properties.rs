//! Observable engine behaviour, driven through the public API only.

use batch_edit::engine::find_regex_match;
use batch_edit::{
    apply_file_changes, BatchEditor, BatchOptions, EditRequest, FileStatus, MatchSpan,
    MemoryStore, PathResolver, SafetyError,
};
use proptest::prelude::*;
use regex::Regex;
use std::path::PathBuf;

struct Relative;

impl PathResolver for Relative {
    fn resolve(&self, path: &str) -> Result<PathBuf, SafetyError> {
        Ok(PathBuf::from(path))
    }
}

fn run_single(content: &str, request: EditRequest) -> (String, FileStatus) {
    let store = MemoryStore::new().with_file("f.txt", content);
    let editor = BatchEditor::new(&Relative, &store);
    let outcomes = editor.apply(&[request], BatchOptions::default());
    (store.get("f.txt").unwrap(), outcomes[0].status)
}

#[test]
fn test_insert_before_first_line() {
    let (content, status) = run_single("line1\nline2", EditRequest::insert("f.txt", 1, "NEW"));
    assert_eq!(content, "NEW\nline1\nline2");
    assert_eq!(status, FileStatus::Success);
}

#[test]
fn test_insert_before_second_line() {
    let (content, _) = run_single("line1\nline2", EditRequest::insert("f.txt", 2, "NEW"));
    assert_eq!(content, "line1\nNEW\nline2");
}

#[test]
fn test_literal_replace_targets_second_occurrence() {
    let request = EditRequest::replace("f.txt", 1, "foo", "baz").occurrence(2);
    let (content, _) = run_single("foo\nbar\nfoo\nbar", request);
    assert_eq!(content, "foo\nbar\nbaz\nbar");
}

#[test]
fn test_regex_delete_targets_second_occurrence() {
    let request = EditRequest::delete("f.txt", 1, r"\d+").regex().occurrence(2);
    let (content, _) = run_single("abc123def456", request);
    assert_eq!(content, "abc123def");
}

#[test]
fn test_occurrence_beyond_matches_skips_file() {
    let request = EditRequest::replace("f.txt", 1, "foo", "baz").occurrence(3);
    let (content, status) = run_single("foo\nbar\nfoo\nbar", request);
    assert_eq!(content, "foo\nbar\nfoo\nbar");
    assert_eq!(status, FileStatus::Skipped);
}

#[test]
fn test_replacement_reuses_replaced_line_indent() {
    let request = EditRequest::replace("f.txt", 1, "    pass", "stop").preserve_indentation(true);
    let (content, _) = run_single("  if x:\n    pass", request);
    assert_eq!(content, "  if x:\n    stop");
}

#[test]
fn test_skipped_file_has_no_diff() {
    let store = MemoryStore::new().with_file("f.txt", "nothing to see");
    let editor = BatchEditor::new(&Relative, &store);
    let outcomes = editor.apply(
        &[EditRequest::delete("f.txt", 1, "absent")],
        BatchOptions {
            dry_run: false,
            output_diff: true,
        },
    );
    assert_eq!(outcomes[0].status, FileStatus::Skipped);
    assert!(outcomes[0].diff.is_none());
}

#[test]
fn test_regex_anchor_is_advisory_literal_anchor_is_a_bound() {
    let content = "value = 1\nother\nvalue = 1";

    let regex = EditRequest::replace("f.txt", 3, r"value = \d", "value = 2").regex();
    assert_eq!(
        apply_file_changes(content, &[regex]).content,
        "value = 2\nother\nvalue = 1"
    );

    let literal = EditRequest::replace("f.txt", 3, "value = 1", "value = 2");
    assert_eq!(
        apply_file_changes(content, &[literal]).content,
        "value = 1\nother\nvalue = 2"
    );
}

#[test]
fn test_bottom_up_ordering_is_observable() {
    // Authored top-down against the original file; line 4 is "d" before any edit.
    let requests = vec![
        EditRequest::insert("f.txt", 2, "after-a"),
        EditRequest::replace("f.txt", 4, "d", "D"),
    ];
    let summary = apply_file_changes("a\nb\nc\nd", &requests);
    assert_eq!(summary.content, "a\nafter-a\nb\nc\nD");
}

#[test]
fn test_multi_line_literal_replace_with_indentation() {
    let content = "class A:\n    def f(self):\n        return 1\n";
    let request = EditRequest::replace(
        "f.txt",
        1,
        "def f(self):\n    return 1",
        "def f(self):\n    x = 2\n    return x",
    );
    let summary = apply_file_changes(content, &[request]);
    assert_eq!(
        summary.content,
        "class A:\n    def f(self):\n        x = 2\n        return x\n"
    );
}

proptest! {
    #[test]
    fn prop_empty_request_list_is_identity(content in ".*") {
        let summary = apply_file_changes(&content, &[]);
        prop_assert!(!summary.changed());
        prop_assert_eq!(&summary.content, &content);
    }

    #[test]
    fn prop_regex_locator_terminates_in_bounds(
        content in "[a-c\\n é]{0,40}",
        pattern in prop::sample::select(vec!["", "a*", "b?", "\\s*", "(?m)^", "$", "c+"]),
        occurrence in 1usize..60,
    ) {
        let re = Regex::new(pattern).unwrap();
        if let Some(MatchSpan::Chars { start, end }) = find_regex_match(&content, &re, occurrence) {
            prop_assert!(start <= end);
            prop_assert!(end <= content.len());
            prop_assert!(content.is_char_boundary(start));
            prop_assert!(content.is_char_boundary(end));
        }
    }
}
