//! Batch runs against a real temporary workspace.

use batch_edit::{
    load_from_path, BatchEditor, BatchOptions, EditRequest, FileStatus, FsStore, WorkspaceGuard,
};
use std::fs;
use tempfile::TempDir;

/// Helper to create a temp workspace with a couple of source files
fn setup_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();

    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(
        dir.path().join("src/app.py"),
        r#"def main():
    greet("world")
    greet("again")


def greet(name):
    print(name)
"#,
    )
    .unwrap();
    fs::write(dir.path().join("README.md"), "# Demo\n").unwrap();

    dir
}

#[test]
fn test_plan_applies_across_files() {
    let workspace = setup_workspace();
    let plan_path = workspace.path().join("plan.json");
    fs::write(
        &plan_path,
        r#"{
  "output_diff": true,
  "edits": [
    {"path": "src/app.py", "start_line": 1, "search_pattern": "greet\\(\"\\w+\"\\)",
     "replace_content": "greet(\"everyone\")", "use_regex": true, "match_occurrence": 2},
    {"path": "README.md", "start_line": 2, "replace_content": "Usage notes."},
    {"path": "src/app.py", "start_line": 7, "search_pattern": "print(name)",
     "replace_content": "print(f\"hello {name}\")"}
  ]
}"#,
    )
    .unwrap();

    let plan = load_from_path(&plan_path).unwrap();
    let guard = WorkspaceGuard::new(workspace.path()).unwrap();
    let editor = BatchEditor::new(&guard, &FsStore);
    let outcomes = editor.apply_plan(&plan);

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].path, "src/app.py");
    assert_eq!(outcomes[0].status, FileStatus::Success);
    assert_eq!(outcomes[1].path, "README.md");
    assert_eq!(outcomes[1].status, FileStatus::Success);

    let app = fs::read_to_string(workspace.path().join("src/app.py")).unwrap();
    assert!(app.contains("    greet(\"world\")\n    greet(\"everyone\")\n"));
    assert!(app.contains("    print(f\"hello {name}\")\n"));

    let readme = fs::read_to_string(workspace.path().join("README.md")).unwrap();
    assert_eq!(readme, "# Demo\nUsage notes.\n");

    let diff = outcomes[0].diff.as_deref().unwrap();
    assert!(diff.starts_with("--- src/app.py\n+++ src/app.py\n"));
    assert!(diff.contains("-    greet(\"again\")"));
}

#[test]
fn test_dry_run_leaves_files_untouched() {
    let workspace = setup_workspace();
    let before = fs::read_to_string(workspace.path().join("src/app.py")).unwrap();

    let guard = WorkspaceGuard::new(workspace.path()).unwrap();
    let editor = BatchEditor::new(&guard, &FsStore);
    let outcomes = editor.apply(
        &[EditRequest::delete("src/app.py", 1, "greet(\"again\")")],
        BatchOptions {
            dry_run: true,
            output_diff: true,
        },
    );

    assert_eq!(outcomes[0].status, FileStatus::Success);
    assert!(outcomes[0].diff.is_some());
    let after = fs::read_to_string(workspace.path().join("src/app.py")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_escaping_and_missing_paths_fail_per_file() {
    let workspace = setup_workspace();
    let guard = WorkspaceGuard::new(workspace.path()).unwrap();
    let editor = BatchEditor::new(&guard, &FsStore);

    let outcomes = editor.apply(
        &[
            EditRequest::insert("../outside.txt", 1, "x"),
            EditRequest::insert("src/missing.py", 1, "x"),
            EditRequest::insert("README.md", 1, "<!-- generated -->"),
        ],
        BatchOptions::default(),
    );

    assert_eq!(outcomes[0].status, FileStatus::Failed);
    assert!(outcomes[0].message.as_deref().unwrap().contains("traversal"));
    assert_eq!(outcomes[1].status, FileStatus::Failed);
    assert!(outcomes[1].message.as_deref().unwrap().contains("file not found"));
    assert_eq!(outcomes[2].status, FileStatus::Success);
    assert!(!workspace.path().join("src/missing.py").exists());
}

#[test]
fn test_unmatched_only_request_is_skipped_not_failed() {
    let workspace = setup_workspace();
    let guard = WorkspaceGuard::new(workspace.path()).unwrap();
    let editor = BatchEditor::new(&guard, &FsStore);

    let outcomes = editor.apply(
        &[EditRequest::replace("README.md", 1, "# Missing", "# Found")],
        BatchOptions {
            dry_run: false,
            output_diff: true,
        },
    );

    assert_eq!(outcomes[0].status, FileStatus::Skipped);
    assert!(outcomes[0].diff.is_none());
    assert!(outcomes[0]
        .message
        .as_deref()
        .unwrap()
        .contains("pattern not found"));
}
