use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Maps caller-supplied relative paths to absolute paths the batch layer may touch.
pub trait PathResolver {
    fn resolve(&self, path: &str) -> Result<PathBuf, SafetyError>;
}

/// Workspace safety checks to prevent editing files outside the target workspace.
#[derive(Debug, Clone)]
pub struct WorkspaceGuard {
    /// Absolute path to workspace root
    workspace_root: PathBuf,
    /// Canonical paths to forbidden directories
    forbidden_paths: Vec<PathBuf>,
}

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("Path is empty")]
    EmptyPath,

    #[error("Absolute paths are not allowed: {0}")]
    AbsolutePath(String),

    #[error("Path traversal is not allowed: {0}")]
    Traversal(String),

    #[error("Path is outside workspace: {path} (workspace: {workspace})")]
    OutsideWorkspace { path: PathBuf, workspace: PathBuf },

    #[error("Path is in forbidden directory: {path} (forbidden: {forbidden})")]
    ForbiddenPath { path: PathBuf, forbidden: PathBuf },

    #[error("Failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),
}

impl WorkspaceGuard {
    /// Create a new workspace guard with the given root.
    ///
    /// The workspace root will be canonicalized to handle symlinks correctly.
    /// `.git` inside the workspace is forbidden.
    pub fn new(workspace_root: impl AsRef<Path>) -> Result<Self, SafetyError> {
        let workspace_root = workspace_root.as_ref().canonicalize()?;

        let mut forbidden_paths = Vec::new();
        if let Ok(git_dir) = workspace_root.join(".git").canonicalize() {
            forbidden_paths.push(git_dir);
        }

        Ok(Self {
            workspace_root,
            forbidden_paths,
        })
    }

    /// Create a guard with custom forbidden paths.
    pub fn with_forbidden(
        workspace_root: impl AsRef<Path>,
        forbidden: Vec<PathBuf>,
    ) -> Result<Self, SafetyError> {
        let workspace_root = workspace_root.as_ref().canonicalize()?;
        let forbidden_paths = forbidden
            .into_iter()
            .map(|path| path.canonicalize().unwrap_or(path))
            .collect();
        Ok(Self {
            workspace_root,
            forbidden_paths,
        })
    }

    /// Check a workspace-relative path and return the absolute path to use.
    ///
    /// The path must be relative and free of `..` components. Existing files
    /// are canonicalized so symlinks cannot lead outside the workspace; for
    /// files that do not exist yet the nearest existing ancestor is checked.
    pub fn validate_path(&self, path: &str) -> Result<PathBuf, SafetyError> {
        if path.trim().is_empty() {
            return Err(SafetyError::EmptyPath);
        }

        let relative = Path::new(path);
        for component in relative.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => {
                    return Err(SafetyError::AbsolutePath(path.to_string()));
                }
                Component::ParentDir => return Err(SafetyError::Traversal(path.to_string())),
                Component::CurDir | Component::Normal(_) => {}
            }
        }

        let absolute = self.workspace_root.join(relative);

        if absolute.exists() {
            let canonical = absolute.canonicalize()?;
            self.check_canonical(&canonical)?;
            return Ok(canonical);
        }

        let ancestor = absolute
            .ancestors()
            .find(|candidate| candidate.exists())
            .unwrap_or(self.workspace_root.as_path())
            .canonicalize()?;
        self.check_canonical(&ancestor)?;
        self.check_canonical(&absolute)?;
        Ok(absolute)
    }

    fn check_canonical(&self, canonical: &Path) -> Result<(), SafetyError> {
        // Check if inside workspace
        if !canonical.starts_with(&self.workspace_root) {
            return Err(SafetyError::OutsideWorkspace {
                path: canonical.to_path_buf(),
                workspace: self.workspace_root.clone(),
            });
        }

        // Check against forbidden paths
        for forbidden in &self.forbidden_paths {
            if canonical.starts_with(forbidden) {
                return Err(SafetyError::ForbiddenPath {
                    path: canonical.to_path_buf(),
                    forbidden: forbidden.clone(),
                });
            }
        }

        Ok(())
    }

    /// Get the workspace root.
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}

impl PathResolver for WorkspaceGuard {
    fn resolve(&self, path: &str) -> Result<PathBuf, SafetyError> {
        self.validate_path(path)
    }
}
