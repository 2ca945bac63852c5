use thiserror::Error;

/// Request-local failures. None of these abort the remaining requests for a file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangeError {
    #[error("invalid regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("request at line {start_line} has neither search_pattern nor replace_content")]
    MissingContent { start_line: usize },
}
