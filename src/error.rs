use thiserror::Error;

/// Unified error type for autotag operations
#[derive(Error, Debug)]
pub enum AutoTagError {
    #[error("Not a git repository: {0}")]
    NotARepository(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Invalid version format: {0}")]
    InvalidVersionFormat(String),

    #[error("Working tree has uncommitted changes ({} files)", .changes.len())]
    DirtyWorkingTree { changes: Vec<String> },

    #[error("Failed to create tag '{tag}': {reason}")]
    TagCreationFailed { tag: String, reason: String },

    #[error("Failed to push tag '{tag}' to '{remote}': {reason}")]
    PushFailed {
        tag: String,
        remote: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in autotag
pub type Result<T> = std::result::Result<T, AutoTagError>;

impl AutoTagError {
    /// Create a not-a-repository error with context
    pub fn not_a_repository(msg: impl Into<String>) -> Self {
        AutoTagError::NotARepository(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        AutoTagError::Branch(msg.into())
    }

    /// Create a version format error with context
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        AutoTagError::InvalidVersionFormat(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        AutoTagError::Config(msg.into())
    }

    pub fn tag_creation(tag: impl Into<String>, reason: impl ToString) -> Self {
        AutoTagError::TagCreationFailed {
            tag: tag.into(),
            reason: reason.to_string(),
        }
    }

    pub fn push(tag: impl Into<String>, remote: impl Into<String>, reason: impl ToString) -> Self {
        AutoTagError::PushFailed {
            tag: tag.into(),
            remote: remote.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the planner may continue after this error.
    ///
    /// Only a malformed version is recovered (by falling back to `0.0.0`);
    /// everything else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AutoTagError::InvalidVersionFormat(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AutoTagError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AutoTagError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_dirty_working_tree_counts_files() {
        let err = AutoTagError::DirtyWorkingTree {
            changes: vec![" M src/lib.rs".to_string(), "?? notes.txt".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Working tree has uncommitted changes (2 files)"
        );
    }

    #[test]
    fn test_tag_and_push_failures_name_the_tag() {
        let err = AutoTagError::tag_creation("v1.2.3", "reference already exists");
        assert_eq!(
            err.to_string(),
            "Failed to create tag 'v1.2.3': reference already exists"
        );

        let err = AutoTagError::push("v1.2.3", "origin", "network unreachable");
        let msg = err.to_string();
        assert!(msg.contains("v1.2.3"));
        assert!(msg.contains("origin"));
        assert!(msg.contains("network unreachable"));
    }

    #[test]
    fn test_only_version_format_is_recoverable() {
        assert!(AutoTagError::invalid_version("v1.x").is_recoverable());
        assert!(!AutoTagError::not_a_repository("/tmp").is_recoverable());
        assert!(!AutoTagError::branch("detached HEAD").is_recoverable());
        assert!(!AutoTagError::DirtyWorkingTree { changes: vec![] }.is_recoverable());
        assert!(!AutoTagError::tag_creation("v1.0.0", "boom").is_recoverable());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (AutoTagError::not_a_repository("x"), "Not a git repository"),
            (AutoTagError::branch("x"), "Branch error"),
            (AutoTagError::invalid_version("x"), "Invalid version format"),
            (AutoTagError::config("x"), "Configuration error"),
            (AutoTagError::tag_creation("x", "y"), "Failed to create tag"),
            (AutoTagError::push("x", "o", "y"), "Failed to push tag"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
