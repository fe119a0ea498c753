use std::fmt;

/// Non-fatal conditions met while reading repository facts.
/// These are reported to the user and planning continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryWarning {
    /// Latest tag exists but cannot be parsed; `0.0.0` is used instead
    UnparsableTag { tag: String, reason: String },
    /// The repository has no tags at all
    NoTagsFound,
    /// Tags that do not follow semantic versioning
    NonSemverTags { tags: Vec<String> },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {} (using 0.0.0)", tag, reason)
            }
            BoundaryWarning::NoTagsFound => {
                write!(f, "No tags found in the repository (starting from 0.0.0)")
            }
            BoundaryWarning::NonSemverTags { tags } => {
                write!(
                    f,
                    "{} tag(s) do not follow semantic versioning: {}",
                    tags.len(),
                    tags.join(", ")
                )
            }
        }
    }
}
