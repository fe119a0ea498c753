//! Pre-release labels, release scopes and sequence numbers
//!
//! A pre-release tag looks like `v1.2.0-alpha.3.20240521`: the label, a
//! sequence number scoped to the base version, and a date stamp.
//! According to semver.org: https://semver.org/#spec-item-9

use crate::domain::version::Version;
use crate::error::{AutoTagError, Result};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Date stamp format appended to pre-release tags
pub const DATE_STAMP_FORMAT: &str = "%Y%m%d";

/// Pre-release label (alpha, beta, rc or dev)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PreReleaseLabel {
    /// Alpha pre-release
    Alpha,
    /// Beta pre-release
    Beta,
    /// Release candidate
    ReleaseCandidate,
    /// Development snapshot
    Dev,
}

impl FromStr for PreReleaseLabel {
    type Err = AutoTagError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alpha" => Ok(PreReleaseLabel::Alpha),
            "beta" => Ok(PreReleaseLabel::Beta),
            "rc" => Ok(PreReleaseLabel::ReleaseCandidate),
            "dev" => Ok(PreReleaseLabel::Dev),
            _ => Err(AutoTagError::invalid_version(format!(
                "Invalid pre-release label: '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for PreReleaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseLabel::Alpha => write!(f, "alpha"),
            PreReleaseLabel::Beta => write!(f, "beta"),
            PreReleaseLabel::ReleaseCandidate => write!(f, "rc"),
            PreReleaseLabel::Dev => write!(f, "dev"),
        }
    }
}

/// Label of a parsed pre-release version (`alpha.2.20240102` -> alpha)
pub fn label_of(version: &Version) -> Option<PreReleaseLabel> {
    let pre = version.pre.as_deref()?;
    pre.split('.').next()?.parse().ok()
}

/// Tag-name prefix shared by every tag in a release scope for one label.
///
/// `scope_prefix(1.2.0, Alpha)` is `"v1.2.0-alpha."`.
pub fn scope_prefix(version: &Version, label: PreReleaseLabel) -> String {
    format!("v{}-{}.", version.core(), label)
}

/// Number of existing tags matching `v{version}-{label}.*`
pub fn count_in_scope(tags: &[String], version: &Version, label: PreReleaseLabel) -> usize {
    let prefix = scope_prefix(version, label);
    tags.iter().filter(|tag| tag.starts_with(&prefix)).count()
}

/// Whether any tag already exists for this version and label family
pub fn scope_already_tagged(tags: &[String], version: &Version, label: PreReleaseLabel) -> bool {
    count_in_scope(tags, version, label) > 0
}

/// Next sequence number within the release scope (1-based)
pub fn sequence_number(tags: &[String], version: &Version, label: PreReleaseLabel) -> usize {
    count_in_scope(tags, version, label) + 1
}

/// Format a date stamp (`YYYYMMDD`)
pub fn date_stamp(date: NaiveDate) -> String {
    date.format(DATE_STAMP_FORMAT).to_string()
}

/// Parse a date stamp (`YYYYMMDD`)
pub fn parse_date_stamp(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_STAMP_FORMAT).map_err(|e| {
        AutoTagError::invalid_version(format!("Invalid date stamp '{}': {}", s, e))
    })
}

/// Build the pre-release suffix, e.g. `-alpha.3.20240521`
pub fn build_suffix(label: PreReleaseLabel, sequence: usize, date: NaiveDate) -> String {
    format!("-{}.{}.{}", label, sequence, date_stamp(date))
}
