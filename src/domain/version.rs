use crate::domain::strategy::BumpKind;
use crate::error::{AutoTagError, Result};
use regex::Regex;
use std::fmt;

/// Pre-release labels accepted when extracting the base version of a tag.
///
/// A label only matches when followed by `.` or the end of the pre-release,
/// so `-rc` never matches `-release-candidate`.
const RECOGNIZED_SUFFIXES: &str = "alpha|beta|rc|stable|dev";

/// Semantic version representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
    pub build: Option<String>,
}

impl Version {
    /// Create a new version without pre-release or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: None,
            build: None,
        }
    }

    /// `0.0.0`, the base used when no usable tag exists
    pub fn zero() -> Self {
        Version::new(0, 0, 0)
    }

    pub fn with_pre(mut self, pre: impl Into<String>) -> Self {
        self.pre = Some(pre.into());
        self
    }

    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    /// The `major.minor.patch` triple alone
    pub fn core(&self) -> Version {
        Version::new(self.major, self.minor, self.patch)
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    /// Parse a version from a tag (e.g., "v1.2.0-alpha.2.20240102+build.7").
    ///
    /// Strips an optional leading `v`; the rest must be a semantic version
    /// (no leading zeros) whose pre-release, if any, starts with one of the
    /// recognized labels (`alpha`, `beta`, `rc`, `stable`, `dev`).
    pub fn parse_tag(tag: &str) -> Result<Self> {
        let text = tag.strip_prefix('v').unwrap_or(tag);
        let parsed = semver::Version::parse(text).map_err(|e| {
            AutoTagError::invalid_version(format!(
                "'{}' - expected vX.Y.Z[-label...][+build]: {}",
                tag, e
            ))
        })?;

        let label = Regex::new(&format!(r"^(?:{})(?:\.|$)", RECOGNIZED_SUFFIXES))
            .map_err(|e| AutoTagError::invalid_version(format!("Bad label pattern: {}", e)))?;
        if !parsed.pre.is_empty() && !label.is_match(parsed.pre.as_str()) {
            return Err(AutoTagError::invalid_version(format!(
                "'{}' - unrecognized pre-release '{}'",
                tag, parsed.pre
            )));
        }

        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre: non_empty(parsed.pre.as_str()),
            build: non_empty(parsed.build.as_str()),
        })
    }

    /// Bump the core version; pre-release and build metadata are dropped
    ///
    /// # Returns
    /// * `Ok(Version)` - The bumped version
    /// * `Err(InvalidVersionFormat)` - If the bumped component would overflow
    pub fn bump(&self, bump_kind: BumpKind) -> Result<Self> {
        let overflow = |name: &str, value: u64| {
            AutoTagError::invalid_version(format!(
                "{} version {} of {} cannot be incremented",
                name, value, self
            ))
        };

        match bump_kind {
            BumpKind::None => Ok(self.core()),
            BumpKind::Major => {
                let major = self
                    .major
                    .checked_add(1)
                    .ok_or_else(|| overflow("major", self.major))?;
                Ok(Version::new(major, 0, 0))
            }
            BumpKind::Minor => {
                let minor = self
                    .minor
                    .checked_add(1)
                    .ok_or_else(|| overflow("minor", self.minor))?;
                Ok(Version::new(self.major, minor, 0))
            }
            BumpKind::Patch => {
                let patch = self
                    .patch
                    .checked_add(1)
                    .ok_or_else(|| overflow("patch", self.patch))?;
                Ok(Version::new(self.major, self.minor, patch))
            }
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::zero()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

/// Extract the version of the latest tag.
///
/// No tag yields `0.0.0`. A tag that cannot be parsed is an
/// [`AutoTagError::InvalidVersionFormat`]; callers recover with `0.0.0`.
pub fn extract_version(latest_tag: Option<&str>) -> Result<Version> {
    match latest_tag {
        Some(tag) => Version::parse_tag(tag),
        None => Ok(Version::zero()),
    }
}

/// Extract the base `major.minor.patch` of the latest tag
pub fn extract_base_version(latest_tag: Option<&str>) -> Result<Version> {
    extract_version(latest_tag).map(|v| v.core())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse_tag("v1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
        assert!(!v.is_prerelease());
    }

    #[test]
    fn test_version_parse_without_v() {
        let v = Version::parse_tag("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_alpha_tag_keeps_suffix_separately() {
        let v = Version::parse_tag("v1.2.0-alpha.2.20240102").unwrap();
        assert_eq!(v.core(), Version::new(1, 2, 0));
        assert_eq!(v.pre.as_deref(), Some("alpha.2.20240102"));
        assert!(v.is_prerelease());
    }

    #[test]
    fn test_parse_every_recognized_label() {
        for tag in [
            "v3.1.4-alpha.1.20240101",
            "v3.1.4-beta.7.20240101",
            "v3.1.4-rc.2.20240101",
            "v3.1.4-stable",
            "v3.1.4-dev",
            "v3.1.4-dev.1.20240101",
        ] {
            let v = Version::parse_tag(tag).unwrap();
            assert_eq!(v.core(), Version::new(3, 1, 4), "{}", tag);
        }
    }

    #[test]
    fn test_parse_build_metadata() {
        let v = Version::parse_tag("v1.0.0+20231201").unwrap();
        assert_eq!(v.core(), Version::new(1, 0, 0));
        assert_eq!(v.build.as_deref(), Some("20231201"));

        let v = Version::parse_tag("v1.0.0-beta.1+exp.sha.5114f85").unwrap();
        assert_eq!(v.pre.as_deref(), Some("beta.1"));
        assert_eq!(v.build.as_deref(), Some("exp.sha.5114f85"));
    }

    #[test]
    fn test_rc_does_not_swallow_longer_labels() {
        assert!(Version::parse_tag("v1.2.0-release-candidate").is_err());
        assert!(Version::parse_tag("v1.2.0-development").is_err());
        assert!(Version::parse_tag("v1.2.0-alphabet.1").is_err());
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse_tag("1.2").is_err());
        assert!(Version::parse_tag("v1.2.3.4").is_err());
        assert!(Version::parse_tag("release-1.2.3").is_err());
        assert!(Version::parse_tag("V1.2.3").is_err());
        assert!(Version::parse_tag("v1.2.3-custom").is_err());
        assert!(Version::parse_tag("").is_err());
    }

    #[test]
    fn test_version_parse_overflow_is_invalid() {
        let err = Version::parse_tag("v99999999999999999999.0.0").unwrap_err();
        assert!(matches!(err, AutoTagError::InvalidVersionFormat(_)));
    }

    #[test]
    fn test_extract_base_version() {
        assert_eq!(extract_base_version(None).unwrap(), Version::zero());
        assert_eq!(
            extract_base_version(Some("v1.2.0-alpha.2.20240102")).unwrap(),
            Version::new(1, 2, 0)
        );
        assert!(extract_base_version(Some("nightly")).is_err());
    }

    #[test]
    fn test_version_bump() {
        let v = Version::new(1, 2, 3).with_pre("rc.1");
        assert_eq!(v.bump(BumpKind::Major).unwrap(), Version::new(2, 0, 0));
        assert_eq!(v.bump(BumpKind::Minor).unwrap(), Version::new(1, 3, 0));
        assert_eq!(v.bump(BumpKind::Patch).unwrap(), Version::new(1, 2, 4));
        assert_eq!(v.bump(BumpKind::None).unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_bump_overflow_is_invalid() {
        let v = Version::parse_tag("v1.2.18446744073709551615").unwrap();
        assert!(matches!(
            v.bump(BumpKind::Patch),
            Err(AutoTagError::InvalidVersionFormat(_))
        ));
        assert_eq!(v.bump(BumpKind::Minor).unwrap(), Version::new(1, 3, 0));

        let v = Version::new(u64::MAX, 0, 0);
        assert!(v.bump(BumpKind::Major).is_err());
        assert_eq!(v.bump(BumpKind::None).unwrap(), v);
    }

    #[test]
    fn test_leading_zeros_are_invalid() {
        assert!(Version::parse_tag("v02.0.0").is_err());
        assert!(Version::parse_tag("v1.02.0").is_err());
        assert!(Version::parse_tag("v1.0.0-alpha.01.20240101").is_err());
        assert!(Version::parse_tag("v0.0.0").is_ok());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
        assert_eq!(
            Version::new(1, 2, 3).with_pre("beta.1").with_build("7").to_string(),
            "1.2.3-beta.1+7"
        );
    }

    #[test]
    fn test_display_round_trips_numeric_components() {
        for tag in ["v0.0.1", "v10.20.30-rc.3.20240101", "v1.0.0+build.9"] {
            let v = Version::parse_tag(tag).unwrap();
            let reparsed = Version::parse_tag(&v.to_string()).unwrap();
            assert_eq!(reparsed.core(), v.core());
        }
    }
}
