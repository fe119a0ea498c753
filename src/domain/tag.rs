use crate::boundary::BoundaryWarning;
use crate::domain::plan::RepositoryFacts;
use crate::domain::prerelease::label_of;
use crate::domain::version::Version;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Prefix every generated tag carries
pub const TAG_PREFIX: &str = "v";

/// Format a tag name from a version and an optional pre-release suffix.
/// Example: version=1.2.0, suffix="-alpha.1.20240521" -> "v1.2.0-alpha.1.20240521"
pub fn format_tag(version: &Version, suffix: &str) -> String {
    format!("{}{}{}", TAG_PREFIX, version.core(), suffix)
}

fn semver_of(tag: &str) -> Option<semver::Version> {
    semver::Version::parse(tag.strip_prefix(TAG_PREFIX).unwrap_or(tag)).ok()
}

/// Check whether a tag follows semantic versioning (optional `v` prefix).
///
/// Uses the same parser as the tag ordering, so a tag is valid exactly when
/// it sorts among the versioned tags.
pub fn is_semver_tag(tag: &str) -> bool {
    semver_of(tag).is_some()
}

/// Sort tags descending by semantic version.
///
/// Tags that are not valid semantic versions sort after all valid ones,
/// alphabetically among themselves.
pub fn sort_tags_descending(mut tags: Vec<String>) -> Vec<String> {
    tags.sort_by(|a, b| match (semver_of(a), semver_of(b)) {
        (Some(va), Some(vb)) => vb.cmp(&va).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    });
    tags
}

/// Release scope a tag belongs to.
///
/// Pre-releases group by version and label (`v1.2.0-alpha.3.20240521` is in
/// `v1.2.0-alpha`); releases group by version. Tags that do not parse form
/// their own scope.
pub fn release_scope(tag: &str) -> String {
    match Version::parse_tag(tag) {
        Ok(version) => match label_of(&version) {
            Some(label) => format!("{}{}-{}", TAG_PREFIX, version.core(), label),
            None => format!("{}{}", TAG_PREFIX, version.core()),
        },
        Err(_) => tag.to_string(),
    }
}

/// Tags that share a release scope with at least one other tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub scope: String,
    /// Most recent first
    pub tags: Vec<String>,
}

/// Read-only report of tag proliferation per release scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateReport {
    pub total: usize,
    pub groups: Vec<DuplicateGroup>,
    /// Up to five most recent tags
    pub recent: Vec<String>,
}

impl DuplicateReport {
    const RECENT_LIMIT: usize = 5;

    /// Build the report from tags sorted most recent first
    pub fn from_tags(tags: &[String]) -> Self {
        let mut order: Vec<String> = Vec::new();
        let mut by_scope: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for tag in tags {
            let scope = release_scope(tag);
            let members = by_scope.entry(scope.clone()).or_default();
            if members.is_empty() {
                order.push(scope);
            }
            members.push(tag.clone());
        }

        let groups = order
            .into_iter()
            .filter_map(|scope| {
                let tags = by_scope.remove(&scope)?;
                (tags.len() > 1).then_some(DuplicateGroup { scope, tags })
            })
            .collect();

        DuplicateReport {
            total: tags.len(),
            groups,
            recent: tags.iter().take(Self::RECENT_LIMIT).cloned().collect(),
        }
    }

    /// Tags beyond the first in each duplicate group
    pub fn duplicate_count(&self) -> usize {
        self.groups.iter().map(|g| g.tags.len() - 1).sum()
    }

    pub fn unique_count(&self) -> usize {
        self.total - self.duplicate_count()
    }

    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }
}

/// Summary of the repository's tags for `--list-tags`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagListing {
    /// All tags, descending by semantic version
    pub tags: Vec<String>,
    pub latest: Option<String>,
    pub valid_count: usize,
    pub invalid: Vec<String>,
    pub head_tagged: bool,
    pub duplicates: DuplicateReport,
}

impl TagListing {
    pub fn from_facts(facts: &RepositoryFacts) -> Self {
        let invalid: Vec<String> = facts
            .tags
            .iter()
            .filter(|t| !is_semver_tag(t))
            .cloned()
            .collect();

        TagListing {
            tags: facts.tags.clone(),
            latest: facts.latest_tag().map(|s| s.to_string()),
            valid_count: facts.tags.len() - invalid.len(),
            invalid,
            head_tagged: !facts.head_tags.is_empty(),
            duplicates: DuplicateReport::from_tags(&facts.tags),
        }
    }

    pub fn is_latest(&self, tag: &str) -> bool {
        self.latest.as_deref() == Some(tag)
    }

    pub fn warnings(&self) -> Vec<BoundaryWarning> {
        if self.tags.is_empty() {
            vec![BoundaryWarning::NoTagsFound]
        } else if !self.invalid.is_empty() {
            vec![BoundaryWarning::NonSemverTags {
                tags: self.invalid.clone(),
            }]
        } else {
            Vec::new()
        }
    }
}
