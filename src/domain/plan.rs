//! Tag planning: the decision core
//!
//! Given the facts read from a repository, [`VersionTagPlanner`] detects the
//! branch strategy, extracts the base version, computes the next version and
//! suffix, and decides whether creating a tag should be skipped. Planning is
//! pure: identical facts and date always produce an identical [`TagPlan`].

use crate::boundary::BoundaryWarning;
use crate::domain::prerelease::{self, PreReleaseLabel};
use crate::domain::strategy::{BranchCategory, BranchStrategy, BumpKind, StrategyTable};
use crate::domain::tag::format_tag;
use crate::domain::version::{extract_version, Version};
use crate::error::{AutoTagError, Result};
use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fmt;

/// Everything the planner needs to know about the repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryFacts {
    pub branch: String,
    /// All tags, descending by semantic version
    pub tags: Vec<String>,
    pub head_tags: BTreeSet<String>,
    /// Uncommitted changes, one porcelain-style line per path
    pub changes: Vec<String>,
}

impl RepositoryFacts {
    pub fn latest_tag(&self) -> Option<&str> {
        self.tags.first().map(|s| s.as_str())
    }

    pub fn working_tree_is_clean(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Why no new tag should be created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// HEAD already carries a tag
    CommitAlreadyTagged,
    /// An alpha tag already exists for the same base version
    ReleaseScopeAlreadyTagged,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::CommitAlreadyTagged => "tag already exists for this commit",
            SkipReason::ReleaseScopeAlreadyTagged => "release scope already tagged",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the planner derived from the facts before computing a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanContext {
    pub branch: String,
    pub strategy: BranchStrategy,
    pub latest_tag: Option<String>,
    /// Full version of the latest tag, pre-release included
    pub latest_version: Version,
    /// `major.minor.patch` of the latest tag
    pub base_version: Version,
    pub warnings: Vec<BoundaryWarning>,
}

/// The outcome of planning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPlan {
    pub context: PlanContext,
    pub next_version: Version,
    pub proposed_tag: String,
    pub skip: bool,
    pub reason: String,
    pub skip_reason: Option<SkipReason>,
}

/// Computes tag plans from repository facts
#[derive(Debug, Clone, Default)]
pub struct VersionTagPlanner {
    table: StrategyTable,
    bump_override: Option<BumpKind>,
}

impl VersionTagPlanner {
    pub fn new(table: StrategyTable) -> Self {
        VersionTagPlanner {
            table,
            bump_override: None,
        }
    }

    /// Force a bump kind regardless of the detected strategy.
    ///
    /// This is the only way to get a major bump.
    pub fn with_bump_override(mut self, bump: Option<BumpKind>) -> Self {
        self.bump_override = bump;
        self
    }

    /// Detect the strategy and base version for the facts
    pub fn analyze(&self, facts: &RepositoryFacts) -> PlanContext {
        let mut strategy = self.table.detect(&facts.branch);
        if let Some(bump) = self.bump_override {
            strategy = strategy.with_bump(bump);
        }
        debug!(
            "branch '{}' -> strategy {} (bump {})",
            facts.branch, strategy.category, strategy.bump_kind
        );

        let latest_tag = facts.latest_tag().map(|s| s.to_string());
        let mut warnings = Vec::new();

        let latest_version = match extract_version(latest_tag.as_deref()) {
            Ok(version) => version,
            Err(e) if e.is_recoverable() => {
                let tag = latest_tag.clone().unwrap_or_default();
                warn!("falling back to 0.0.0: {}", e);
                warnings.push(BoundaryWarning::UnparsableTag {
                    tag,
                    reason: e.to_string(),
                });
                Version::zero()
            }
            Err(e) => {
                warn!("unexpected error reading latest tag: {}", e);
                Version::zero()
            }
        };

        if latest_tag.is_none() {
            warnings.push(BoundaryWarning::NoTagsFound);
        }

        PlanContext {
            branch: facts.branch.clone(),
            strategy,
            latest_tag,
            base_version: latest_version.core(),
            latest_version,
            warnings,
        }
    }

    /// Plan from facts in one step
    pub fn plan(&self, facts: &RepositoryFacts, date: NaiveDate) -> Result<TagPlan> {
        self.plan_from(self.analyze(facts), facts, date)
    }

    /// Plan from an already analyzed context.
    ///
    /// Fails with [`AutoTagError::DirtyWorkingTree`] before anything is
    /// computed when the working tree has uncommitted changes.
    pub fn plan_from(
        &self,
        context: PlanContext,
        facts: &RepositoryFacts,
        date: NaiveDate,
    ) -> Result<TagPlan> {
        if !facts.working_tree_is_clean() {
            return Err(AutoTagError::DirtyWorkingTree {
                changes: facts.changes.clone(),
            });
        }

        let next_version =
            next_version(&context.latest_version, &context.strategy, &context.branch)?;

        let suffix = match context.strategy.label {
            Some(label) => {
                let sequence = prerelease::sequence_number(&facts.tags, &next_version, label);
                prerelease::build_suffix(label, sequence, date)
            }
            None => String::new(),
        };
        let proposed_tag = format_tag(&next_version, &suffix);

        let skip_reason = if !facts.head_tags.is_empty() {
            Some(SkipReason::CommitAlreadyTagged)
        } else if context.strategy.category == BranchCategory::Alpha
            && prerelease::scope_already_tagged(&facts.tags, &next_version, PreReleaseLabel::Alpha)
        {
            Some(SkipReason::ReleaseScopeAlreadyTagged)
        } else {
            None
        };

        let reason = match skip_reason {
            Some(skip) => skip.to_string(),
            None => format!(
                "{} {} for {}",
                context.strategy.category,
                if context.strategy.is_prerelease() {
                    "pre-release"
                } else {
                    "release"
                },
                next_version
            ),
        };
        debug!("proposed '{}' (skip: {:?})", proposed_tag, skip_reason);

        Ok(TagPlan {
            context,
            next_version,
            proposed_tag,
            skip: skip_reason.is_some(),
            reason,
            skip_reason,
        })
    }
}

/// Target version encoded in a `release/X.Y.Z` branch name
pub fn release_target(branch: &str) -> Option<Version> {
    let (_, tail) = branch.rsplit_once('/')?;
    let version = Version::parse_tag(tail).ok()?;
    if version.is_prerelease() || version.build.is_some() {
        return None;
    }
    Some(version)
}

/// Compute the next core version from the latest tag's version.
///
/// Release-candidate branches named after a version take that version.
/// A minor bump on an alpha branch is held while the latest tag is still a
/// pre-release, so features in one release cycle share one version.
///
/// Fails with [`AutoTagError::InvalidVersionFormat`] when the bumped
/// component would overflow.
pub fn next_version(latest: &Version, strategy: &BranchStrategy, branch: &str) -> Result<Version> {
    if strategy.category == BranchCategory::Rc {
        if let Some(target) = release_target(branch) {
            return Ok(target);
        }
    }

    match strategy.bump_kind {
        BumpKind::Minor
            if strategy.category == BranchCategory::Alpha && latest.is_prerelease() =>
        {
            Ok(latest.core())
        }
        kind => latest.bump(kind),
    }
}
