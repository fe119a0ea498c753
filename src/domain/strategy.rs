//! Branch strategy detection
//!
//! Maps a branch name to the versioning strategy that applies to it. Exact
//! names are looked up first, then prefixes (longest first), and anything
//! else falls back to the `dev` strategy.

use crate::domain::prerelease::PreReleaseLabel;
use crate::error::{AutoTagError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Semantic role of a branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchCategory {
    Stable,
    Beta,
    Alpha,
    Rc,
    Patch,
    Dev,
}

impl BranchCategory {
    pub const ALL: [BranchCategory; 6] = [
        BranchCategory::Stable,
        BranchCategory::Beta,
        BranchCategory::Alpha,
        BranchCategory::Rc,
        BranchCategory::Patch,
        BranchCategory::Dev,
    ];

    /// Pre-release label appended to tags of this category, if any
    pub fn label(&self) -> Option<PreReleaseLabel> {
        match self {
            BranchCategory::Stable | BranchCategory::Patch => None,
            BranchCategory::Beta => Some(PreReleaseLabel::Beta),
            BranchCategory::Alpha => Some(PreReleaseLabel::Alpha),
            BranchCategory::Rc => Some(PreReleaseLabel::ReleaseCandidate),
            BranchCategory::Dev => Some(PreReleaseLabel::Dev),
        }
    }

    pub fn default_bump(&self) -> BumpKind {
        match self {
            BranchCategory::Stable | BranchCategory::Patch => BumpKind::Patch,
            BranchCategory::Beta
            | BranchCategory::Alpha
            | BranchCategory::Rc
            | BranchCategory::Dev => BumpKind::None,
        }
    }

    pub fn default_description(&self) -> &'static str {
        match self {
            BranchCategory::Stable => "Stable production releases",
            BranchCategory::Beta => "Beta pre-releases for development",
            BranchCategory::Alpha => "Alpha pre-releases for feature work",
            BranchCategory::Rc => "Release candidates for QA",
            BranchCategory::Patch => "Patch releases for urgent fixes",
            BranchCategory::Dev => "Development snapshots",
        }
    }
}

impl FromStr for BranchCategory {
    type Err = AutoTagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "stable" => Ok(BranchCategory::Stable),
            "beta" => Ok(BranchCategory::Beta),
            "alpha" => Ok(BranchCategory::Alpha),
            "rc" => Ok(BranchCategory::Rc),
            "patch" => Ok(BranchCategory::Patch),
            "dev" => Ok(BranchCategory::Dev),
            other => Err(AutoTagError::config(format!(
                "Unknown branch category: '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for BranchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BranchCategory::Stable => "stable",
            BranchCategory::Beta => "beta",
            BranchCategory::Alpha => "alpha",
            BranchCategory::Rc => "rc",
            BranchCategory::Patch => "patch",
            BranchCategory::Dev => "dev",
        };
        write!(f, "{}", name)
    }
}

/// Which component of `major.minor.patch` a strategy increases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    None,
    Major,
    Minor,
    Patch,
}

impl FromStr for BumpKind {
    type Err = AutoTagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(BumpKind::None),
            "major" => Ok(BumpKind::Major),
            "minor" => Ok(BumpKind::Minor),
            "patch" => Ok(BumpKind::Patch),
            other => Err(AutoTagError::config(format!(
                "Unknown bump kind: '{}' (expected none, patch, minor or major)",
                other
            ))),
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpKind::None => "none",
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
        };
        write!(f, "{}", name)
    }
}

/// How a given branch category is versioned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchStrategy {
    pub category: BranchCategory,
    pub bump_kind: BumpKind,
    pub label: Option<PreReleaseLabel>,
    pub description: String,
}

impl BranchStrategy {
    /// The built-in strategy for a category
    pub fn builtin(category: BranchCategory) -> Self {
        BranchStrategy {
            category,
            bump_kind: category.default_bump(),
            label: category.label(),
            description: category.default_description().to_string(),
        }
    }

    pub fn with_bump(mut self, bump_kind: BumpKind) -> Self {
        self.bump_kind = bump_kind;
        self
    }

    pub fn is_prerelease(&self) -> bool {
        self.label.is_some()
    }
}

/// Per-category adjustments applied on top of the built-in strategies
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyOverride {
    #[serde(default)]
    pub bump: Option<BumpKind>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Lookup tables used to resolve a branch name to its strategy.
///
/// Prefixes are kept sorted longest first so the most specific prefix wins
/// when several of them match the same branch.
#[derive(Debug, Clone)]
pub struct StrategyTable {
    exact: BTreeMap<String, BranchCategory>,
    prefixes: Vec<(String, BranchCategory)>,
    overrides: BTreeMap<BranchCategory, StrategyOverride>,
}

impl StrategyTable {
    /// Table with the built-in gitflow naming rules only
    pub fn builtin() -> Self {
        let mut table = StrategyTable {
            exact: BTreeMap::new(),
            prefixes: Vec::new(),
            overrides: BTreeMap::new(),
        };

        for (name, category) in [
            ("main", BranchCategory::Stable),
            ("master", BranchCategory::Stable),
            ("development", BranchCategory::Beta),
            ("develop", BranchCategory::Beta),
            ("release", BranchCategory::Rc),
            ("hotfix", BranchCategory::Patch),
        ] {
            table = table.with_exact(name, category);
        }

        for (prefix, category) in [
            ("feature/", BranchCategory::Alpha),
            ("fix/", BranchCategory::Alpha),
            ("add/", BranchCategory::Alpha),
            ("update/", BranchCategory::Alpha),
            ("skin/", BranchCategory::Alpha),
            ("hotfix/", BranchCategory::Patch),
            ("release/", BranchCategory::Rc),
        ] {
            table = table.with_prefix(prefix, category);
        }

        table
    }

    /// Register (or replace) an exact branch name rule
    pub fn with_exact(mut self, name: impl Into<String>, category: BranchCategory) -> Self {
        self.exact.insert(name.into(), category);
        self
    }

    /// Register (or replace) a prefix rule
    pub fn with_prefix(mut self, prefix: impl Into<String>, category: BranchCategory) -> Self {
        let prefix = prefix.into();
        self.prefixes.retain(|(existing, _)| *existing != prefix);
        self.prefixes.push((prefix, category));
        self.prefixes
            .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        self
    }

    pub fn with_override(mut self, category: BranchCategory, over: StrategyOverride) -> Self {
        self.overrides.insert(category, over);
        self
    }

    /// Resolve the category for a branch name
    pub fn category_for(&self, branch: &str) -> BranchCategory {
        if let Some(category) = self.exact.get(branch) {
            return *category;
        }

        self.prefixes
            .iter()
            .find(|(prefix, _)| branch.starts_with(prefix.as_str()))
            .map(|(_, category)| *category)
            .unwrap_or(BranchCategory::Dev)
    }

    /// Resolve the full strategy for a branch name, overrides included
    pub fn detect(&self, branch: &str) -> BranchStrategy {
        let category = self.category_for(branch);
        let mut strategy = BranchStrategy::builtin(category);

        if let Some(over) = self.overrides.get(&category) {
            if let Some(bump) = over.bump {
                strategy.bump_kind = bump;
            }
            if let Some(description) = &over.description {
                strategy.description = description.clone();
            }
        }

        strategy
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Detect the strategy for a branch using the built-in rules
pub fn detect_strategy(branch: &str) -> BranchStrategy {
    StrategyTable::builtin().detect(branch)
}
