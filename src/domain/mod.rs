//! Domain logic - pure tagging rules independent of git operations

pub mod plan;
pub mod prerelease;
pub mod strategy;
pub mod tag;
pub mod version;

pub use plan::{PlanContext, RepositoryFacts, SkipReason, TagPlan, VersionTagPlanner};
pub use prerelease::PreReleaseLabel;
pub use strategy::{BranchCategory, BranchStrategy, BumpKind, StrategyOverride, StrategyTable};
pub use tag::{DuplicateGroup, DuplicateReport, TagListing};
pub use version::Version;
