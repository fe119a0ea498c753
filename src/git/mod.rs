//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository facts
//! and side effects the tagging workflow needs, so the planner never talks
//! to git directly.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! ```rust
//! # use autotag::git::{collect_facts, Repository};
//! # fn example<R: Repository>(repo: &R) -> autotag::Result<()> {
//! let facts = collect_facts(repo)?;
//! println!("{} has {} tags", facts.branch, facts.tags.len());
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::RepositoryFacts;
use crate::error::Result;
use log::debug;
use std::collections::BTreeSet;

/// Repository collaborator consumed by the tagging workflow
///
/// Every query fails with [crate::error::AutoTagError] when the facts cannot
/// be read; the workflow treats such failures as fatal.
pub trait Repository {
    /// Name of the checked-out branch
    ///
    /// # Returns
    /// * `Ok(String)` - Short branch name (e.g., "feature/login")
    /// * `Err` - If HEAD is detached or unborn
    fn current_branch_name(&self) -> Result<String>;

    /// All tags, descending by semantic version (non-semver tags last)
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Tags whose target is the HEAD commit
    fn tags_pointing_at_head(&self) -> Result<BTreeSet<String>>;

    /// Uncommitted changes, one `XY path` line per file (untracked included)
    fn working_tree_changes(&self) -> Result<Vec<String>>;

    /// Whether there are no uncommitted changes
    fn working_tree_is_clean(&self) -> Result<bool> {
        Ok(self.working_tree_changes()?.is_empty())
    }

    /// Create a lightweight tag on HEAD
    ///
    /// # Returns
    /// * `Ok(())` - Tag created
    /// * `Err(TagCreationFailed)` - If the tag exists or HEAD cannot be resolved
    fn create_tag(&self, name: &str) -> Result<()>;

    /// Push a tag to a remote
    ///
    /// # Returns
    /// * `Ok(())` - Tag pushed
    /// * `Err(PushFailed)` - If the remote is missing or rejects the push
    fn push_tag(&self, name: &str, remote: &str) -> Result<()>;
}

/// Read every fact the planner needs, in one pass
pub fn collect_facts<R: Repository>(repo: &R) -> Result<RepositoryFacts> {
    let branch = repo.current_branch_name()?;
    let tags = repo.list_tags()?;
    let head_tags = repo.tags_pointing_at_head()?;
    let changes = if repo.working_tree_is_clean()? {
        Vec::new()
    } else {
        repo.working_tree_changes()?
    };

    debug!(
        "facts: branch={} tags={} head_tags={:?} changes={}",
        branch,
        tags.len(),
        head_tags,
        changes.len()
    );

    Ok(RepositoryFacts {
        branch,
        tags,
        head_tags,
        changes,
    })
}
