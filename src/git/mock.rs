use crate::domain::tag::sort_tags_descending;
use crate::error::{AutoTagError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::collections::BTreeSet;

/// Mock repository for testing without actual git operations
///
/// Side effects are recorded so tests can assert on what was created and
/// pushed.
pub struct MockRepository {
    branch: Option<String>,
    tags: RefCell<Vec<String>>,
    head_tags: RefCell<BTreeSet<String>>,
    changes: Vec<String>,
    create_failure: Option<String>,
    push_failure: Option<String>,
    created: RefCell<Vec<String>>,
    pushed: RefCell<Vec<(String, String)>>,
}

impl MockRepository {
    /// Create a new mock repository with HEAD on `branch`
    pub fn new(branch: impl Into<String>) -> Self {
        MockRepository {
            branch: Some(branch.into()),
            tags: RefCell::new(Vec::new()),
            head_tags: RefCell::new(BTreeSet::new()),
            changes: Vec::new(),
            create_failure: None,
            push_failure: None,
            created: RefCell::new(Vec::new()),
            pushed: RefCell::new(Vec::new()),
        }
    }

    /// A mock that behaves like a directory outside any repository
    pub fn outside_repository() -> Self {
        let mut repo = MockRepository::new("");
        repo.branch = None;
        repo
    }

    /// Add a tag somewhere in history
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.get_mut().push(name.into());
    }

    /// Add a tag pointing at HEAD
    pub fn add_head_tag(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.tags.get_mut().push(name.clone());
        self.head_tags.get_mut().insert(name);
    }

    /// Add an uncommitted change (porcelain-style line)
    pub fn add_change(&mut self, line: impl Into<String>) {
        self.changes.push(line.into());
    }

    /// Make `create_tag` fail with the given reason
    pub fn fail_tag_creation(&mut self, reason: impl Into<String>) {
        self.create_failure = Some(reason.into());
    }

    /// Make `push_tag` fail with the given reason
    pub fn fail_push(&mut self, reason: impl Into<String>) {
        self.push_failure = Some(reason.into());
    }

    /// Tags created through the trait, in order
    pub fn created_tags(&self) -> Vec<String> {
        self.created.borrow().clone()
    }

    /// `(tag, remote)` pairs pushed through the trait, in order
    pub fn pushed_tags(&self) -> Vec<(String, String)> {
        self.pushed.borrow().clone()
    }
}

impl Repository for MockRepository {
    fn current_branch_name(&self) -> Result<String> {
        self.branch
            .clone()
            .ok_or_else(|| AutoTagError::not_a_repository("mock repository has no .git"))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(sort_tags_descending(self.tags.borrow().clone()))
    }

    fn tags_pointing_at_head(&self) -> Result<BTreeSet<String>> {
        Ok(self.head_tags.borrow().clone())
    }

    fn working_tree_changes(&self) -> Result<Vec<String>> {
        Ok(self.changes.clone())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        if let Some(reason) = &self.create_failure {
            return Err(AutoTagError::tag_creation(name, reason));
        }
        if self.tags.borrow().iter().any(|t| t == name) {
            return Err(AutoTagError::tag_creation(name, "tag already exists"));
        }

        self.tags.borrow_mut().push(name.to_string());
        self.head_tags.borrow_mut().insert(name.to_string());
        self.created.borrow_mut().push(name.to_string());
        Ok(())
    }

    fn push_tag(&self, name: &str, remote: &str) -> Result<()> {
        if let Some(reason) = &self.push_failure {
            return Err(AutoTagError::push(name, remote, reason));
        }

        self.pushed
            .borrow_mut()
            .push((name.to_string(), remote.to_string()));
        Ok(())
    }
}
