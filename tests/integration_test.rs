// tests/integration_test.rs
use autotag::cli::{run_workflow, tag_listing, Outcome, WorkflowArgs};
use autotag::domain::{SkipReason, VersionTagPlanner};
use autotag::git::{collect_facts, Git2Repository, Repository};
use autotag::ui::ScriptedPrompt;
use autotag::AutoTagError;
use chrono::NaiveDate;
use git2::{Oid, RepositoryInitOptions, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn args() -> WorkflowArgs {
    WorkflowArgs::new(NaiveDate::from_ymd_opt(2024, 5, 21).unwrap())
}

// Helper function to setup a temporary git repo with HEAD on `branch`
fn setup_test_repo(branch: &str) -> (TempDir, git2::Repository) {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head(branch);
    let repo = git2::Repository::init_opts(temp_dir.path(), &opts).expect("Could not init repo");
    (temp_dir, repo)
}

fn commit_file(repo: &git2::Repository, dir: &Path, name: &str, content: &str) -> Oid {
    fs::write(dir.join(name), content).expect("Could not write file");

    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new(name))
        .expect("Could not add file to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = Signature::now("Test User", "test@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, &format!("update {}", name), &tree, &parents)
        .expect("Could not create commit")
}

fn tag_commit(repo: &git2::Repository, name: &str, oid: Oid) {
    let object = repo.find_object(oid, None).unwrap();
    repo.tag_lightweight(name, &object, false)
        .expect("Could not create tag");
}

#[test]
fn test_facts_from_real_repository() {
    let (dir, repo) = setup_test_repo("feature/login");
    let first = commit_file(&repo, dir.path(), "README.md", "one\n");
    tag_commit(&repo, "v1.2.0", first);
    tag_commit(&repo, "v1.10.0-alpha.1.20240101", first);
    tag_commit(&repo, "nightly", first);
    commit_file(&repo, dir.path(), "README.md", "two\n");

    let git = Git2Repository::open(dir.path()).unwrap();
    let facts = collect_facts(&git).unwrap();

    assert_eq!(facts.branch, "feature/login");
    assert_eq!(
        facts.tags,
        vec!["v1.10.0-alpha.1.20240101", "v1.2.0", "nightly"]
    );
    assert!(facts.head_tags.is_empty());
    assert!(facts.working_tree_is_clean());
}

#[test]
fn test_untracked_file_makes_tree_dirty() {
    let (dir, repo) = setup_test_repo("main");
    commit_file(&repo, dir.path(), "README.md", "one\n");
    fs::write(dir.path().join("scratch.txt"), "wip").unwrap();

    let git = Git2Repository::open(dir.path()).unwrap();
    assert!(!git.working_tree_is_clean().unwrap());
    assert_eq!(git.working_tree_changes().unwrap(), vec!["?? scratch.txt"]);

    let result = run_workflow(
        &git,
        &mut ScriptedPrompt::new(&[true, true]),
        &VersionTagPlanner::default(),
        args(),
    );
    assert!(matches!(result, Err(AutoTagError::DirtyWorkingTree { .. })));
    assert!(git.list_tags().unwrap().is_empty());
}

#[test]
fn test_workflow_creates_tag_at_head() {
    let (dir, repo) = setup_test_repo("hotfix/urgent");
    let first = commit_file(&repo, dir.path(), "README.md", "one\n");
    tag_commit(&repo, "v1.2.5", first);
    let head = commit_file(&repo, dir.path(), "README.md", "two\n");

    let git = Git2Repository::open(dir.path()).unwrap();
    let planner = VersionTagPlanner::default();
    let result = run_workflow(
        &git,
        &mut ScriptedPrompt::new(&[true, false]),
        &planner,
        args(),
    )
    .unwrap();

    assert_eq!(
        result.outcome,
        Outcome::Deferred {
            tag: "v1.2.6".to_string()
        }
    );
    let tagged = repo
        .find_reference("refs/tags/v1.2.6")
        .unwrap()
        .peel_to_commit()
        .unwrap();
    assert_eq!(tagged.id(), head);

    // Running again on the same commit is a no-op
    let again = run_workflow(&git, &mut ScriptedPrompt::new(&[true]), &planner, args()).unwrap();
    assert_eq!(
        again.outcome,
        Outcome::Skipped(SkipReason::CommitAlreadyTagged)
    );
}

#[test]
fn test_workflow_pushes_to_local_remote() {
    let (dir, repo) = setup_test_repo("main");
    commit_file(&repo, dir.path(), "README.md", "one\n");

    let remote_dir = TempDir::new().unwrap();
    let bare = git2::Repository::init_bare(remote_dir.path()).unwrap();
    repo.remote("origin", remote_dir.path().to_str().unwrap())
        .unwrap();

    let git = Git2Repository::open(dir.path()).unwrap();
    let result = run_workflow(
        &git,
        &mut ScriptedPrompt::new(&[true, true]),
        &VersionTagPlanner::default(),
        args(),
    )
    .unwrap();

    assert_eq!(
        result.outcome,
        Outcome::Pushed {
            tag: "v0.0.1".to_string(),
            remote: "origin".to_string()
        }
    );
    assert!(bare.find_reference("refs/tags/v0.0.1").is_ok());
}

#[test]
fn test_push_to_missing_remote_fails() {
    let (dir, repo) = setup_test_repo("main");
    commit_file(&repo, dir.path(), "README.md", "one\n");

    let git = Git2Repository::open(dir.path()).unwrap();
    git.create_tag("v0.0.1").unwrap();
    let result = git.push_tag("v0.0.1", "nowhere");

    assert!(matches!(result, Err(AutoTagError::PushFailed { .. })));
}

#[test]
fn test_create_existing_tag_fails() {
    let (dir, repo) = setup_test_repo("main");
    let head = commit_file(&repo, dir.path(), "README.md", "one\n");
    tag_commit(&repo, "v1.0.0", head);

    let git = Git2Repository::open(dir.path()).unwrap();
    assert!(matches!(
        git.create_tag("v1.0.0"),
        Err(AutoTagError::TagCreationFailed { .. })
    ));
}

#[test]
fn test_annotated_tag_at_head_is_detected() {
    let (dir, repo) = setup_test_repo("main");
    let head = commit_file(&repo, dir.path(), "README.md", "one\n");
    let sig = Signature::now("Test User", "test@example.com").unwrap();
    let object = repo.find_object(head, None).unwrap();
    repo.tag("v2.0.0", &object, &sig, "release 2.0.0", false)
        .unwrap();

    let git = Git2Repository::open(dir.path()).unwrap();
    assert!(git.tags_pointing_at_head().unwrap().contains("v2.0.0"));
}

#[test]
fn test_detached_head_is_branch_error() {
    let (dir, repo) = setup_test_repo("main");
    let head = commit_file(&repo, dir.path(), "README.md", "one\n");
    repo.set_head_detached(head).unwrap();

    let git = Git2Repository::open(dir.path()).unwrap();
    assert!(matches!(
        git.current_branch_name(),
        Err(AutoTagError::Branch(_))
    ));
}

#[test]
fn test_unborn_branch_is_branch_error() {
    let (dir, _repo) = setup_test_repo("main");

    let git = Git2Repository::open(dir.path()).unwrap();
    assert!(matches!(
        git.current_branch_name(),
        Err(AutoTagError::Branch(_))
    ));
}

#[test]
fn test_tag_listing_on_detached_head() {
    let (dir, repo) = setup_test_repo("main");
    let head = commit_file(&repo, dir.path(), "README.md", "one\n");
    tag_commit(&repo, "v0.1.0", head);
    tag_commit(&repo, "snapshot", head);
    repo.set_head_detached(head).unwrap();

    let git = Git2Repository::open(dir.path()).unwrap();
    let listing = tag_listing(&git).unwrap();
    assert_eq!(listing.latest.as_deref(), Some("v0.1.0"));
    assert_eq!(listing.valid_count, 1);
    assert_eq!(listing.invalid, vec!["snapshot"]);
    assert!(listing.head_tagged);
}
