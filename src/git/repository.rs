use crate::domain::tag::sort_tags_descending;
use crate::error::{AutoTagError, Result};
use git2::{ErrorCode, ObjectType, Repository as Git2Repo, Status, StatusOptions};
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path)
            .map_err(|e| AutoTagError::not_a_repository(format!("{}: {}", path.display(), e)))?;
        debug!("opened repository at {}", repo.path().display());

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn head_commit(&self) -> Result<git2::Commit<'_>> {
        let head = self.repo.head().map_err(|e| match e.code() {
            ErrorCode::UnbornBranch => AutoTagError::branch("HEAD has no commits yet"),
            _ => AutoTagError::Git(e),
        })?;
        Ok(head.peel_to_commit()?)
    }
}

/// Two-letter status code in the style of `git status --porcelain`
fn porcelain_code(status: Status) -> String {
    if status.is_conflicted() {
        return "UU".to_string();
    }
    if status.is_wt_new() && !status.intersects(Status::INDEX_NEW) {
        return "??".to_string();
    }

    let index = if status.is_index_new() {
        'A'
    } else if status.is_index_modified() {
        'M'
    } else if status.is_index_deleted() {
        'D'
    } else if status.is_index_renamed() {
        'R'
    } else if status.is_index_typechange() {
        'T'
    } else {
        ' '
    };

    let worktree = if status.is_wt_modified() {
        'M'
    } else if status.is_wt_deleted() {
        'D'
    } else if status.is_wt_renamed() {
        'R'
    } else if status.is_wt_typechange() {
        'T'
    } else {
        ' '
    };

    format!("{}{}", index, worktree)
}

impl super::Repository for Git2Repository {
    fn current_branch_name(&self) -> Result<String> {
        let head = self.repo.head().map_err(|e| match e.code() {
            ErrorCode::UnbornBranch => AutoTagError::branch("HEAD has no commits yet"),
            _ => AutoTagError::Git(e),
        })?;

        if !head.is_branch() {
            return Err(AutoTagError::branch(
                "HEAD is detached; check out a branch first",
            ));
        }

        head.shorthand()
            .map(|s| s.to_string())
            .ok_or_else(|| AutoTagError::branch("Branch name is not valid UTF-8"))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;
        let names = tags.iter().flatten().map(|s| s.to_string()).collect();

        Ok(sort_tags_descending(names))
    }

    fn tags_pointing_at_head(&self) -> Result<BTreeSet<String>> {
        let head_oid = self.head_commit()?.id();
        let tags = self.repo.tag_names(None)?;
        let mut at_head = BTreeSet::new();

        // Peel to the commit so annotated and lightweight tags compare alike
        for tag_name in tags.iter().flatten() {
            let target = self
                .repo
                .find_reference(&format!("refs/tags/{}", tag_name))
                .and_then(|r| r.peel(ObjectType::Commit))
                .map(|obj| obj.id());

            if let Ok(oid) = target {
                if oid == head_oid {
                    at_head.insert(tag_name.to_string());
                }
            }
        }

        Ok(at_head)
    }

    fn working_tree_changes(&self) -> Result<Vec<String>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .include_ignored(false)
            .recurse_untracked_dirs(true);
        let statuses = self.repo.statuses(Some(&mut opts))?;

        Ok(statuses
            .iter()
            .filter(|entry| entry.status() != Status::CURRENT)
            .map(|entry| {
                format!(
                    "{} {}",
                    porcelain_code(entry.status()),
                    entry.path().unwrap_or("(non-utf8 path)")
                )
            })
            .collect())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let head = self
            .head_commit()
            .map_err(|e| AutoTagError::tag_creation(name, e))?;

        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .map_err(|e| AutoTagError::tag_creation(name, e.message()))?;
        info!("created tag {} at {}", name, head.id());

        Ok(())
    }

    fn push_tag(&self, name: &str, remote: &str) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|_| AutoTagError::push(name, remote, "no such remote"))?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            git2::Cred::default()
        });

        // The server may accept the connection but reject the reference
        callbacks.push_update_reference(|refname, status| match status {
            Some(message) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, message
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{}:refs/tags/{}", name, name);
        remote_handle
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| {
                let reason = match e.class() {
                    git2::ErrorClass::Net => format!("network error: {}", e.message()),
                    git2::ErrorClass::Reference => format!("reference error: {}", e.message()),
                    _ => e.message().to_string(),
                };
                AutoTagError::push(name, remote, reason)
            })?;
        info!("pushed tag {} to {}", name, remote);

        Ok(())
    }
}
