use super::commit::Commit;
use super::diff::{DiffProvider, TreeDiff};
use super::error::{GitError, Result};
use super::marker;
use super::repository::Repository;
use crate::filter::IgnoreFilter;
use git2::Oid;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::Path;

/// The deduplicated set of paths pending transfer for one run
///
/// `files` holds paths that exist on disk and must be uploaded; `vanished`
/// holds paths changed in history but since deleted, pending remote delete.
/// Grows monotonically during the walk, read-only afterwards.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// Commit the marker will advance to once the batch succeeds
    pub head: Oid,
    pub files: BTreeSet<String>,
    pub vanished: BTreeSet<String>,
}

impl ChangeSet {
    fn new(head: Oid) -> Self {
        Self {
            head,
            files: BTreeSet::new(),
            vanished: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.vanished.is_empty()
    }
}

/// Walks commit history backward from HEAD, collecting the changed paths of
/// every commit not yet covered by the last-pushed marker
pub struct UnpushedWalker {
    repo: Repository,
}

impl UnpushedWalker {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Resolve the set of paths touched by unpushed commits
    ///
    /// First run (no marker) scans the full history. A marker that is not an
    /// ancestor of HEAD never terminates the walk early; the whole reachable
    /// graph is scanned, which over-includes but never under-includes.
    pub async fn resolve(&self, filter: &IgnoreFilter) -> Result<ChangeSet> {
        let repo = self.repo.clone();
        let filter = filter.clone();

        tokio::task::spawn_blocking(move || {
            let git_repo = repo.open_git2()?;
            let head = git_repo
                .head()
                .and_then(|head| head.peel_to_commit())
                .map_err(|_| GitError::HeadUnresolved)?
                .id();
            let last_pushed = marker::read_marker_sync(&git_repo);
            let workdir = git_repo
                .workdir()
                .ok_or(GitError::NoWorkdir)?
                .to_path_buf();
            let provider = TreeDiff::new(&git_repo);

            walk_unpushed(&git_repo, head, last_pushed, &provider, &filter, &workdir)
        })
        .await
        .map_err(|_| GitError::RepoNotFound)?
    }
}

/// Breadth-first walk from `head`, halting at the marker or the graph root
///
/// The visited set is marked at enqueue time, so shared ancestors behind
/// merge commits are processed exactly once. The marker commit itself is
/// never processed: its changes were already uploaded.
fn walk_unpushed(
    repo: &git2::Repository,
    head: Oid,
    last_pushed: Option<Oid>,
    provider: &dyn DiffProvider,
    filter: &IgnoreFilter,
    workdir: &Path,
) -> Result<ChangeSet> {
    let mut changes = ChangeSet::new(head);
    let mut visited: HashSet<Oid> = HashSet::new();
    let mut queue: VecDeque<Oid> = VecDeque::new();
    let mut current = Some(head);

    while let Some(id) = current {
        if last_pushed == Some(id) {
            break;
        }

        let commit = Commit::from_git2(&repo.find_commit(id)?)?;
        tracing::debug!("scanning commit {} {}", commit.short_id, commit.summary);

        for path in provider.changed_paths(id)? {
            if !workdir.join(&path).exists() {
                // Deleted since the commit: queue a remote delete, never an upload
                if !filter.matches(&path) {
                    changes.vanished.insert(path);
                }
                continue;
            }
            if filter.matches(&path) {
                continue;
            }
            changes.files.insert(path);
        }

        for parent in &commit.parent_ids {
            if visited.insert(*parent) {
                queue.push_back(*parent);
            }
        }

        current = queue.pop_front();
    }

    Ok(changes)
}
