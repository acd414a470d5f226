use super::error::{GitError, Result};
use git2::{DiffOptions, Oid};

/// Produces the list of paths touched by a single commit
///
/// The diff base is the first parent, or the empty tree for root commits.
/// Implementations return an owned list per commit; the walker's driving
/// loop is the only writer of the accumulated change set.
pub trait DiffProvider {
    fn changed_paths(&self, id: Oid) -> Result<Vec<String>>;
}

/// DiffProvider backed by git2 tree-to-tree diffs
///
/// The in-process equivalent of `git show --name-only` for one commit
pub struct TreeDiff<'repo> {
    repo: &'repo git2::Repository,
}

impl<'repo> TreeDiff<'repo> {
    pub fn new(repo: &'repo git2::Repository) -> Self {
        Self { repo }
    }

    fn diff_against_base(&self, id: Oid) -> std::result::Result<Vec<String>, git2::Error> {
        let commit = self.repo.find_commit(id)?;
        let tree = commit.tree()?;

        let mut diff_options = DiffOptions::new();

        let diff = if commit.parent_count() == 0 {
            // First commit - diff against empty tree
            self.repo
                .diff_tree_to_tree(None, Some(&tree), Some(&mut diff_options))?
        } else {
            // Normal commit - diff against first parent
            let parent_tree = commit.parent(0)?.tree()?;
            self.repo
                .diff_tree_to_tree(Some(&parent_tree), Some(&tree), Some(&mut diff_options))?
        };

        let mut paths = Vec::new();
        for delta in diff.deltas() {
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string());
            if let Some(path) = path {
                paths.push(path);
            }
        }

        Ok(paths)
    }
}

impl DiffProvider for TreeDiff<'_> {
    fn changed_paths(&self, id: Oid) -> Result<Vec<String>> {
        self.diff_against_base(id)
            .map_err(|source| GitError::DiffUnavailable {
                commit: id.to_string(),
                source,
            })
    }
}
