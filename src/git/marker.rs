use super::error::{GitError, Result};
use super::repository::Repository;
use git2::Oid;

/// Ref recording the last commit whose changes were fully uploaded
///
/// Reserved name, never created by ordinary branch operations
pub const S3_PUSH_REF: &str = "refs/heads/s3-pushed";

/// Read the last-pushed marker
///
/// A missing ref is not an error: it means the repository has never been
/// pushed and the full history must be scanned
pub async fn read_marker(repo: &Repository) -> Result<Option<Oid>> {
    let repo = repo.clone();

    tokio::task::spawn_blocking(move || {
        let git_repo = repo.open_git2()?;
        Ok(read_marker_sync(&git_repo))
    })
    .await
    .map_err(|_| GitError::RepoNotFound)?
}

/// Repoint the marker at the given commit
///
/// Called once per run, only after every upload has succeeded
pub async fn advance_marker(repo: &Repository, id: Oid) -> Result<()> {
    let repo = repo.clone();

    tokio::task::spawn_blocking(move || {
        let git_repo = repo.open_git2()?;
        git_repo.reference(S3_PUSH_REF, id, true, "git-s3-push: advance last pushed commit")?;
        Ok(())
    })
    .await
    .map_err(|_| GitError::RepoNotFound)?
}

pub(crate) fn read_marker_sync(git_repo: &git2::Repository) -> Option<Oid> {
    git_repo
        .find_reference(S3_PUSH_REF)
        .ok()
        .and_then(|reference| reference.target())
}
