use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git repository not found")]
    RepoNotFound,

    #[error("Not in a git repository")]
    NotARepo,

    #[error("HEAD does not resolve to a commit")]
    HeadUnresolved,

    #[error("Repository has no working tree")]
    NoWorkdir,

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 in git data")]
    InvalidUtf8,

    #[error("Failed to list changed paths for commit {commit}: {source}")]
    DiffUnavailable { commit: String, source: git2::Error },
}

pub type Result<T> = std::result::Result<T, GitError>;
