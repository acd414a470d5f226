use super::error::{GitError, Result};
use chrono::{DateTime, Local};
use git2::{Oid, Time};

/// Represents a git commit
#[derive(Debug, Clone)]
pub struct Commit {
    pub id: Oid,
    pub short_id: String,
    pub date: DateTime<Local>,
    pub summary: String,
    pub parent_ids: Vec<Oid>,
}

impl Commit {
    /// Create a Commit from a git2::Commit
    pub fn from_git2(commit: &git2::Commit) -> Result<Self> {
        let id = commit.id();
        let short_id = id.to_string()[..7].to_string();

        let date = time_to_datetime(commit.author().when());

        let summary = commit
            .summary()
            .ok_or(GitError::InvalidUtf8)?
            .to_string();

        let parent_ids = commit.parent_ids().collect();

        Ok(Self {
            id,
            short_id,
            date,
            summary,
            parent_ids,
        })
    }

    /// Whether this commit has no parents (repository root)
    pub fn is_root(&self) -> bool {
        self.parent_ids.is_empty()
    }

    /// Whether this commit has more than one parent
    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }

    /// Format the date in a human-readable way
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Convert git2::Time to chrono::DateTime
fn time_to_datetime(time: Time) -> DateTime<Local> {
    let timestamp = time.seconds();
    DateTime::from_timestamp(timestamp, 0)
        .unwrap()
        .with_timezone(&Local)
}
