// One push run: resolve, upload, delete, advance the marker

use crate::config::PushConfig;
use crate::filter::IgnoreFilter;
use crate::git::{self, Repository, UnpushedWalker};
use crate::s3::ObjectStore;
use anyhow::{Context, Result};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct PushOptions {
    /// Push IncludeNonGit files even when no commit changed anything
    pub force_external: bool,
    /// Resolve and report without touching the store or the marker
    pub dry_run: bool,
}

/// What a run actually did
#[derive(Debug, Default)]
pub struct PushOutcome {
    pub uploaded: Vec<String>,
    pub deleted: Vec<String>,
    pub marker_advanced: bool,
}

/// Execute one push run against the given store
///
/// The marker is advanced only after every upload and delete in the batch
/// has succeeded; any earlier failure aborts with the marker untouched, so
/// the next run re-resolves the same changes.
pub async fn run(
    repo: &Repository,
    config: &PushConfig,
    store: &dyn ObjectStore,
    options: PushOptions,
) -> Result<PushOutcome> {
    let filter =
        IgnoreFilter::compile(&config.ignore).context("Failed to compile ignore patterns")?;

    let walker = UnpushedWalker::new(repo.clone());
    let mut changes = walker
        .resolve(&filter)
        .await
        .context("Failed to resolve unpushed changes")?;

    if changes.is_empty() && !options.force_external {
        info!("No modified files to push");
        return Ok(PushOutcome::default());
    }

    let workdir = repo
        .workdir()
        .await?
        .context("Repository has no working tree")?;

    // Always-included non-tracked paths; missing ones are skipped, not errors
    for path in &config.include_non_git {
        if workdir.join(path).exists() {
            changes.files.insert(path.clone());
        }
    }

    if changes.is_empty() {
        info!("No files to push");
        return Ok(PushOutcome::default());
    }

    let head = repo.head_commit().await?;
    info!(
        "Pushing changes up to commit {} ({})",
        head.short_id,
        head.date_str()
    );

    if options.dry_run {
        for path in &changes.files {
            info!("Would upload {}", path);
        }
        for path in &changes.vanished {
            info!("Would delete remote copy of {}", path);
        }
        return Ok(PushOutcome::default());
    }

    let mut uploaded = Vec::new();
    for path in &changes.files {
        info!("Uploading {}", path);
        let location = store
            .upload(path)
            .await
            .with_context(|| format!("Upload failed for {}", path))?;
        info!("{}", location);
        uploaded.push(path.clone());
    }

    let mut deleted = Vec::new();
    for path in &changes.vanished {
        info!("Deleting remote copy of {}", path);
        store
            .delete(path)
            .await
            .with_context(|| format!("Delete failed for {}", path))?;
        deleted.push(path.clone());
    }

    // The uploads above are durable; a marker failure only costs a re-upload
    // on the next run, so it is reported rather than propagated
    let marker_advanced = match git::advance_marker(repo, changes.head).await {
        Ok(()) => true,
        Err(err) => {
            warn!("Failed to advance {}: {}", git::S3_PUSH_REF, err);
            false
        }
    };

    Ok(PushOutcome {
        uploaded,
        deleted,
        marker_advanced,
    })
}
