use anyhow::{bail, Context, Result};
use clap::Parser;
use git_s3_push::config::PushConfig;
use git_s3_push::git::Repository;
use git_s3_push::push::{self, PushOptions};
use git_s3_push::s3::S3Uploader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Push files modified by unpushed git commits to S3
#[derive(Parser)]
#[command(name = "git-s3-push")]
#[command(about = "Push files modified by unpushed git commits to S3", long_about = None)]
struct Cli {
    /// Destination S3 bucket name
    #[arg(short = 'b', long)]
    bucket: Option<String>,

    /// AWS region of the destination bucket
    #[arg(short = 'r', long)]
    region: Option<String>,

    /// Key prefix prepended to every uploaded path
    #[arg(long)]
    prefix: Option<String>,

    /// Custom endpoint for S3-compatible stores
    #[arg(long)]
    endpoint: Option<String>,

    /// Upload with a public-read ACL instead of private
    #[arg(long)]
    public: bool,

    /// Save destination settings to the config file
    #[arg(long)]
    save: bool,

    /// Force the upload of files not tracked in git (IncludeNonGit files in config)
    #[arg(long)]
    force_external: bool,

    /// Resolve and report without uploading anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let repo = Repository::discover()
        .await
        .context("Failed to open repository")?;
    let workdir = repo
        .workdir()
        .await?
        .context("Repository has no working tree")?;

    let config_path = PushConfig::path_in(&workdir);
    let mut config = PushConfig::load_from_file(&config_path)?;

    if let Some(bucket) = cli.bucket {
        config.s3_bucket = bucket;
    }
    if let Some(region) = cli.region {
        config.s3_region = region;
    }
    if let Some(prefix) = cli.prefix {
        config.prefix = prefix;
    }
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if cli.public {
        config.public = true;
    }

    if !config.has_destination() {
        bail!(
            "destination bucket and region are required (pass -b/-r or add them to {})",
            config_path.display()
        );
    }

    if cli.save {
        if let Err(e) = config.save_to_file(&config_path) {
            tracing::warn!("Failed to save config to file: {}", e);
        }
    }

    let uploader = S3Uploader::new(&config, &workdir).await;
    let options = PushOptions {
        force_external: cli.force_external,
        dry_run: cli.dry_run,
    };
    push::run(&repo, &config, &uploader, options).await?;

    Ok(())
}
