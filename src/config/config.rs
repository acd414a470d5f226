use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-repository config file, stored at the workdir root
pub const CONFIG_FILE_NAME: &str = ".git_s3_push";

/// Per-repository push configuration
///
/// Serialized field names match the original on-disk JSON format, so a
/// `.git_s3_push` written by older tooling keeps working
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PushConfig {
    /// AWS region of the destination bucket
    #[serde(rename = "S3Region")]
    pub s3_region: String,
    /// Destination bucket name
    #[serde(rename = "S3Bucket")]
    pub s3_bucket: String,
    /// Key prefix prepended to every uploaded path
    #[serde(rename = "Prefix")]
    pub prefix: String,
    /// Custom endpoint for S3-compatible stores; empty means AWS
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    /// Upload with a public-read ACL instead of private
    #[serde(rename = "Public")]
    pub public: bool,
    /// Wildcard patterns excluding matching paths from upload
    #[serde(rename = "Ignore")]
    pub ignore: Vec<String>,
    /// Paths uploaded even though git does not track them
    #[serde(rename = "IncludeNonGit")]
    pub include_non_git: Vec<String>,
}

impl PushConfig {
    /// Path of the config file inside a repository workdir
    pub fn path_in<P: AsRef<Path>>(workdir: P) -> PathBuf {
        workdir.as_ref().join(CONFIG_FILE_NAME)
    }

    /// Load configuration from a JSON file
    /// If the file doesn't exist, returns the default configuration
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(PushConfig::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: PushConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        let json = serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Whether bucket and region are both set
    ///
    /// Both are required before a push may start
    pub fn has_destination(&self) -> bool {
        !self.s3_bucket.is_empty() && !self.s3_region.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PushConfig::default();

        assert!(config.s3_bucket.is_empty());
        assert!(config.ignore.is_empty());
        assert!(!config.public);
        assert!(!config.has_destination());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);

        let original = PushConfig {
            s3_region: "eu-west-1".to_string(),
            s3_bucket: "my-bucket".to_string(),
            prefix: "site".to_string(),
            public: true,
            ignore: vec!["*.key".to_string()],
            include_non_git: vec!["build/output.js".to_string()],
            ..PushConfig::default()
        };
        original.save_to_file(&config_path).unwrap();

        let loaded = PushConfig::load_from_file(&config_path).unwrap();
        assert_eq!(original, loaded);
        assert!(loaded.has_destination());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent");

        let config = PushConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config, PushConfig::default());
    }

    #[test]
    fn test_original_field_names() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);

        // A file written by the original tooling
        fs::write(
            &config_path,
            r#"{"S3Region":"us-east-1","S3Bucket":"legacy","Ignore":["*.log"],"IncludeNonGit":["extra.txt"]}"#,
        )
        .unwrap();

        let config = PushConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.s3_region, "us-east-1");
        assert_eq!(config.s3_bucket, "legacy");
        assert_eq!(config.ignore, vec!["*.log".to_string()]);
        assert_eq!(config.include_non_git, vec!["extra.txt".to_string()]);
        // Fields absent from older files fall back to defaults
        assert!(config.prefix.is_empty());
        assert!(!config.public);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "not json").unwrap();

        assert!(PushConfig::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_path_in_workdir() {
        let path = PushConfig::path_in("/repo");
        assert_eq!(path, PathBuf::from("/repo/.git_s3_push"));
    }
}
