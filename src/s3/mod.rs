// S3 upload transport

use crate::config::PushConfig;
use crate::mime::{default_guesser, MimeGuesser};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Content type used when the guesser has no answer
const FALLBACK_CONTENT_TYPE: &str = "text/plain";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to upload {key}: {message}")]
    Upload { key: String, message: String },

    #[error("Failed to delete {key}: {message}")]
    Delete { key: String, message: String },
}

/// Remote store consumed by the push driver
///
/// `upload` returns the stored object's location; `delete` removes the
/// object for a path that vanished locally
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, path: &str) -> Result<String, UploadError>;
    async fn delete(&self, path: &str) -> Result<(), UploadError>;
}

/// Uploads repository files to a single S3 bucket
///
/// Paths are relative to the repository workdir; keys are the same paths
/// with the configured prefix prepended
pub struct S3Uploader {
    client: Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
    prefix: String,
    public: bool,
    root: PathBuf,
    mime: Box<dyn MimeGuesser>,
}

impl S3Uploader {
    /// Build an uploader from the push configuration
    ///
    /// A non-empty endpoint overrides the AWS one (S3-compatible stores)
    pub async fn new(config: &PushConfig, root: impl Into<PathBuf>) -> Self {
        let endpoint = (!config.endpoint.is_empty()).then(|| config.endpoint.clone());

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()));
        if let Some(endpoint) = &endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
            bucket: config.s3_bucket.clone(),
            region: config.s3_region.clone(),
            endpoint,
            prefix: normalize_prefix(&config.prefix),
            public: config.public,
            root: root.into(),
            mime: default_guesser(),
        }
    }

    fn key_for(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }

    fn location_for(&self, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key),
            None => format!("https://{}.s3.{}.amazonaws.com/{}", self.bucket, self.region, key),
        }
    }

    fn content_type_for(&self, path: &str) -> String {
        match self.mime.mime_type(Path::new(path)) {
            Some(mime) => mime,
            None => {
                tracing::debug!("no content type for {}, using {}", path, FALLBACK_CONTENT_TYPE);
                FALLBACK_CONTENT_TYPE.to_string()
            }
        }
    }
}

#[async_trait]
impl ObjectStore for S3Uploader {
    async fn upload(&self, path: &str) -> Result<String, UploadError> {
        let key = self.key_for(path);

        let body = ByteStream::from_path(self.root.join(path))
            .await
            .map_err(|err| UploadError::Upload {
                key: key.clone(),
                message: err.to_string(),
            })?;

        let acl = if self.public {
            ObjectCannedAcl::PublicRead
        } else {
            ObjectCannedAcl::Private
        };

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body)
            .content_type(self.content_type_for(path))
            .acl(acl)
            .send()
            .await
            .map_err(|err| UploadError::Upload {
                key: key.clone(),
                message: format!("{}", DisplayErrorContext(err)),
            })?;

        Ok(self.location_for(&key))
    }

    async fn delete(&self, path: &str) -> Result<(), UploadError> {
        let key = self.key_for(path);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|err| UploadError::Delete {
                key,
                message: format!("{}", DisplayErrorContext(err)),
            })?;

        Ok(())
    }
}

/// A non-empty prefix always ends with a single `/`
fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{}/", prefix)
    }
}
