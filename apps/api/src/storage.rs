//! Resume file storage.
//!
//! `AppState` holds an `Arc<dyn ResumeStorage>`; production uses S3 (or MinIO
//! locally), tests swap in an in-memory store.

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;

#[async_trait]
pub trait ResumeStorage: Send + Sync {
    /// Stores `body` under `key`, replacing any previous object.
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError>;
}

/// Object key for a member's resume in a given resume book.
/// Resubmitting overwrites the same key.
pub fn resume_key(resume_book_id: &str, member_id: &str) -> String {
    format!("resume-books/{resume_book_id}/{member_id}.pdf")
}

pub struct S3ResumeStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ResumeStorage {
    /// Constructs an S3 client configured for MinIO (local) or AWS (production).
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "portal-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&s3_config),
            bucket: config.s3_bucket.clone(),
        }
    }
}

#[async_trait]
impl ResumeStorage for S3ResumeStorage {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded {size} bytes to s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
