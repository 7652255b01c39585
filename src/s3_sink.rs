use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ServerSideEncryption;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Destination for aggregated enriched batches. One object per invocation.
#[async_trait]
pub trait BulkStore: Send + Sync {
    async fn put_batch(&self, key: &str, body: Vec<u8>) -> Result<()>;
}

pub struct S3BulkStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3BulkStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl BulkStore for S3BulkStore {
    async fn put_batch(&self, key: &str, body: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type("application/gzip")
            .content_encoding("gzip")
            .server_side_encryption(ServerSideEncryption::Aes256)
            .send()
            .await
            .context("put_object")?;
        Ok(())
    }
}

/// Hour-bucketed object key. The random component keeps concurrent
/// invocations writing within the same second from colliding.
pub fn batch_key(now: DateTime<Utc>) -> String {
    format!(
        "{}/batch-{}-{}.json.gz",
        now.format("%Y/%m/%d/%H"),
        now.timestamp(),
        Uuid::new_v4().simple()
    )
}
