//! S3-compatible blob store using the AWS SDK.
//!
//! # Feature flag
//!
//! This module is gated behind the `s3` feature flag. Any S3-compatible
//! endpoint works (AWS, GCS interoperability mode, MinIO) as long as it
//! accepts canned ACLs.

use crate::core::error::BlobStoreError;
use crate::core::service::BlobStore;
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use bytes::Bytes;

/// Photo bucket on an S3-compatible object store
///
/// Public URLs are `<public_base_url>/<bucket>/<key>`.
#[derive(Clone, Debug)]
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>, public_base_url: &str) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a client from the ambient AWS configuration (env, profile, IMDS)
    pub async fn from_env(bucket: impl Into<String>, public_base_url: &str) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_s3::Client::new(&config), bucket, public_base_url)
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket, key)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    #[tracing::instrument(skip(self, bytes), fields(bucket = %self.bucket, size = bytes.len()))]
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobStoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .with_context(|| format!("could not put {key} into bucket {}", self.bucket))?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn make_public(&self, key: &str) -> Result<String, BlobStoreError> {
        self.client
            .put_object_acl()
            .bucket(&self.bucket)
            .key(key)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .with_context(|| format!("could not make {key} public in bucket {}", self.bucket))?;
        Ok(self.public_url(key))
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError> {
        let resp = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        if let Err(e) = resp {
            if e.as_service_error().map(|e| e.is_not_found()) == Some(true) {
                return Ok(false);
            }

            return Err(anyhow::Error::new(e)
                .context("failed to perform head object operation")
                .into());
        }

        Ok(true)
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn delete(&self, key: &str) -> Result<(), BlobStoreError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("could not delete {key} from bucket {}", self.bucket))?;
        Ok(())
    }
}
