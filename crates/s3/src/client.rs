//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from s3h-core.
//! Every trait method issues exactly one SDK request.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use bytes::Bytes;
use jiff::Timestamp;
use s3h_core::{BucketInfo, ClientConfig, ListResult, ObjectInfo, ObjectStore, Result};

use crate::error::classify;

/// S3 client wrapper
#[derive(Debug, Clone)]
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client
    ///
    /// Credentials and anything not set in `config` come from the SDK's
    /// default chain (environment, profile, instance metadata).
    pub async fn new(config: &ClientConfig) -> Result<Self> {
        let endpoint = config.endpoint_url()?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        if let Some(url) = &endpoint {
            loader = loader.endpoint_url(url.as_str());
        }

        if let Some(max_attempts) = config.max_attempts {
            let retry = aws_config::retry::RetryConfig::standard().with_max_attempts(max_attempts);
            loader = loader.retry_config(retry);
        }

        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        tracing::debug!(
            region = ?sdk_config.region(),
            endpoint = ?endpoint.as_ref().map(|u| u.as_str()),
            path_style = config.force_path_style,
            "S3 client ready"
        );

        Ok(Self::from_sdk(aws_sdk_s3::Client::from_conf(s3_config)))
    }

    /// Wrap an already configured SDK client
    pub fn from_sdk(inner: aws_sdk_s3::Client) -> Self {
        Self { inner }
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

fn to_timestamp(dt: &aws_smithy_types::DateTime) -> Option<Timestamp> {
    Timestamp::from_second(dt.secs()).ok()
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        tracing::debug!("list_buckets");

        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| classify(e, "list buckets"))?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| {
                let mut info = BucketInfo::new(b.name().unwrap_or_default());
                info.creation_date = b.creation_date().and_then(to_timestamp);
                info
            })
            .collect();

        Ok(buckets)
    }

    async fn create_bucket(&self, bucket: &str, region: Option<String>) -> Result<()> {
        tracing::debug!(bucket, region = region.as_deref(), "create_bucket");

        let mut request = self.inner.create_bucket().bucket(bucket);

        if let Some(region) = region {
            let configuration = CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region.as_str()))
                .build();
            request = request.create_bucket_configuration(configuration);
        }

        request.send().await.map_err(|e| classify(e, bucket))?;

        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        tracing::debug!(bucket, "delete_bucket");

        self.inner
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify(e, bucket))?;

        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: Option<String>,
    ) -> Result<()> {
        tracing::debug!(
            bucket,
            key,
            size = data.len(),
            content_type = content_type.as_deref(),
            "put_object"
        );

        let mut request = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .map_err(|e| classify(e, &format!("{bucket}/{key}")))?;

        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        tracing::debug!(bucket, key, "get_object");

        let context = format!("{bucket}/{key}");
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(e, &context))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| s3h_core::Error::Network(format!("{context}: {e}")))?
            .into_bytes();

        Ok(data)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        tracing::debug!(bucket, key, "delete_object");

        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(e, &format!("{bucket}/{key}")))?;

        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<ListResult> {
        tracing::debug!(bucket, "list_objects");

        // One page only; the provider's default page size applies.
        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify(e, bucket))?;

        let items = response
            .contents()
            .iter()
            .map(|object| {
                let mut info = ObjectInfo::new(
                    object.key().unwrap_or_default(),
                    object.size().unwrap_or(0),
                );
                info.last_modified = object.last_modified().and_then(to_timestamp);
                info
            })
            .collect();

        let truncated = response.is_truncated().unwrap_or(false);
        if truncated {
            tracing::warn!(bucket, "Object listing truncated to the first page");
        }

        Ok(ListResult { items, truncated })
    }

    async fn get_bucket_policy(&self, bucket: &str) -> Result<String> {
        tracing::debug!(bucket, "get_bucket_policy");

        let response = self
            .inner
            .get_bucket_policy()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify(e, bucket))?;

        response
            .policy()
            .map(str::to_string)
            .ok_or_else(|| s3h_core::Error::NotFound(format!("{bucket}: no policy attached")))
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()> {
        tracing::debug!(bucket, "put_bucket_policy");

        self.inner
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(|e| classify(e, bucket))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_timestamp() {
        let dt = aws_smithy_types::DateTime::from_secs(1_700_000_000);
        let ts = to_timestamp(&dt).unwrap();
        assert_eq!(ts.as_second(), 1_700_000_000);
    }

    #[tokio::test]
    async fn test_new_rejects_bad_endpoint() {
        let config = ClientConfig {
            endpoint: Some("not a url".to_string()),
            ..Default::default()
        };

        let err = S3Client::new(&config).await.unwrap_err();
        assert!(matches!(err, s3h_core::Error::Config(_)));
    }

    #[tokio::test]
    async fn test_new_with_overrides() {
        let config = ClientConfig {
            region: Some("sa-east-1".to_string()),
            endpoint: Some("http://localhost:9000".to_string()),
            force_path_style: true,
            max_attempts: Some(2),
        };

        let client = S3Client::new(&config).await.unwrap();
        let conf = client.inner().config();
        assert_eq!(
            conf.region().map(|r| r.to_string()),
            Some("sa-east-1".to_string())
        );
    }
}
