//! ObjectStore trait and listing types
//!
//! The seam between the helper and whatever talks to the provider. Each
//! method maps to exactly one service call.

use async_trait::async_trait;
use bytes::Bytes;
use jiff::Timestamp;
use serde::Serialize;

use crate::error::Result;

/// A bucket as returned by a bucket listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<Timestamp>,
}

impl BucketInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creation_date: None,
        }
    }
}

/// An object as returned by an object listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    pub key: String,
    pub size_bytes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
}

impl ObjectInfo {
    pub fn new(key: impl Into<String>, size_bytes: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes,
            last_modified: None,
        }
    }
}

/// One page of an object listing
#[derive(Debug, Clone, Default)]
pub struct ListResult {
    pub items: Vec<ObjectInfo>,
    /// The provider holds more keys than fit in this page
    pub truncated: bool,
}

/// Bucket, object and policy operations against an object-storage service
///
/// Optional arguments are owned so the generated `MockObjectStore` can
/// match on them.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List every bucket visible to the authenticated identity
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>>;

    /// Create a bucket, with a location constraint when `region` is given
    async fn create_bucket(&self, bucket: &str, region: Option<String>) -> Result<()>;

    /// Delete an empty bucket
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Store `data` under `key`
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: Option<String>,
    ) -> Result<()>;

    /// Fetch the full contents of an object
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// List the first page of objects in a bucket
    async fn list_objects(&self, bucket: &str) -> Result<ListResult>;

    /// Fetch the raw policy document attached to a bucket
    async fn get_bucket_policy(&self, bucket: &str) -> Result<String>;

    /// Replace the bucket policy with `policy`, sent verbatim
    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()>;
}
