//! In-memory ObjectStore double for tests

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use s3h_core::{BucketInfo, Error, ListResult, ObjectInfo, ObjectStore, Result};

/// Mutating requests seen by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateBucket {
        bucket: String,
        region: Option<String>,
    },
    DeleteBucket {
        bucket: String,
    },
    PutObject {
        bucket: String,
        key: String,
        content_type: Option<String>,
    },
    DeleteObject {
        bucket: String,
        key: String,
    },
    PutBucketPolicy {
        bucket: String,
    },
}

#[derive(Default)]
struct State {
    buckets: BTreeSet<String>,
    objects: BTreeMap<(String, String), Bytes>,
    policies: BTreeMap<String, String>,
    calls: Vec<Call>,
}

/// Behaves like a tiny provider: buckets must exist, must be empty to be
/// deleted, and names are unique.
#[derive(Default)]
pub struct FakeStore {
    state: Mutex<State>,
    fail_all: bool,
    truncate_listings: bool,
}

impl FakeStore {
    pub fn with_buckets(names: &[&str]) -> Self {
        let store = Self::default();
        store.state().buckets = names.iter().map(|n| n.to_string()).collect();
        store
    }

    /// Every request fails with a provider error
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Default::default()
        }
    }

    /// Object listings report more keys than the page holds
    pub fn truncating(mut self) -> Self {
        self.truncate_listings = true;
        self
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.state()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn insert_object(&self, bucket: &str, key: &str, data: &[u8]) {
        self.state().objects.insert(
            (bucket.to_string(), key.to_string()),
            Bytes::copy_from_slice(data),
        );
    }

    pub fn policy(&self, bucket: &str) -> Option<String> {
        self.state().policies.get(bucket).cloned()
    }

    pub fn set_policy(&self, bucket: &str, policy: &str) {
        self.state()
            .policies
            .insert(bucket.to_string(), policy.to_string());
    }

    pub fn bucket_names(&self) -> Vec<String> {
        self.state().buckets.iter().cloned().collect()
    }

    fn check(&self) -> Result<()> {
        if self.fail_all {
            return Err(Error::Client {
                code: "InternalError".to_string(),
                message: "We encountered an internal error. Please try again.".to_string(),
            });
        }
        Ok(())
    }

    fn require_bucket(state: &State, bucket: &str) -> Result<()> {
        if state.buckets.contains(bucket) {
            Ok(())
        } else {
            Err(Error::NotFound(format!("{bucket}: The specified bucket does not exist")))
        }
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        self.check()?;
        Ok(self.state().buckets.iter().map(BucketInfo::new).collect())
    }

    async fn create_bucket(&self, bucket: &str, region: Option<String>) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::CreateBucket {
            bucket: bucket.to_string(),
            region,
        });
        self.check()?;

        if !state.buckets.insert(bucket.to_string()) {
            return Err(Error::Conflict(format!("{bucket}: bucket already owned by you")));
        }
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::DeleteBucket {
            bucket: bucket.to_string(),
        });
        self.check()?;
        Self::require_bucket(&state, bucket)?;

        if state.objects.keys().any(|(b, _)| b == bucket) {
            return Err(Error::Conflict(format!(
                "{bucket}: The bucket you tried to delete is not empty"
            )));
        }
        state.buckets.remove(bucket);
        state.policies.remove(bucket);
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: Option<String>,
    ) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::PutObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type,
        });
        self.check()?;
        Self::require_bucket(&state, bucket)?;

        state
            .objects
            .insert((bucket.to_string(), key.to_string()), data);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.check()?;
        let state = self.state();
        Self::require_bucket(&state, bucket)?;

        state
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| {
                Error::NotFound(format!("{bucket}/{key}: The specified key does not exist"))
            })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::DeleteObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        self.check()?;
        Self::require_bucket(&state, bucket)?;

        state.objects.remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<ListResult> {
        self.check()?;
        let state = self.state();
        Self::require_bucket(&state, bucket)?;

        let items = state
            .objects
            .iter()
            .filter(|((b, _), _)| b == bucket)
            .map(|((_, key), data)| ObjectInfo::new(key.clone(), data.len() as i64))
            .collect();
        Ok(ListResult {
            items,
            truncated: self.truncate_listings,
        })
    }

    async fn get_bucket_policy(&self, bucket: &str) -> Result<String> {
        self.check()?;
        let state = self.state();
        Self::require_bucket(&state, bucket)?;

        state
            .policies
            .get(bucket)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{bucket}: The bucket policy does not exist")))
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::PutBucketPolicy {
            bucket: bucket.to_string(),
        });
        self.check()?;
        Self::require_bucket(&state, bucket)?;

        state
            .policies
            .insert(bucket.to_string(), policy.to_string());
        Ok(())
    }
}
