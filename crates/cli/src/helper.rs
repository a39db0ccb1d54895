//! S3Helper: one call per operation, one status line per call
//!
//! Every operation forwards to the [`ObjectStore`], reports the outcome
//! through the [`Formatter`] and returns `true` on success. Errors of any
//! kind are reported and turned into `false`; nothing is retried here.

use std::path::Path;

use bytes::Bytes;
use s3h_core::{
    BucketInfo, Error, ListResult, ObjectStore, PolicyTemplate, object_key_for_upload,
};
use serde::Serialize;

use crate::output::Formatter;

pub(crate) const TRUNCATED_WARNING: &str =
    "Listing truncated: only the first page of objects is shown.";

/// JSON output for single-resource operations
#[derive(Debug, Serialize)]
struct OperationOutput {
    operation: &'static str,
    bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    message: String,
}

impl OperationOutput {
    fn new(operation: &'static str, bucket: &str, message: String) -> Self {
        Self {
            operation,
            bucket: bucket.to_string(),
            key: None,
            path: None,
            message,
        }
    }

    fn key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    fn path(mut self, path: &Path) -> Self {
        self.path = Some(path.display().to_string());
        self
    }
}

#[derive(Debug, Serialize)]
struct BucketListOutput<'a> {
    buckets: &'a [BucketInfo],
}

#[derive(Debug, Serialize)]
pub(crate) struct ObjectEntry<'a> {
    key: &'a str,
    size_bytes: i64,
    size_human: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ObjectListOutput<'a> {
    bucket: &'a str,
    objects: Vec<ObjectEntry<'a>>,
    truncated: bool,
}

#[derive(Debug, Serialize)]
struct PolicyOutput<'a> {
    bucket: &'a str,
    policy: &'a str,
}

pub(crate) fn bucket_created_message(bucket: &str) -> String {
    format!("Bucket '{bucket}' created successfully.")
}

pub(crate) fn bucket_deleted_message(bucket: &str) -> String {
    format!("Bucket '{bucket}' deleted successfully.")
}

pub(crate) fn uploaded_message(local_path: &Path, bucket: &str, key: &str) -> String {
    format!(
        "File '{}' uploaded to bucket '{bucket}' as '{key}'.",
        local_path.display()
    )
}

pub(crate) fn downloaded_message(bucket: &str, key: &str, local_path: &Path) -> String {
    format!(
        "File '{key}' downloaded from bucket '{bucket}' to '{}'.",
        local_path.display()
    )
}

pub(crate) fn object_deleted_message(bucket: &str, key: &str) -> String {
    format!("Object '{key}' deleted from bucket '{bucket}'.")
}

pub(crate) fn policy_line(bucket: &str, policy: &str) -> String {
    format!("Bucket policy for '{bucket}': {policy}")
}

pub(crate) fn policy_set_message(bucket: &str, template: &PolicyTemplate) -> String {
    if *template == PolicyTemplate::public_read() {
        format!("Public read policy set for bucket '{bucket}'.")
    } else {
        format!(
            "Policy set for bucket '{bucket}': {} {} for '{}'.",
            template.effect,
            template.actions.join(", "),
            template.principal
        )
    }
}

pub(crate) fn raw_policy_set_message(bucket: &str) -> String {
    format!("Policy set for bucket '{bucket}'.")
}

/// Status line for a failed operation
pub(crate) fn failure_message(context: &str, error: &Error) -> String {
    format!("{context}: {error}")
}

/// Human-readable lines for a bucket listing
pub(crate) fn bucket_listing_lines(
    buckets: &[BucketInfo],
    formatter: &Formatter,
) -> Vec<String> {
    let mut lines = vec!["Existing buckets:".to_string()];
    lines.extend(
        buckets
            .iter()
            .map(|b| format!(" - {}", formatter.style_name(&b.name))),
    );
    lines
}

/// Human-readable lines for an object listing
pub(crate) fn object_listing_lines(bucket: &str, result: &ListResult) -> Vec<String> {
    let mut lines = vec![format!("Objects in bucket '{bucket}':")];
    if result.items.is_empty() {
        lines.push("No objects found in the bucket.".to_string());
    } else {
        lines.extend(
            result
                .items
                .iter()
                .map(|o| format!(" - {} (Size: {} bytes)", o.key, o.size_bytes)),
        );
    }
    lines
}

pub(crate) fn object_list_output<'a>(
    bucket: &'a str,
    result: &'a ListResult,
) -> ObjectListOutput<'a> {
    let objects = result
        .items
        .iter()
        .map(|o| ObjectEntry {
            key: &o.key,
            size_bytes: o.size_bytes,
            size_human: humansize::format_size(o.size_bytes.max(0) as u64, humansize::BINARY),
            last_modified: o.last_modified.map(|t| t.to_string()),
        })
        .collect();

    ObjectListOutput {
        bucket,
        objects,
        truncated: result.truncated,
    }
}

/// Thin wrapper running bucket, object and policy operations
pub struct S3Helper<S> {
    store: S,
    formatter: Formatter,
}

impl<S: ObjectStore> S3Helper<S> {
    pub fn new(store: S, formatter: Formatter) -> Self {
        Self { store, formatter }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    fn done(&self, output: OperationOutput) -> bool {
        if self.formatter.is_json() {
            self.formatter.json(&output);
        } else {
            self.formatter.success(&output.message);
        }
        true
    }

    fn fail(&self, context: &str, error: Error) -> bool {
        tracing::warn!(error = %error, "{context}");
        self.formatter.error(&failure_message(context, &error));
        false
    }

    /// Create a bucket, constrained to `region` when given
    pub async fn create_bucket(&self, bucket: &str, region: Option<&str>) -> bool {
        let region = region.map(str::to_string);
        match self.store.create_bucket(bucket, region).await {
            Ok(()) => self.done(OperationOutput::new(
                "create_bucket",
                bucket,
                bucket_created_message(bucket),
            )),
            Err(e) => self.fail(&format!("Error creating bucket '{bucket}'"), e),
        }
    }

    /// Print every bucket visible to the caller
    pub async fn list_buckets(&self) -> bool {
        let buckets = match self.store.list_buckets().await {
            Ok(b) => b,
            Err(e) => return self.fail("Error listing buckets", e),
        };

        if self.formatter.is_json() {
            self.formatter.json(&BucketListOutput { buckets: &buckets });
        } else {
            for line in bucket_listing_lines(&buckets, &self.formatter) {
                self.formatter.println(&line);
            }
        }
        true
    }

    pub async fn delete_bucket(&self, bucket: &str) -> bool {
        match self.store.delete_bucket(bucket).await {
            Ok(()) => self.done(OperationOutput::new(
                "delete_bucket",
                bucket,
                bucket_deleted_message(bucket),
            )),
            Err(e) => self.fail(&format!("Error deleting bucket '{bucket}'"), e),
        }
    }

    /// Upload a local file; the key defaults to the file's base name
    pub async fn upload_file(
        &self,
        local_path: &Path,
        bucket: &str,
        object_name: Option<&str>,
    ) -> bool {
        let context = format!("Error uploading file '{}'", local_path.display());

        let key = match object_key_for_upload(local_path, object_name) {
            Ok(k) => k,
            Err(e) => return self.fail(&context, e),
        };

        let data = match tokio::fs::read(local_path).await {
            Ok(d) => Bytes::from(d),
            Err(e) => return self.fail(&context, e.into()),
        };

        let content_type = mime_guess::from_path(local_path)
            .first_raw()
            .map(str::to_string);

        match self.store.put_object(bucket, &key, data, content_type).await {
            Ok(()) => self.done(
                OperationOutput::new(
                    "upload_file",
                    bucket,
                    uploaded_message(local_path, bucket, &key),
                )
                .key(&key)
                .path(local_path),
            ),
            Err(e) => self.fail(&context, e),
        }
    }

    /// Download an object, replacing whatever is at `local_path`
    ///
    /// The local file is only touched once the object has been fetched.
    pub async fn download_file(&self, bucket: &str, key: &str, local_path: &Path) -> bool {
        let context = format!("Error downloading file '{key}'");

        let data = match self.store.get_object(bucket, key).await {
            Ok(d) => d,
            Err(e) => return self.fail(&context, e),
        };

        if let Err(e) = tokio::fs::write(local_path, &data).await {
            return self.fail(&context, e.into());
        }

        self.done(
            OperationOutput::new(
                "download_file",
                bucket,
                downloaded_message(bucket, key, local_path),
            )
            .key(key)
            .path(local_path),
        )
    }

    pub async fn delete_object(&self, bucket: &str, key: &str) -> bool {
        match self.store.delete_object(bucket, key).await {
            Ok(()) => self.done(
                OperationOutput::new(
                    "delete_object",
                    bucket,
                    object_deleted_message(bucket, key),
                )
                .key(key),
            ),
            Err(e) => self.fail(&format!("Error deleting object '{key}'"), e),
        }
    }

    /// Print key and size of each object on the first listing page
    pub async fn list_objects(&self, bucket: &str) -> bool {
        let result = match self.store.list_objects(bucket).await {
            Ok(r) => r,
            Err(e) => return self.fail(&format!("Error listing objects in bucket '{bucket}'"), e),
        };

        if self.formatter.is_json() {
            self.formatter.json(&object_list_output(bucket, &result));
        } else {
            for line in object_listing_lines(bucket, &result) {
                self.formatter.println(&line);
            }
            if result.truncated {
                self.formatter.warning(TRUNCATED_WARNING);
            }
        }
        true
    }

    /// Print the raw policy document attached to a bucket
    pub async fn get_bucket_policy(&self, bucket: &str) -> bool {
        let policy = match self.store.get_bucket_policy(bucket).await {
            Ok(p) => p,
            Err(e) => {
                return self.fail(&format!("Error retrieving policy for bucket '{bucket}'"), e);
            }
        };

        if self.formatter.is_json() {
            self.formatter.json(&PolicyOutput {
                bucket,
                policy: &policy,
            });
        } else {
            self.formatter.println(&policy_line(bucket, &policy));
        }
        true
    }

    /// Replace the bucket policy with one rendered from `template`
    pub async fn set_bucket_policy(&self, bucket: &str, template: &PolicyTemplate) -> bool {
        let context = format!("Error setting policy for bucket '{bucket}'");

        if let Err(e) = template.validate() {
            return self.fail(&context, e);
        }

        let policy = match template.render(bucket).to_json() {
            Ok(p) => p,
            Err(e) => return self.fail(&context, e),
        };

        let message = policy_set_message(bucket, template);

        match self.store.put_bucket_policy(bucket, &policy).await {
            Ok(()) => self.done(OperationOutput::new("set_bucket_policy", bucket, message)),
            Err(e) => self.fail(&context, e),
        }
    }

    /// Replace the bucket policy with `policy`, sent as-is
    pub async fn set_bucket_policy_raw(&self, bucket: &str, policy: &str) -> bool {
        match self.store.put_bucket_policy(bucket, policy).await {
            Ok(()) => self.done(OperationOutput::new(
                "set_bucket_policy",
                bucket,
                raw_policy_set_message(bucket),
            )),
            Err(e) => self.fail(&format!("Error setting policy for bucket '{bucket}'"), e),
        }
    }
}
