//! demo command - Exercise every bucket and object operation in order
//!
//! list buckets -> create bucket -> list buckets -> upload -> list objects ->
//! download -> delete object -> list objects -> delete bucket -> list buckets
//!
//! Each step runs even when an earlier one failed.

use std::path::PathBuf;

use clap::Args;
use s3h_core::{DemoConfig, ObjectStore, object_key_for_upload};

use super::{load_config, setup_helper};
use crate::exit_code::ExitCode;
use crate::helper::S3Helper;
use crate::output::{Formatter, OutputConfig};

/// Arguments for `demo`; unset values come from the `[demo]` config table
#[derive(Args, Debug, Default)]
pub struct DemoArgs {
    /// Bucket to create and delete
    #[arg(long)]
    pub bucket: Option<String>,

    /// Region for the new bucket
    #[arg(long, conflicts_with = "no_region")]
    pub region: Option<String>,

    /// Create the bucket without a location constraint
    #[arg(long)]
    pub no_region: bool,

    /// Local file to upload
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Where to write the downloaded copy
    #[arg(long)]
    pub download_to: Option<PathBuf>,
}

/// Fully resolved demo parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoPlan {
    pub bucket: String,
    pub region: Option<String>,
    pub file: PathBuf,
    pub key: String,
    pub download_path: PathBuf,
}

impl DemoPlan {
    pub fn resolve(args: DemoArgs, defaults: &DemoConfig) -> Result<Self, String> {
        let bucket = args.bucket.unwrap_or_else(|| defaults.bucket.clone());
        if bucket.is_empty() {
            return Err("Bucket name cannot be empty".to_string());
        }

        let region = if args.no_region {
            None
        } else {
            args.region.or_else(|| defaults.region.clone())
        };

        let file = args.file.unwrap_or_else(|| defaults.file.clone());
        let key = object_key_for_upload(&file, None).map_err(|e| e.to_string())?;

        Ok(Self {
            bucket,
            region,
            file,
            key,
            download_path: args
                .download_to
                .unwrap_or_else(|| defaults.download_path.clone()),
        })
    }
}

/// Run every step of the plan; true only if all of them succeeded
pub async fn run<S: ObjectStore>(helper: &S3Helper<S>, plan: &DemoPlan) -> bool {
    let bucket = plan.bucket.as_str();
    tracing::info!(bucket, region = ?plan.region, "Starting demo");

    let mut ok = true;
    ok &= helper.list_buckets().await;
    ok &= helper.create_bucket(bucket, plan.region.as_deref()).await;
    ok &= helper.list_buckets().await;
    ok &= helper.upload_file(&plan.file, bucket, None).await;
    ok &= helper.list_objects(bucket).await;
    ok &= helper
        .download_file(bucket, &plan.key, &plan.download_path)
        .await;
    ok &= helper.delete_object(bucket, &plan.key).await;
    ok &= helper.list_objects(bucket).await;
    ok &= helper.delete_bucket(bucket).await;
    ok &= helper.list_buckets().await;

    if !ok {
        helper
            .formatter()
            .warning("Demo finished with errors; see messages above.");
    }
    ok
}

/// Execute the demo command
pub async fn execute(args: DemoArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let config = match load_config(&formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let plan = match DemoPlan::resolve(args, &config.demo) {
        Ok(p) => p,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    let helper = match setup_helper(&config, formatter).await {
        Ok(h) => h,
        Err(code) => return code,
    };

    ExitCode::from_success(run(&helper, &plan).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeStore};
    use tempfile::TempDir;

    fn quiet_helper(store: FakeStore) -> S3Helper<FakeStore> {
        let formatter = Formatter::new(OutputConfig {
            quiet: true,
            ..Default::default()
        });
        S3Helper::new(store, formatter)
    }

    fn plan_in(dir: &TempDir) -> DemoPlan {
        let file = dir.path().join("test_file.txt");
        std::fs::write(&file, b"demo contents").unwrap();

        let args = DemoArgs {
            bucket: Some("demo-bucket".to_string()),
            file: Some(file),
            download_to: Some(dir.path().join("downloaded_test_file.txt")),
            ..Default::default()
        };
        DemoPlan::resolve(args, &DemoConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_defaults() {
        let plan = DemoPlan::resolve(DemoArgs::default(), &DemoConfig::default()).unwrap();
        assert_eq!(plan.bucket, "testing-bucket-unisinos");
        assert_eq!(plan.region.as_deref(), Some("sa-east-1"));
        assert_eq!(plan.key, "test_file.txt");
        assert_eq!(plan.download_path, PathBuf::from("downloaded_test_file.txt"));
    }

    #[test]
    fn test_resolve_overrides() {
        let args = DemoArgs {
            no_region: true,
            file: Some(PathBuf::from("/data/report.csv")),
            ..Default::default()
        };
        let plan = DemoPlan::resolve(args, &DemoConfig::default()).unwrap();
        assert!(plan.region.is_none());
        assert_eq!(plan.key, "report.csv");

        let args = DemoArgs {
            file: Some(PathBuf::from("/")),
            ..Default::default()
        };
        assert!(DemoPlan::resolve(args, &DemoConfig::default()).is_err());
    }

    #[tokio::test]
    async fn test_demo_round_trip() {
        let dir = TempDir::new().unwrap();
        let plan = plan_in(&dir);
        let helper = quiet_helper(FakeStore::with_buckets(&["other"]));

        assert!(run(&helper, &plan).await);

        assert_eq!(
            std::fs::read(&plan.download_path).unwrap(),
            b"demo contents"
        );
        assert_eq!(helper.store().bucket_names(), vec!["other".to_string()]);
        assert_eq!(
            helper.store().calls(),
            vec![
                Call::CreateBucket {
                    bucket: "demo-bucket".to_string(),
                    region: Some("sa-east-1".to_string()),
                },
                Call::PutObject {
                    bucket: "demo-bucket".to_string(),
                    key: "test_file.txt".to_string(),
                    content_type: Some("text/plain".to_string()),
                },
                Call::DeleteObject {
                    bucket: "demo-bucket".to_string(),
                    key: "test_file.txt".to_string(),
                },
                Call::DeleteBucket {
                    bucket: "demo-bucket".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_demo_continues_after_failure() {
        let dir = TempDir::new().unwrap();
        let plan = plan_in(&dir);
        // bucket already exists, so only the create step fails
        let helper = quiet_helper(FakeStore::with_buckets(&["demo-bucket"]));

        assert!(!run(&helper, &plan).await);
        assert!(helper.store().bucket_names().is_empty());
        assert!(plan.download_path.exists());
    }
}
