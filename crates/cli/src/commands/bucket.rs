//! Bucket commands: mb, rb, ls

use clap::Args;

use super::helper_from_env;
use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

/// Arguments for `mb`
#[derive(Args, Debug)]
pub struct MakeBucketArgs {
    /// Name of the bucket to create
    pub bucket: String,

    /// Region to create the bucket in (location constraint).
    /// Omit for the provider's default region.
    #[arg(long)]
    pub region: Option<String>,
}

/// Arguments for `rb`
#[derive(Args, Debug)]
pub struct RemoveBucketArgs {
    /// Name of the bucket to delete; it must be empty
    pub bucket: String,
}

/// Arguments for `ls`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// List the objects in this bucket instead of listing buckets
    pub bucket: Option<String>,
}

pub async fn execute_make(args: MakeBucketArgs, output_config: OutputConfig) -> ExitCode {
    let helper = match helper_from_env(output_config).await {
        Ok(h) => h,
        Err(code) => return code,
    };

    let ok = helper
        .create_bucket(&args.bucket, args.region.as_deref())
        .await;
    ExitCode::from_success(ok)
}

pub async fn execute_remove(args: RemoveBucketArgs, output_config: OutputConfig) -> ExitCode {
    let helper = match helper_from_env(output_config).await {
        Ok(h) => h,
        Err(code) => return code,
    };

    ExitCode::from_success(helper.delete_bucket(&args.bucket).await)
}

pub async fn execute_list(args: ListArgs, output_config: OutputConfig) -> ExitCode {
    let helper = match helper_from_env(output_config).await {
        Ok(h) => h,
        Err(code) => return code,
    };

    let ok = match &args.bucket {
        Some(bucket) => helper.list_objects(bucket).await,
        None => helper.list_buckets().await,
    };
    ExitCode::from_success(ok)
}
