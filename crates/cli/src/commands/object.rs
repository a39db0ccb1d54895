//! Object commands: put, get, rm

use std::path::PathBuf;

use clap::Args;

use super::helper_from_env;
use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

/// Arguments for `put`
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload
    pub file: PathBuf,

    /// Destination bucket
    pub bucket: String,

    /// Object key (default: the file's base name)
    #[arg(short, long)]
    pub key: Option<String>,
}

/// Arguments for `get`
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Source bucket
    pub bucket: String,

    /// Object key
    pub key: String,

    /// Local destination; an existing file is overwritten
    pub dest: PathBuf,
}

/// Arguments for `rm`
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Bucket holding the object
    pub bucket: String,

    /// Object key
    pub key: String,
}

pub async fn execute_put(args: PutArgs, output_config: OutputConfig) -> ExitCode {
    let helper = match helper_from_env(output_config).await {
        Ok(h) => h,
        Err(code) => return code,
    };

    let ok = helper
        .upload_file(&args.file, &args.bucket, args.key.as_deref())
        .await;
    ExitCode::from_success(ok)
}

pub async fn execute_get(args: GetArgs, output_config: OutputConfig) -> ExitCode {
    let helper = match helper_from_env(output_config).await {
        Ok(h) => h,
        Err(code) => return code,
    };

    let ok = helper
        .download_file(&args.bucket, &args.key, &args.dest)
        .await;
    ExitCode::from_success(ok)
}

pub async fn execute_remove(args: RemoveArgs, output_config: OutputConfig) -> ExitCode {
    let helper = match helper_from_env(output_config).await {
        Ok(h) => h,
        Err(code) => return code,
    };

    ExitCode::from_success(helper.delete_object(&args.bucket, &args.key).await)
}
