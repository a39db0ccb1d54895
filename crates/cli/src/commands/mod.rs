//! Command definitions and dispatch

mod bucket;
mod completions;
mod config;
mod demo;
mod object;
mod policy;

use clap::Subcommand;
use s3h_core::{Config, ConfigManager};
use s3h_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::helper::S3Helper;
use crate::output::{Formatter, OutputConfig};

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a bucket
    #[command(name = "mb", alias = "create-bucket")]
    MakeBucket(bucket::MakeBucketArgs),

    /// Delete an empty bucket
    #[command(name = "rb", alias = "delete-bucket")]
    RemoveBucket(bucket::RemoveBucketArgs),

    /// List buckets, or the objects in a bucket
    #[command(name = "ls", alias = "list")]
    List(bucket::ListArgs),

    /// Upload a local file
    #[command(name = "put", alias = "upload")]
    Put(object::PutArgs),

    /// Download an object to a local file
    #[command(name = "get", alias = "download")]
    Get(object::GetArgs),

    /// Delete an object
    #[command(name = "rm", alias = "delete-object")]
    Remove(object::RemoveArgs),

    /// Get or set bucket policies
    #[command(subcommand)]
    Policy(policy::PolicyCommands),

    /// Walk through create, upload, download and delete against one bucket
    Demo(demo::DemoArgs),

    /// Show or initialize the configuration file
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute a subcommand
pub async fn execute(cmd: Commands, output_config: OutputConfig) -> ExitCode {
    match cmd {
        Commands::MakeBucket(args) => bucket::execute_make(args, output_config).await,
        Commands::RemoveBucket(args) => bucket::execute_remove(args, output_config).await,
        Commands::List(args) => bucket::execute_list(args, output_config).await,
        Commands::Put(args) => object::execute_put(args, output_config).await,
        Commands::Get(args) => object::execute_get(args, output_config).await,
        Commands::Remove(args) => object::execute_remove(args, output_config).await,
        Commands::Policy(cmd) => policy::execute(cmd, output_config).await,
        Commands::Demo(args) => demo::execute(args, output_config).await,
        Commands::Config(cmd) => config::execute(cmd, output_config),
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Load the configuration file, reporting failures as a usage error
fn load_config(formatter: &Formatter) -> Result<Config, ExitCode> {
    let manager = match ConfigManager::new() {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&format!("Failed to locate configuration: {e}"));
            return Err(ExitCode::UsageError);
        }
    };

    match manager.load() {
        Ok(config) => Ok(config),
        Err(e) => {
            formatter.error(&format!("Failed to load configuration: {e}"));
            Err(ExitCode::UsageError)
        }
    }
}

/// Build a helper backed by the SDK client described in `config`
async fn setup_helper(
    config: &Config,
    formatter: Formatter,
) -> Result<S3Helper<S3Client>, ExitCode> {
    match S3Client::new(&config.client).await {
        Ok(client) => Ok(S3Helper::new(client, formatter)),
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            Err(ExitCode::UsageError)
        }
    }
}

/// Load the configuration and build a helper in one step
async fn helper_from_env(output_config: OutputConfig) -> Result<S3Helper<S3Client>, ExitCode> {
    let formatter = Formatter::new(output_config);
    let config = load_config(&formatter)?;
    setup_helper(&config, formatter).await
}
