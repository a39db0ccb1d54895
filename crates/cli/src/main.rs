//! s3h: a small helper for S3 buckets, objects and bucket policies
//!
//! Credentials, signing and retries are left to the AWS SDK; see
//! `s3h config path` for where optional client settings are read from.

mod commands;
mod exit_code;
mod helper;
mod output;
#[cfg(test)]
mod testing;

use std::ffi::OsStr;

use clap::{Args, Parser};
use tracing_subscriber::EnvFilter;

use crate::commands::Commands;
use crate::output::OutputConfig;

/// Bucket, object and bucket policy operations against S3
#[derive(Parser, Debug)]
#[command(name = "s3h", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Flags accepted by every subcommand
#[derive(Args, Debug)]
struct GlobalArgs {
    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output (also set by a non-empty NO_COLOR)
    #[arg(long, global = true)]
    no_color: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log SDK requests and internal details to stderr
    #[arg(long, global = true)]
    debug: bool,
}

/// Build the output settings; `no_color_env` is the value of `NO_COLOR`
fn output_config(args: &GlobalArgs, no_color_env: Option<&OsStr>) -> OutputConfig {
    OutputConfig {
        json: args.json,
        no_color: args.no_color || no_color_env.is_some_and(|v| !v.is_empty()),
        quiet: args.quiet,
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.debug);

    let output = output_config(&cli.global, std::env::var_os("NO_COLOR").as_deref());
    let code = commands::execute(cli.command, output).await;
    std::process::exit(code.as_i32());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["s3h", "ls", "my-bucket", "--json", "-q"]).unwrap();
        let output = output_config(&cli.global, None);
        assert!(output.json);
        assert!(output.quiet);
        assert!(!output.no_color);
    }

    #[test]
    fn test_no_color_env() {
        let cli = Cli::try_parse_from(["s3h", "ls"]).unwrap();

        for value in ["1", "true", "0", "yes"] {
            let output = output_config(&cli.global, Some(OsStr::new(value)));
            assert!(output.no_color, "NO_COLOR={value} should disable colors");
        }
        assert!(!output_config(&cli.global, Some(OsStr::new(""))).no_color);
        assert!(!output_config(&cli.global, None).no_color);

        let cli = Cli::try_parse_from(["s3h", "--no-color", "ls"]).unwrap();
        assert!(output_config(&cli.global, None).no_color);
    }

    #[test]
    fn test_command_aliases() {
        for argv in [
            vec!["s3h", "create-bucket", "b", "--region", "sa-east-1"],
            vec!["s3h", "delete-bucket", "b"],
            vec!["s3h", "upload", "file.txt", "b"],
            vec!["s3h", "download", "b", "k", "out.txt"],
            vec!["s3h", "delete-object", "b", "k"],
            vec!["s3h", "list"],
        ] {
            assert!(Cli::try_parse_from(&argv).is_ok(), "failed to parse {argv:?}");
        }
    }
}
