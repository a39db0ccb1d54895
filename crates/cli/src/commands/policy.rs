//! Bucket policy commands
//!
//! `policy set` renders a single-statement policy from the `[policy]` config
//! table (public read by default) with per-flag overrides, or sends a policy
//! file verbatim.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use s3h_core::{Effect, PolicyConfig, PolicyTemplate, Principal};
use serde::Serialize;

use super::{load_config, setup_helper};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Policy subcommands
#[derive(Subcommand, Debug)]
pub enum PolicyCommands {
    /// Print the policy attached to a bucket
    Get(GetArgs),

    /// Replace the policy attached to a bucket
    Set(SetArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Bucket name
    pub bucket: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Bucket name
    pub bucket: String,

    /// Principal: `*` for everyone, or comma-separated ARNs
    #[arg(long, conflicts_with = "file")]
    pub principal: Option<String>,

    /// Action to grant or deny (repeatable), e.g. s3:GetObject
    #[arg(short, long = "action", value_name = "ACTION", conflicts_with = "file")]
    pub actions: Vec<String>,

    /// Statement effect: Allow or Deny
    #[arg(long, conflicts_with = "file")]
    pub effect: Option<Effect>,

    /// Statement id
    #[arg(long, conflicts_with_all = ["file", "no_sid"])]
    pub sid: Option<String>,

    /// Omit the statement id
    #[arg(long, conflicts_with = "file")]
    pub no_sid: bool,

    /// Send this policy document as-is instead of rendering one
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Print the policy that would be set without sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// JSON output for a policy file that would be sent as-is
#[derive(Debug, Serialize)]
struct RawPolicyOutput<'a> {
    bucket: &'a str,
    policy: &'a str,
}

/// Execute a policy subcommand
pub async fn execute(cmd: PolicyCommands, output_config: OutputConfig) -> ExitCode {
    match cmd {
        PolicyCommands::Get(args) => execute_get(args, output_config).await,
        PolicyCommands::Set(args) => execute_set(args, output_config).await,
    }
}

async fn execute_get(args: GetArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let config = match load_config(&formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let helper = match setup_helper(&config, formatter).await {
        Ok(h) => h,
        Err(code) => return code,
    };

    ExitCode::from_success(helper.get_bucket_policy(&args.bucket).await)
}

async fn execute_set(args: SetArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let config = match load_config(&formatter) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Some(path) = &args.file {
        let policy = match std::fs::read_to_string(path) {
            Ok(p) => p,
            Err(e) => {
                formatter.error(&format!(
                    "Failed to read policy file '{}': {e}",
                    path.display()
                ));
                return ExitCode::GeneralError;
            }
        };

        if args.dry_run {
            if formatter.is_json() {
                formatter.json(&RawPolicyOutput {
                    bucket: &args.bucket,
                    policy: policy.trim_end(),
                });
            } else {
                formatter.println(policy.trim_end());
            }
            return ExitCode::Success;
        }

        let helper = match setup_helper(&config, formatter).await {
            Ok(h) => h,
            Err(code) => return code,
        };
        return ExitCode::from_success(helper.set_bucket_policy_raw(&args.bucket, &policy).await);
    }

    let template = match build_template(&args, &config.policy) {
        Ok(t) => t,
        Err(e) => {
            formatter.error(&e);
            return ExitCode::UsageError;
        }
    };

    if args.dry_run {
        let document = template.render(&args.bucket);
        if formatter.is_json() {
            formatter.json(&document);
        } else {
            match document.to_json_pretty() {
                Ok(json) => formatter.println(&json),
                Err(e) => {
                    formatter.error(&format!("Failed to render policy: {e}"));
                    return ExitCode::GeneralError;
                }
            }
        }
        return ExitCode::Success;
    }

    let helper = match setup_helper(&config, formatter).await {
        Ok(h) => h,
        Err(code) => return code,
    };
    ExitCode::from_success(helper.set_bucket_policy(&args.bucket, &template).await)
}

/// Start from the configured template and apply command-line overrides
fn build_template(args: &SetArgs, defaults: &PolicyConfig) -> Result<PolicyTemplate, String> {
    let mut template = defaults
        .template()
        .map_err(|e| format!("Invalid [policy] configuration: {e}"))?;

    if let Some(principal) = &args.principal {
        let principal: Principal = principal.parse()?;
        template = template.with_principal(principal);
    }

    if !args.actions.is_empty() {
        template = template.with_actions(args.actions.clone());
    }

    if let Some(effect) = args.effect {
        template = template.with_effect(effect);
    }

    if args.no_sid {
        template = template.with_sid(None);
    } else if let Some(sid) = &args.sid {
        template = template.with_sid(Some(sid.clone()));
    }

    template.validate().map_err(|e| e.to_string())?;
    Ok(template)
}
