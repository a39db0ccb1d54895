//! config command - Inspect or create the configuration file

use clap::{Args, Subcommand};
use s3h_core::{Config, ConfigManager};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init(InitArgs),

    /// Print the configuration file location
    Path,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
struct PathOutput {
    path: String,
    exists: bool,
}

/// Execute a config subcommand
pub fn execute(cmd: ConfigCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let manager = match ConfigManager::new() {
        Ok(m) => m,
        Err(e) => {
            formatter.error(&format!("Failed to locate configuration: {e}"));
            return ExitCode::UsageError;
        }
    };

    match cmd {
        ConfigCommands::Show => execute_show(&manager, &formatter),
        ConfigCommands::Init(args) => execute_init(args, &manager, &formatter),
        ConfigCommands::Path => execute_path(&manager, &formatter),
    }
}

fn execute_show(manager: &ConfigManager, formatter: &Formatter) -> ExitCode {
    let config = match manager.load() {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::UsageError;
        }
    };

    if formatter.is_json() {
        formatter.json(&config);
        return ExitCode::Success;
    }

    match toml::to_string_pretty(&config) {
        Ok(text) => {
            formatter.println(text.trim_end());
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to render configuration: {e}"));
            ExitCode::GeneralError
        }
    }
}

fn execute_init(args: InitArgs, manager: &ConfigManager, formatter: &Formatter) -> ExitCode {
    let path = manager.config_path();
    if path.exists() && !args.force {
        formatter.error(&format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
        return ExitCode::UsageError;
    }

    match manager.save(&Config::default()) {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&PathOutput {
                    path: path.display().to_string(),
                    exists: true,
                });
            } else {
                formatter.success(&format!("Wrote default configuration to {}", path.display()));
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("Failed to write configuration: {e}"));
            ExitCode::GeneralError
        }
    }
}

fn execute_path(manager: &ConfigManager, formatter: &Formatter) -> ExitCode {
    let path = manager.config_path();
    if formatter.is_json() {
        formatter.json(&PathOutput {
            path: path.display().to_string(),
            exists: path.exists(),
        });
    } else {
        formatter.println(&path.display().to_string());
    }
    ExitCode::Success
}
