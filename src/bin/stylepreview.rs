//! stylepreview CLI Binary
//!
//! Command-line interface for the style preview gallery generator.

use anyhow::{Context, Error, Result};
use clap::Parser;
use std::process;
use stylepreview::cli::{map_error, Cli, RunContext};
use stylepreview::config::ConfigLoader;
use stylepreview::logging::{init_logging, LoggingConfig};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("{:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(cli);

    // Initialize logging early
    init_logging(Some(&logging_config)).context("Failed to initialize logging")?;

    info!("stylepreview starting");

    let context = load_context(cli)?;
    context
        .execute(&cli.command)
        .map_err(|e| Error::msg(map_error(&e)))
}

fn load_context(cli: &Cli) -> Result<RunContext> {
    RunContext::new(cli.workspace.clone(), cli.config.clone())
        .map_err(|e| Error::msg(map_error(&e)))
        .with_context(|| {
            format!(
                "Error loading configuration for workspace {}",
                cli.workspace.display()
            )
        })
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.workspace)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
