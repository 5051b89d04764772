//! CLI parse: clap types for stylepreview. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Incremental preview gallery generator for image-generation styles
#[derive(Parser)]
#[command(name = "stylepreview")]
#[command(about = "Generate and publish preview images for AI Horde styles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch catalogs, regenerate changed previews, and publish documents
    Run {
        /// Output format for the run summary (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Fetch catalogs and run the sanity checks only
    Validate,
}

impl Commands {
    /// Command name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Run { .. } => "run",
            Commands::Validate => "validate",
        }
    }
}
