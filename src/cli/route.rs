//! CLI route: single route table and run context. Dispatches to the pipeline and presentation.

use crate::catalog::{load_catalog, UrlCatalogSource};
use crate::cli::parse::Commands;
use crate::cli::presentation::{format_run_report, format_validate_report, ValidateReport};
use crate::config::{ConfigLoader, PreviewConfig};
use crate::error::PipelineError;
use crate::pipeline::{Pipeline, PipelineSettings, PipelineStores};
use crate::provider::{GenerationClient, HordeClient, PollPolicy};
use crate::store::fingerprints::FINGERPRINT_DB_DIR;
use crate::store::{FileSnapshotStore, FsArtifactStore, FsDocumentSink, SledFingerprintStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Runtime context for CLI execution: workspace, resolved config, and output root.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    config: PreviewConfig,
    workspace_root: PathBuf,
    output_root: PathBuf,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, PipelineError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::from_config(workspace_root, config)
    }

    /// Create run context from an already loaded config.
    pub fn from_config(workspace_root: PathBuf, config: PreviewConfig) -> Result<Self, PipelineError> {
        if let Err(errors) = config.validate() {
            let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Err(PipelineError::ConfigError(joined.join("; ")));
        }
        let output_root = config.output.resolve_root(&workspace_root);
        Ok(Self {
            config,
            workspace_root,
            output_root,
        })
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn output_root(&self) -> &PathBuf {
        &self.output_root
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, PipelineError> {
        let started = Instant::now();
        info!(
            command = command.name(),
            workspace = %self.workspace_root.display(),
            "Command started"
        );
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| PipelineError::Client(format!("Failed to start async runtime: {}", e)))?;
        let result = runtime.block_on(self.execute_inner(command));
        info!(
            command = command.name(),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    async fn execute_inner(&self, command: &Commands) -> Result<String, PipelineError> {
        match command {
            Commands::Run { format } => self.handle_run(format).await,
            Commands::Validate => self.handle_validate().await,
        }
    }

    async fn handle_validate(&self) -> Result<String, PipelineError> {
        let source = UrlCatalogSource::new()?;
        let catalog = load_catalog(&source, &self.config.catalog).await?;
        Ok(format_validate_report(&ValidateReport::from(&catalog)))
    }

    async fn handle_run(&self, format: &str) -> Result<String, PipelineError> {
        let api_key = self.config.api_key().ok_or_else(|| {
            PipelineError::ConfigError(
                "horde.api_key is required for run (set STYLEPREVIEW__HORDE__API_KEY)".to_string(),
            )
        })?;

        let horde = HordeClient::new(&self.config.horde, api_key.to_string())
            .map_err(|e| PipelineError::Client(e.to_string()))?;
        let client = GenerationClient::new(
            Arc::new(horde),
            PollPolicy {
                interval: self.config.generation.poll_interval(),
                max_attempts: self.config.generation.max_poll_attempts,
            },
        );

        let fingerprints = SledFingerprintStore::new(self.output_root.join(FINGERPRINT_DB_DIR))?;
        let stores = PipelineStores {
            artifacts: Arc::new(FsArtifactStore::new(&self.output_root)?),
            fingerprints: Arc::new(fingerprints),
            snapshot: Arc::new(FileSnapshotStore::new(&self.output_root)),
            documents: Arc::new(FsDocumentSink::new(&self.output_root)),
        };

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling run");
                on_interrupt.cancel();
            }
        });

        let pipeline = Pipeline::new(
            client,
            stores,
            PipelineSettings::from_config(&self.config),
            cancel,
        );
        let source = UrlCatalogSource::new()?;
        let report = pipeline.run_from_source(&source, &self.config).await?;
        format_run_report(&report, format)
    }
}
