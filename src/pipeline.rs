//! Pipeline Orchestrator
//!
//! One run: purge removed styles, decide and (re)generate each style in name order,
//! publish the documents, then save the style snapshot for the next run.
//!
//! Styles run one after another; only the samples of one style are in flight at a
//! time. Per-sample failures end up in the status table and never abort the run.

pub mod detector;
pub mod executor;
pub mod outcome;

pub use detector::{ChangeDetector, ChangeReason, StyleDecision};
pub use executor::SampleExecutor;
pub use outcome::{RunReport, SampleOutcome, StatusTable, StyleDisposition, StyleOutcome};

use crate::catalog::{load_catalog, Catalog, CatalogSource, Style};
use crate::config::PreviewConfig;
use crate::error::PipelineError;
use crate::provider::GenerationClient;
use crate::publish::Publisher;
use crate::request::RequestBuilder;
use crate::store::{ArtifactStore, DocumentSink, FingerprintStore, SnapshotStore};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Persisted state a run reads and writes.
#[derive(Clone)]
pub struct PipelineStores {
    pub artifacts: Arc<dyn ArtifactStore>,
    pub fingerprints: Arc<dyn FingerprintStore>,
    pub snapshot: Arc<dyn SnapshotStore>,
    pub documents: Arc<dyn DocumentSink>,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub stagger: Duration,
    pub skip_styles: BTreeSet<String>,
    pub cdn_url_prefix: String,
}

impl PipelineSettings {
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self {
            stagger: config.generation.stagger(),
            skip_styles: config.generation.skip_styles.iter().cloned().collect(),
            cdn_url_prefix: config.output.cdn_url_prefix.clone(),
        }
    }
}

pub struct Pipeline {
    client: GenerationClient,
    stores: PipelineStores,
    settings: PipelineSettings,
    cancel: CancellationToken,
}

impl Pipeline {
    pub fn new(
        client: GenerationClient,
        stores: PipelineStores,
        settings: PipelineSettings,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            stores,
            settings,
            cancel,
        }
    }

    /// Load the catalog from `source` and run against it.
    pub async fn run_from_source(
        &self,
        source: &dyn CatalogSource,
        config: &PreviewConfig,
    ) -> Result<RunReport, PipelineError> {
        let catalog = load_catalog(source, &config.catalog).await?;
        self.run(&catalog).await
    }

    /// Run against an already validated catalog.
    pub async fn run(&self, catalog: &Catalog) -> Result<RunReport, PipelineError> {
        let detector = ChangeDetector::new(
            self.stores.artifacts.as_ref(),
            self.stores.fingerprints.as_ref(),
        );

        let mut report = RunReport::default();
        if let Some(previous) = self.stores.snapshot.load()? {
            report.removed_styles = detector.prune_removed(&previous, catalog)?;
        }

        let builder = RequestBuilder::new(&catalog.models);
        let executor = SampleExecutor::new(
            &self.client,
            self.stores.artifacts.as_ref(),
            self.settings.stagger,
            &self.cancel,
        );

        for (name, style) in &catalog.styles {
            if self.cancel.is_cancelled() {
                warn!(style = %name, "Run cancelled before style");
                return Err(PipelineError::Cancelled);
            }
            let outcome = self.process_style(style, &detector, &executor, &builder).await;
            report.table.insert(name.clone(), outcome);
        }
        report.submissions = executor.submissions();

        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let documents = Publisher::new(&catalog.categories, &self.settings.cdn_url_prefix)
            .render(&report.table)?;
        documents.write_to(self.stores.documents.as_ref())?;
        self.stores.snapshot.save(&catalog.style_snapshot())?;

        info!(
            styles = report.table.len(),
            unchanged = report.unchanged_styles(),
            regenerated = report.regenerated_styles(),
            skipped = report.skipped_styles(),
            failed_samples = report.failed_samples(),
            removed = report.removed_styles.len(),
            submissions = report.submissions,
            "Run complete"
        );
        Ok(report)
    }

    async fn process_style(
        &self,
        style: &Style,
        detector: &ChangeDetector<'_>,
        executor: &SampleExecutor<'_>,
        builder: &RequestBuilder<'_>,
    ) -> StyleOutcome {
        if self.settings.skip_styles.contains(&style.name) {
            info!(style = %style.name, "Style is on the skip list");
            return StyleOutcome::uniform(StyleDisposition::Skipped, |_| {
                SampleOutcome::failed("style is on the skip list")
            });
        }

        match detector.decide(style) {
            Ok(StyleDecision::Unchanged) => {
                info!(style = %style.name, "Previews up to date");
                StyleOutcome::uniform(StyleDisposition::Unchanged, |sample| {
                    SampleOutcome::success(&style.name, sample)
                })
            }
            Ok(StyleDecision::Changed(reason)) => {
                info!(style = %style.name, reason = ?reason, "Generating previews");
                StyleOutcome {
                    disposition: StyleDisposition::Regenerated,
                    samples: executor.run_style(style, builder).await,
                }
            }
            Err(err) => {
                error!(style = %style.name, error = %err, "Change detection failed");
                let reason = err.to_string();
                StyleOutcome::uniform(StyleDisposition::Regenerated, |_| {
                    SampleOutcome::failed(reason.clone())
                })
            }
        }
    }
}
