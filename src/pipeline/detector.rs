//! Change Detector
//!
//! Decides per style whether its previews are current, purges artifacts of styles
//! that left the catalog, and records new fingerprints. Comparison is exact: any
//! difference in the canonical style object counts as a change.

use crate::catalog::{Catalog, Style};
use crate::error::StorageError;
use crate::fingerprint::{compute_style_fingerprint, from_hex, to_hex};
use crate::store::{ArtifactStore, FingerprintRecord, FingerprintStore, StyleSnapshot};
use crate::types::{artifact_key, safe_name, Fingerprint, Sample};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleDecision {
    Unchanged,
    Changed(ChangeReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    /// No fingerprint on record
    New,
    /// Definition differs from the recorded fingerprint; old artifacts were purged
    Modified,
    /// Fingerprint matches but at least one artifact is missing
    Incomplete,
    /// Definition differs and some artifacts are missing; the remaining ones are kept
    ModifiedIncomplete,
}

pub struct ChangeDetector<'a> {
    artifacts: &'a dyn ArtifactStore,
    fingerprints: &'a dyn FingerprintStore,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(artifacts: &'a dyn ArtifactStore, fingerprints: &'a dyn FingerprintStore) -> Self {
        Self {
            artifacts,
            fingerprints,
        }
    }

    /// Purge every style present in the previous snapshot but absent from the catalog.
    ///
    /// Returns the removed style names. Missing artifacts or fingerprints are not
    /// errors; the purge is idempotent.
    pub fn prune_removed(
        &self,
        previous: &StyleSnapshot,
        catalog: &Catalog,
    ) -> Result<Vec<String>, StorageError> {
        let mut removed = Vec::new();
        for name in previous.keys() {
            if catalog.styles.contains_key(name) {
                continue;
            }
            let mut deleted = 0usize;
            for sample in Sample::ALL {
                if self.artifacts.delete(&artifact_key(name, sample))? {
                    deleted += 1;
                }
            }
            self.fingerprints.remove(&safe_name(name))?;
            info!(style = %name, artifacts = deleted, "Removed style purged");
            removed.push(name.clone());
        }
        Ok(removed)
    }

    /// Decide whether a style must be (re)generated, and record its fingerprint if so.
    pub fn decide(&self, style: &Style) -> Result<StyleDecision, StorageError> {
        let key = safe_name(&style.name);
        let fingerprint = compute_style_fingerprint(&style.raw);
        let all_present = self.all_artifacts_present(&style.name)?;

        let recorded: Option<Fingerprint> = self
            .fingerprints
            .get(&key)?
            .and_then(|record| from_hex(&record.fingerprint));

        let decision = match recorded {
            Some(previous) if previous == fingerprint && all_present => {
                debug!(style = %style.name, "Style unchanged");
                return Ok(StyleDecision::Unchanged);
            }
            Some(_) if all_present => {
                for sample in Sample::ALL {
                    self.artifacts.delete(&artifact_key(&style.name, sample))?;
                }
                info!(style = %style.name, "Style changed, previews purged");
                StyleDecision::Changed(ChangeReason::Modified)
            }
            Some(previous) if previous == fingerprint => {
                StyleDecision::Changed(ChangeReason::Incomplete)
            }
            Some(_) => StyleDecision::Changed(ChangeReason::ModifiedIncomplete),
            None => StyleDecision::Changed(ChangeReason::New),
        };

        self.fingerprints
            .put(&key, &FingerprintRecord::new(to_hex(&fingerprint)))?;
        Ok(decision)
    }

    fn all_artifacts_present(&self, style_name: &str) -> Result<bool, StorageError> {
        for sample in Sample::ALL {
            if !self.artifacts.exists(&artifact_key(style_name, sample))? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
