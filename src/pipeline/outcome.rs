//! Per-run status table and summary counts.

use crate::types::{artifact_key, Sample};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of one (style, sample) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleOutcome {
    Success { artifact_key: String },
    Failed { reason: String },
}

impl SampleOutcome {
    pub fn success(style_name: &str, sample: Sample) -> Self {
        SampleOutcome::Success {
            artifact_key: artifact_key(style_name, sample),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        SampleOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SampleOutcome::Success { .. })
    }
}

/// How a style was handled this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleDisposition {
    /// On the skip list; never touched
    Skipped,
    /// Fingerprint matched and every artifact was present
    Unchanged,
    /// New, modified or incomplete; samples were attempted
    Regenerated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleOutcome {
    pub disposition: StyleDisposition,
    pub samples: BTreeMap<Sample, SampleOutcome>,
}

impl StyleOutcome {
    pub fn uniform(disposition: StyleDisposition, make: impl Fn(Sample) -> SampleOutcome) -> Self {
        Self {
            disposition,
            samples: Sample::ALL.iter().map(|s| (*s, make(*s))).collect(),
        }
    }

    /// Outcome for a sample; a missing entry reads as failed.
    pub fn is_success(&self, sample: Sample) -> bool {
        self.samples
            .get(&sample)
            .is_some_and(SampleOutcome::is_success)
    }

    pub fn success_count(&self) -> usize {
        self.samples.values().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        Sample::ALL.len() - self.success_count()
    }
}

/// Style name to per-sample outcomes, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusTable {
    styles: BTreeMap<String, StyleOutcome>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, style_name: impl Into<String>, outcome: StyleOutcome) {
        self.styles.insert(style_name.into(), outcome);
    }

    pub fn get(&self, style_name: &str) -> Option<&StyleOutcome> {
        self.styles.get(style_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StyleOutcome)> {
        self.styles.iter()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    fn count(&self, disposition: StyleDisposition) -> usize {
        self.styles
            .values()
            .filter(|o| o.disposition == disposition)
            .count()
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub table: StatusTable,
    /// Styles whose artifacts and fingerprints were purged
    pub removed_styles: Vec<String>,
    /// Jobs submitted to the generation service
    pub submissions: usize,
}

impl RunReport {
    pub fn unchanged_styles(&self) -> usize {
        self.table.count(StyleDisposition::Unchanged)
    }

    pub fn regenerated_styles(&self) -> usize {
        self.table.count(StyleDisposition::Regenerated)
    }

    pub fn skipped_styles(&self) -> usize {
        self.table.count(StyleDisposition::Skipped)
    }

    pub fn successful_samples(&self) -> usize {
        self.table.iter().map(|(_, o)| o.success_count()).sum()
    }

    pub fn failed_samples(&self) -> usize {
        self.table.iter().map(|(_, o)| o.failure_count()).sum()
    }
}
