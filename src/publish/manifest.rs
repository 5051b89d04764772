//! Machine-readable manifest: style -> sample -> public image URL.

use crate::pipeline::StatusTable;
use crate::types::{artifact_key, Sample};
use std::collections::BTreeMap;

pub type Manifest = BTreeMap<String, BTreeMap<Sample, String>>;

/// Successful samples only; a style without successes maps to an empty object.
pub fn build_manifest(table: &StatusTable, cdn_url_prefix: &str) -> Manifest {
    let prefix = cdn_url_prefix.trim_end_matches('/');
    table
        .iter()
        .map(|(name, outcome)| {
            let urls = Sample::ALL
                .into_iter()
                .filter(|sample| outcome.is_success(*sample))
                .map(|sample| (sample, format!("{}/{}", prefix, artifact_key(name, sample))))
                .collect();
            (name.clone(), urls)
        })
        .collect()
}

pub fn render_manifest(table: &StatusTable, cdn_url_prefix: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&build_manifest(table, cdn_url_prefix))
}
