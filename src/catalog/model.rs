//! Model reference: model name to family baseline.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub name: String,
    /// Family tag, e.g. `stable_diffusion_xl`
    pub baseline: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    entries: BTreeMap<String, ModelEntry>,
}

impl ModelCatalog {
    /// Build from the upstream model reference document.
    ///
    /// The reference carries many fields per model; only `baseline` is read. Entries
    /// that are not objects are skipped with a warning.
    pub fn from_document(document: &Value) -> Self {
        let mut entries = BTreeMap::new();
        let Some(object) = document.as_object() else {
            return Self { entries };
        };
        for (name, value) in object {
            let Some(fields) = value.as_object() else {
                warn!(model = %name, "Ignoring malformed model reference entry");
                continue;
            };
            let baseline = fields
                .get("baseline")
                .and_then(Value::as_str)
                .map(str::to_string);
            entries.insert(
                name.clone(),
                ModelEntry {
                    name: name.clone(),
                    baseline,
                },
            );
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ModelEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, entry: ModelEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }
}
