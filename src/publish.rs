//! Publisher
//!
//! Renders the status table into the flat preview document, the JSON manifest and
//! one document per category. Rendering is pure; [`PublishedDocuments::write_to`]
//! hands the results to a [`DocumentSink`].

pub mod categories;
pub mod manifest;
pub mod markdown;

use crate::catalog::CategorySet;
use crate::error::StorageError;
use crate::pipeline::StatusTable;
use crate::store::DocumentSink;
use crate::types::safe_name;
use std::collections::BTreeMap;
use tracing::info;

pub const PREVIEWS_DOCUMENT: &str = "previews.md";
pub const MANIFEST_DOCUMENT: &str = "previews.json";
pub const CATEGORIES_DIR: &str = "categories";

/// Relative path of a category document.
pub fn category_document_path(category: &str) -> String {
    format!("{}/{}.md", CATEGORIES_DIR, safe_name(category))
}

/// Every document produced by one run, keyed by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedDocuments {
    pub previews: String,
    pub manifest: String,
    pub categories: BTreeMap<String, String>,
}

impl PublishedDocuments {
    pub fn write_to(&self, sink: &dyn DocumentSink) -> Result<(), StorageError> {
        sink.write_document(PREVIEWS_DOCUMENT, &self.previews)?;
        sink.write_document(MANIFEST_DOCUMENT, &self.manifest)?;
        for (path, contents) in &self.categories {
            sink.write_document(path, contents)?;
        }
        info!(categories = self.categories.len(), "Documents published");
        Ok(())
    }
}

pub struct Publisher<'a> {
    categories: &'a CategorySet,
    cdn_url_prefix: &'a str,
}

impl<'a> Publisher<'a> {
    pub fn new(categories: &'a CategorySet, cdn_url_prefix: &'a str) -> Self {
        Self {
            categories,
            cdn_url_prefix,
        }
    }

    pub fn render(&self, table: &StatusTable) -> Result<PublishedDocuments, StorageError> {
        let manifest = manifest::render_manifest(table, self.cdn_url_prefix).map_err(|e| {
            StorageError::CorruptRecord {
                key: MANIFEST_DOCUMENT.to_string(),
                message: e.to_string(),
            }
        })?;

        let categories = self
            .categories
            .iter()
            .map(|(name, members)| {
                (
                    category_document_path(name),
                    categories::render_category(name, members, self.categories, table),
                )
            })
            .collect();

        Ok(PublishedDocuments {
            previews: markdown::render_previews(table),
            manifest,
            categories,
        })
    }
}
