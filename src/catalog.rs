//! Catalog Loader
//!
//! Fetches the model reference, style set and category set, then runs the sanity
//! gate. A document that cannot be fetched or parsed degrades to an empty mapping so
//! the run can continue; a schema violation anywhere aborts the run before any
//! generation starts.

pub mod category;
pub mod model;
pub mod source;
pub mod style;

pub use category::CategorySet;
pub use model::{ModelCatalog, ModelEntry};
pub use source::{CatalogSource, UrlCatalogSource};
pub use style::{ParamKind, Style, StyleParam, ALLOWED_PARAMS};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, SchemaViolation};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// The three raw upstream documents, after degradation.
#[derive(Debug, Clone, Default)]
pub struct CatalogDocuments {
    pub models: Value,
    pub styles: Value,
    pub categories: Value,
}

/// The validated catalog for one run. Loaded once, then only read.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub models: ModelCatalog,
    /// Styles keyed by name; iteration order is the processing order
    pub styles: BTreeMap<String, Style>,
    pub categories: CategorySet,
}

impl Catalog {
    /// Build and validate the catalog from raw documents.
    ///
    /// Every violation across all styles and categories is collected before failing.
    pub fn from_documents(documents: &CatalogDocuments) -> Result<Self, CatalogError> {
        let models = ModelCatalog::from_document(&documents.models);
        let mut violations: Vec<SchemaViolation> = Vec::new();

        let mut styles = BTreeMap::new();
        if let Some(object) = documents.styles.as_object() {
            for (name, value) in object {
                match Style::parse(name, value) {
                    Ok(style) => {
                        styles.insert(name.clone(), style);
                    }
                    Err(mut found) => violations.append(&mut found),
                }
            }
        }

        let categories = match CategorySet::from_document(&documents.categories) {
            Ok(categories) => categories,
            Err(mut found) => {
                violations.append(&mut found);
                CategorySet::default()
            }
        };

        if !violations.is_empty() {
            return Err(CatalogError::SchemaViolations(violations));
        }

        categories.ensure_acyclic()?;

        Ok(Self {
            models,
            styles,
            categories,
        })
    }

    /// Raw style objects keyed by name, as persisted in the run snapshot.
    pub fn style_snapshot(&self) -> BTreeMap<String, Map<String, Value>> {
        self.styles
            .iter()
            .map(|(name, style)| (name.clone(), style.raw.clone()))
            .collect()
    }
}

/// Fetch all three documents, degrading each failure to an empty object.
pub async fn load_documents(
    source: &dyn CatalogSource,
    config: &CatalogConfig,
) -> CatalogDocuments {
    info!("Fetching models");
    let models = fetch_or_empty(source, &config.models_url, "models").await;
    info!("Fetching styles");
    let styles = fetch_or_empty(source, &config.styles_url, "styles").await;
    info!("Fetching categories");
    let categories = fetch_or_empty(source, &config.categories_url, "categories").await;

    CatalogDocuments {
        models,
        styles,
        categories,
    }
}

/// Fetch and validate in one step.
pub async fn load_catalog(
    source: &dyn CatalogSource,
    config: &CatalogConfig,
) -> Result<Catalog, CatalogError> {
    let documents = load_documents(source, config).await;
    info!("Performing sanity checks");
    let catalog = Catalog::from_documents(&documents)?;
    info!(
        models = catalog.models.len(),
        styles = catalog.styles.len(),
        categories = catalog.categories.len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

async fn fetch_or_empty(source: &dyn CatalogSource, url: &str, label: &str) -> Value {
    match source.fetch_json(url).await {
        Ok(value) if value.is_object() => value,
        Ok(_) => {
            warn!(document = label, url, "Catalog document is not a JSON object; using empty");
            Value::Object(Map::new())
        }
        Err(e) => {
            warn!(document = label, url, error = %e, "Catalog document unavailable; using empty");
            Value::Object(Map::new())
        }
    }
}
