//! Catalog loading: sanity gate, degradation, and category cycles

use crate::integration::test_utils::{models_document, Harness, MemoryCatalogSource};
use serde_json::json;
use stylepreview::catalog::load_catalog;
use stylepreview::config::PreviewConfig;
use stylepreview::error::{CatalogError, PipelineError};

const MODELS: &str = "mem://models";
const STYLES: &str = "mem://styles";
const CATEGORIES: &str = "mem://categories";

fn config() -> PreviewConfig {
    let mut config = PreviewConfig::default();
    config.catalog.models_url = MODELS.to_string();
    config.catalog.styles_url = STYLES.to_string();
    config.catalog.categories_url = CATEGORIES.to_string();
    config
}

#[tokio::test(start_paused = true)]
async fn test_unknown_key_aborts_before_any_write() {
    let harness = Harness::new();
    let source = MemoryCatalogSource::new()
        .with(MODELS, models_document())
        .with(
            STYLES,
            json!({
                "Good": {"model": "Deliberate"},
                "Bad": {"model": "Deliberate", "seed": 42, "steps": "many"}
            }),
        )
        .with(CATEGORIES, json!({}));

    let err = harness
        .pipeline()
        .run_from_source(&source, &config())
        .await
        .unwrap_err();

    match err {
        PipelineError::Catalog(CatalogError::SchemaViolations(violations)) => {
            assert_eq!(violations.len(), 2);
            assert!(violations.iter().all(|v| v.owner == "Bad"));
        }
        other => panic!("expected schema violations, got {:?}", other),
    }
    assert_eq!(harness.artifacts.writes(), 0);
    assert_eq!(harness.service.submissions(), 0);
    assert!(harness.fingerprints.accessed_keys().is_empty());
    assert!(harness.documents.documents().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_documents_degrade_to_empty() {
    let harness = Harness::new();
    let source = MemoryCatalogSource::new()
        .with(MODELS, models_document())
        .with(STYLES, json!({"Neon": {"model": "Deliberate"}}));

    let report = harness
        .pipeline()
        .run_from_source(&source, &config())
        .await
        .unwrap();

    assert_eq!(report.table.len(), 1);
    assert!(harness
        .documents
        .documents()
        .keys()
        .all(|path| !path.starts_with("categories/")));
}

#[tokio::test]
async fn test_missing_model_reference_degrades_to_empty() {
    let source = MemoryCatalogSource::new().with(
        STYLES,
        json!({"Neon": {"model": "Deliberate"}, "Plain": {"steps": 10}}),
    );

    let catalog = load_catalog(&source, &config().catalog).await.unwrap();

    assert!(catalog.models.is_empty());
    assert_eq!(catalog.styles.len(), 2);
}

#[tokio::test]
async fn test_non_object_document_degrades() {
    let source = MemoryCatalogSource::new()
        .with(MODELS, models_document())
        .with(STYLES, json!(["not", "an", "object"]))
        .with(CATEGORIES, json!({"Empty": []}));

    let catalog = load_catalog(&source, &config().catalog).await.unwrap();

    assert!(catalog.styles.is_empty());
    assert_eq!(catalog.categories.len(), 1);
}

#[tokio::test]
async fn test_category_cycle_is_rejected() {
    let source = MemoryCatalogSource::new()
        .with(MODELS, models_document())
        .with(STYLES, json!({}))
        .with(CATEGORIES, json!({"A": ["B"], "B": ["C"], "C": ["A"]}));

    let err = load_catalog(&source, &config().catalog).await.unwrap_err();

    match err {
        CatalogError::CategoryCycle(path) => {
            assert_eq!(path.first(), path.last());
            assert_eq!(path.len(), 4);
        }
        other => panic!("expected category cycle, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_category_is_a_violation() {
    let source = MemoryCatalogSource::new()
        .with(MODELS, models_document())
        .with(STYLES, json!({}))
        .with(CATEGORIES, json!({"A": "not a list"}));

    let err = load_catalog(&source, &config().catalog).await.unwrap_err();
    assert!(matches!(err, CatalogError::SchemaViolations(v) if v.len() == 1));
}
