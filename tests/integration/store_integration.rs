//! Pipeline runs against the filesystem-backed stores

use crate::integration::test_utils::{catalog, FakeGenerationService, CDN};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use stylepreview::pipeline::{Pipeline, PipelineSettings, PipelineStores, RunReport};
use stylepreview::provider::{GenerationClient, PollPolicy};
use stylepreview::store::fingerprints::FINGERPRINT_DB_DIR;
use stylepreview::store::{
    FileSnapshotStore, FsArtifactStore, FsDocumentSink, SledFingerprintStore,
};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn open_fingerprints(root: &Path) -> Arc<SledFingerprintStore> {
    Arc::new(SledFingerprintStore::new(root.join(FINGERPRINT_DB_DIR)).unwrap())
}

/// Fresh filesystem stores over `root` for every run; the sled database stays open.
async fn run_once(
    root: &Path,
    fingerprints: &Arc<SledFingerprintStore>,
    service: Arc<FakeGenerationService>,
    styles: serde_json::Value,
) -> RunReport {
    let stores = PipelineStores {
        artifacts: Arc::new(FsArtifactStore::new(root).unwrap()),
        fingerprints: fingerprints.clone(),
        snapshot: Arc::new(FileSnapshotStore::new(root)),
        documents: Arc::new(FsDocumentSink::new(root)),
    };
    let pipeline = Pipeline::new(
        GenerationClient::new(service, PollPolicy::default()),
        stores,
        PipelineSettings {
            stagger: Duration::ZERO,
            skip_styles: Default::default(),
            cdn_url_prefix: CDN.to_string(),
        },
        CancellationToken::new(),
    );
    pipeline
        .run(&catalog(styles, json!({"Mood": ["Neon"]})))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_second_run_on_disk_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let service = Arc::new(FakeGenerationService::new());
    let fingerprints = open_fingerprints(root);
    let styles = json!({"Neon": {"model": "Deliberate"}});

    let first = run_once(root, &fingerprints, service.clone(), styles.clone()).await;
    assert_eq!(first.submissions, 3);
    let manifest = std::fs::read(root.join("previews.json")).unwrap();
    let category = std::fs::read(root.join("categories/mood.md")).unwrap();

    let second = run_once(root, &fingerprints, service.clone(), styles).await;
    assert_eq!(second.submissions, 0);
    assert_eq!(service.submissions(), 3);
    assert_eq!(fingerprints.len(), 1);
    assert_eq!(std::fs::read(root.join("previews.json")).unwrap(), manifest);
    assert_eq!(std::fs::read(root.join("categories/mood.md")).unwrap(), category);
}

#[tokio::test]
async fn test_published_tree_layout() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let service = Arc::new(FakeGenerationService::new());
    let fingerprints = open_fingerprints(root);

    run_once(root, &fingerprints, service, json!({"Neon": {"model": "Deliberate"}})).await;

    for path in [
        "images/neon_person.webp",
        "images/neon_place.webp",
        "images/neon_thing.webp",
        "previews.md",
        "previews.json",
        "categories/mood.md",
        "styles.last-run.json",
    ] {
        assert!(root.join(path).is_file(), "{} should exist", path);
    }
    let leftovers: Vec<_> = std::fs::read_dir(root.join("images"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "atomic writes must not leave temp files");
}

#[tokio::test]
async fn test_removal_deletes_files_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let service = Arc::new(FakeGenerationService::new());
    let fingerprints = open_fingerprints(root);

    run_once(
        root,
        &fingerprints,
        service.clone(),
        json!({"Neon": {"model": "Deliberate"}, "Ink": {}}),
    )
    .await;
    assert!(root.join("images/ink_place.webp").is_file());

    let report = run_once(root, &fingerprints, service, json!({"Neon": {"model": "Deliberate"}})).await;

    assert_eq!(report.removed_styles, vec!["Ink"]);
    assert!(!root.join("images/ink_place.webp").exists());
    let previews = std::fs::read_to_string(root.join("previews.md")).unwrap();
    assert!(!previews.contains("## Ink"));
}
