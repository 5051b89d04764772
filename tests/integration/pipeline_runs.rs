//! End-to-end pipeline runs against in-memory stores and a fake generation service

use crate::integration::test_utils::{catalog, empty, Harness, CDN};
use serde_json::json;
use stylepreview::error::PipelineError;
use stylepreview::fingerprint::{compute_style_fingerprint, to_hex};
use stylepreview::pipeline::StyleDisposition;
use stylepreview::store::{ArtifactStore, FingerprintStore, SnapshotStore};
use stylepreview::types::Sample;
use tokio_util::sync::CancellationToken;

fn two_styles() -> serde_json::Value {
    json!({
        "Ink Wash": {"model": "Deliberate", "prompt": "{p}, ink wash###{np}", "steps": 20},
        "Neon": {"model": "Deliberate", "cfg_scale": 6.5}
    })
}

#[tokio::test(start_paused = true)]
async fn test_second_run_is_idempotent() {
    let harness = Harness::new();
    let catalog = catalog(two_styles(), json!({"Mood": ["Neon"]}));

    let first = harness.pipeline().run(&catalog).await.unwrap();
    assert_eq!(first.submissions, 6);
    assert_eq!(first.regenerated_styles(), 2);
    let previews = harness.document("previews.md");
    let manifest = harness.document("previews.json");
    let category = harness.document("categories/mood.md");
    let writes = harness.artifacts.writes();

    let second = harness.pipeline().run(&catalog).await.unwrap();
    assert_eq!(second.submissions, 0);
    assert_eq!(second.unchanged_styles(), 2);
    assert_eq!(harness.service.submissions(), 6);
    assert_eq!(harness.artifacts.writes(), writes);
    assert_eq!(harness.document("previews.md"), previews);
    assert_eq!(harness.document("previews.json"), manifest);
    assert_eq!(harness.document("categories/mood.md"), category);
}

#[tokio::test(start_paused = true)]
async fn test_first_run_publishes_every_document() {
    let harness = Harness::new();
    let catalog = catalog(two_styles(), json!({"Mood": ["Neon"]}));

    harness.pipeline().run(&catalog).await.unwrap();

    let previews = harness.document("previews.md");
    assert!(previews.starts_with("# Style Previews\n\n## Ink Wash\n"));
    assert!(previews.contains("![Neon thing preview](/images/neon_thing.webp?raw=true)"));
    assert_eq!(
        harness.manifest()["Ink Wash"]["place"],
        format!("{}/ink_wash_place.webp", CDN)
    );
    assert_eq!(
        harness.artifacts.keys().len(),
        6,
        "one artifact per (style, sample)"
    );
    let saved = harness.snapshot.current().unwrap();
    assert_eq!(saved.keys().collect::<Vec<_>>(), vec!["Ink Wash", "Neon"]);
}

#[tokio::test(start_paused = true)]
async fn test_prompt_template_reaches_the_service() {
    let harness = Harness::new();
    let catalog = catalog(two_styles(), empty());

    harness.pipeline().run(&catalog).await.unwrap();

    let requests = harness.service.requests();
    let ink: Vec<_> = requests
        .iter()
        .filter(|r| r.prompt.ends_with(", ink wash###"))
        .collect();
    assert_eq!(ink.len(), 3);
    assert!(ink.iter().all(|r| r.params.steps == 20));
    assert!(ink.iter().all(|r| r.models == vec!["Deliberate"]));
    assert!(requests
        .iter()
        .any(|r| r.prompt == Sample::Thing.prompt() && r.params.cfg_scale.as_f64() == Some(6.5)));
}

#[tokio::test(start_paused = true)]
async fn test_removed_style_is_purged_everywhere() {
    let harness = Harness::new();
    harness
        .pipeline()
        .run(&catalog(two_styles(), json!({"Mood": ["Neon", "Ink Wash"]})))
        .await
        .unwrap();
    assert!(harness.fingerprints.get("neon").unwrap().is_some());

    let without_neon = catalog(
        json!({"Ink Wash": {"model": "Deliberate", "prompt": "{p}, ink wash###{np}", "steps": 20}}),
        json!({"Mood": ["Neon", "Ink Wash"]}),
    );
    let report = harness.pipeline().run(&without_neon).await.unwrap();

    assert_eq!(report.removed_styles, vec!["Neon"]);
    assert_eq!(report.submissions, 0);
    for sample in Sample::ALL {
        assert!(!harness
            .artifacts
            .exists(&format!("neon_{}.webp", sample))
            .unwrap());
    }
    assert!(harness.fingerprints.get("neon").unwrap().is_none());
    assert!(!harness.document("previews.md").contains("Neon"));
    assert!(harness.manifest().get("Neon").is_none());
    assert!(!harness.document("categories/mood.md").contains("Neon"));
    assert!(!harness.snapshot.load().unwrap().unwrap().contains_key("Neon"));
}

#[tokio::test(start_paused = true)]
async fn test_changed_style_regenerates_all_samples() {
    let harness = Harness::new();
    harness
        .pipeline()
        .run(&catalog(two_styles(), empty()))
        .await
        .unwrap();

    let mut styles = two_styles();
    styles["Neon"]["cfg_scale"] = json!(9.0);
    let report = harness
        .pipeline()
        .run(&catalog(styles.clone(), empty()))
        .await
        .unwrap();

    assert_eq!(report.submissions, 3);
    assert_eq!(report.unchanged_styles(), 1);
    assert_eq!(
        report.table.get("Neon").unwrap().disposition,
        StyleDisposition::Regenerated
    );
    let expected = to_hex(&compute_style_fingerprint(
        styles["Neon"].as_object().unwrap(),
    ));
    assert_eq!(
        harness.fingerprints.get("neon").unwrap().unwrap().fingerprint,
        expected
    );
}

#[tokio::test(start_paused = true)]
async fn test_missing_artifact_resumes_only_that_sample() {
    let harness = Harness::new();
    let catalog = catalog(two_styles(), empty());
    harness.pipeline().run(&catalog).await.unwrap();

    harness.artifacts.delete("neon_place.webp").unwrap();
    let report = harness.pipeline().run(&catalog).await.unwrap();

    assert_eq!(report.submissions, 1);
    assert_eq!(report.failed_samples(), 0);
    assert!(harness.artifacts.exists("neon_place.webp").unwrap());
    let neon_requests = harness
        .service
        .requests()
        .into_iter()
        .filter(|r| r.params.cfg_scale.as_f64() == Some(6.5))
        .count();
    assert_eq!(neon_requests, 4);
}

#[tokio::test(start_paused = true)]
async fn test_skip_list_style_never_touches_service_or_fingerprints() {
    let harness = Harness::new();
    let catalog = catalog(
        json!({
            "stonehenge sunrise": {"model": "Deliberate"},
            "Neon": {"model": "Deliberate"}
        }),
        empty(),
    );

    let report = harness.pipeline().run(&catalog).await.unwrap();

    assert_eq!(report.skipped_styles(), 1);
    assert_eq!(report.submissions, 3);
    let skipped = report.table.get("stonehenge sunrise").unwrap();
    assert_eq!(skipped.success_count(), 0);
    assert!(!harness
        .fingerprints
        .accessed_keys()
        .contains(&"stonehenge_sunrise".to_string()));
    assert!(harness
        .document("previews.md")
        .contains("## stonehenge sunrise\n| person | place | thing |\n| --- | --- | --- |\n| ❌ | ❌ | ❌ |\n\n"));
    assert_eq!(harness.manifest()["stonehenge sunrise"], json!({}));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_model_fails_style_without_submitting() {
    let harness = Harness::new();
    let catalog = catalog(
        json!({
            "Ghost": {"model": "Not A Model"},
            "Neon": {"model": "Deliberate"}
        }),
        empty(),
    );

    let report = harness.pipeline().run(&catalog).await.unwrap();

    assert_eq!(report.submissions, 3);
    assert_eq!(report.table.get("Ghost").unwrap().failure_count(), 3);
    assert_eq!(report.table.get("Neon").unwrap().success_count(), 3);
    assert!(harness
        .service
        .requests()
        .iter()
        .all(|r| r.models == vec!["Deliberate"]));
}

#[tokio::test(start_paused = true)]
async fn test_sdxl_family_forces_hires_fix_off() {
    let harness = Harness::new();
    let catalog = catalog(
        json!({
            "Crisp": {"model": "AlbedoBase XL (SDXL)", "hires_fix": true},
            "Soft": {"model": "Deliberate", "hires_fix": true}
        }),
        empty(),
    );

    harness.pipeline().run(&catalog).await.unwrap();

    let requests = harness.service.requests();
    let (sdxl, sd1): (Vec<_>, Vec<_>) = requests
        .iter()
        .partition(|r| r.models == vec!["AlbedoBase XL (SDXL)"]);
    assert_eq!(sdxl.len(), 3);
    assert!(sdxl.iter().all(|r| !r.params.hires_fix));
    assert!(sd1.iter().all(|r| r.params.hires_fix));
}

#[tokio::test(start_paused = true)]
async fn test_censored_sample_is_marked_failed() {
    let harness = Harness::new();
    harness.service.censor("New York");
    let catalog = catalog(json!({"Neon": {"model": "Deliberate"}}), empty());

    let report = harness.pipeline().run(&catalog).await.unwrap();

    let neon = report.table.get("Neon").unwrap();
    assert!(neon.is_success(Sample::Person));
    assert!(!neon.is_success(Sample::Place));
    assert!(harness.document("previews.md").contains(
        "| ![Neon person preview](/images/neon_person.webp?raw=true) | ❌ | ![Neon thing preview]"
    ));
    assert!(harness.manifest()["Neon"].get("place").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_category_documents_nest_and_drop_unknown_members() {
    let harness = Harness::new();
    let catalog = catalog(
        json!({"styleX": {"model": "Deliberate"}}),
        json!({"A": ["B", "styleX", "nobody"], "B": []}),
    );

    harness.pipeline().run(&catalog).await.unwrap();

    let a = harness.document("categories/a.md");
    assert!(a.starts_with("# A\n\n- [B](/categories/b.md)\n\n## styleX\n"));
    assert!(!a.contains("nobody"));
    assert_eq!(harness.document("categories/b.md"), "# B\n\n");
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_run_publishes_nothing() {
    let harness = Harness::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = harness
        .pipeline_with_cancel(cancel)
        .run(&catalog(two_styles(), empty()))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Cancelled));
    assert_eq!(harness.service.submissions(), 0);
    assert!(harness.documents.documents().is_empty());
    assert!(harness.snapshot.current().is_none());
}
