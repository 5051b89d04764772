//! Sample executor: runs the three sample attempts of one style.
//!
//! Attempts start staggered by their index and run concurrently; a failure is
//! recorded against its own sample only.

use crate::catalog::Style;
use crate::error::GenerationError;
use crate::pipeline::outcome::SampleOutcome;
use crate::provider::GenerationClient;
use crate::request::RequestBuilder;
use crate::store::ArtifactStore;
use crate::types::{artifact_key, Sample};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct SampleExecutor<'a> {
    client: &'a GenerationClient,
    artifacts: &'a dyn ArtifactStore,
    stagger: Duration,
    cancel: &'a CancellationToken,
    submissions: AtomicUsize,
}

impl<'a> SampleExecutor<'a> {
    pub fn new(
        client: &'a GenerationClient,
        artifacts: &'a dyn ArtifactStore,
        stagger: Duration,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            client,
            artifacts,
            stagger,
            cancel,
            submissions: AtomicUsize::new(0),
        }
    }

    /// Jobs submitted so far by this executor.
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Attempt every sample of a style and collect one outcome per sample.
    pub async fn run_style(
        &self,
        style: &Style,
        builder: &RequestBuilder<'_>,
    ) -> BTreeMap<Sample, SampleOutcome> {
        let mut attempts = FuturesUnordered::new();
        for (index, sample) in Sample::ALL.into_iter().enumerate() {
            let delay = self.stagger * index as u32;
            attempts.push(async move {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                (sample, self.attempt(style, sample, builder).await)
            });
        }

        let mut outcomes = BTreeMap::new();
        while let Some((sample, result)) = attempts.next().await {
            let outcome = match result {
                Ok(key) => SampleOutcome::Success { artifact_key: key },
                Err(err) => {
                    error!(style = %style.name, sample = %sample, error = %err, "Sample failed");
                    SampleOutcome::failed(err.to_string())
                }
            };
            outcomes.insert(sample, outcome);
        }
        outcomes
    }

    async fn attempt(
        &self,
        style: &Style,
        sample: Sample,
        builder: &RequestBuilder<'_>,
    ) -> Result<String, GenerationError> {
        // Unknown models fail even when an old artifact is still on disk.
        let request = builder.build(style, sample.prompt())?;

        let key = artifact_key(&style.name, sample);
        if self.artifacts.exists(&key)? {
            return Ok(key);
        }

        self.submissions.fetch_add(1, Ordering::SeqCst);
        let accepted = self.client.generate(&request, self.cancel).await?;
        let image = accepted
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::NoAcceptedResults(format!("{} {}", style.name, sample)))?;

        let bytes = self.client.download(&image).await?;
        self.artifacts.put(&key, &bytes)?;
        info!(style = %style.name, sample = %sample, artifact = %key, "Preview stored");
        Ok(key)
    }
}
