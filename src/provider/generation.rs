//! Submit-and-wait on top of a [`GenerationService`].
//!
//! One job per call: submit, poll at a fixed interval until done, fetch descriptors,
//! drop policy-rejected ones. The wait is bounded by a poll budget and can be
//! cancelled at any poll boundary.

use crate::error::GenerationError;
use crate::provider::GenerationService;
use crate::request::GenerationRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Polling behaviour for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Checks performed before giving up with `Timeout`
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15),
            max_attempts: 240,
        }
    }
}

/// An image that passed the policy filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedImage {
    pub id: String,
    pub url: String,
}

#[derive(Clone)]
pub struct GenerationClient {
    service: Arc<dyn GenerationService>,
    policy: PollPolicy,
}

impl GenerationClient {
    pub fn new(service: Arc<dyn GenerationService>, policy: PollPolicy) -> Self {
        Self { service, policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Run one request to completion and return the accepted images in service order.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<AcceptedImage>, GenerationError> {
        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled("(not submitted)".to_string()));
        }

        let job = self.service.submit(request).await?;
        info!(
            service = self.service.service_name(),
            job_id = %job.id,
            kudos = job.kudos.unwrap_or_default(),
            "Generation submitted"
        );

        self.wait_for_completion(&job.id, cancel).await?;
        info!(job_id = %job.id, "Generation complete");

        let results = self.service.results(&job.id).await?;
        Ok(filter_accepted(&job.id, results))
    }

    /// Download the bytes of an accepted image.
    pub async fn download(&self, image: &AcceptedImage) -> Result<Vec<u8>, GenerationError> {
        self.service.download(&image.url).await
    }

    async fn wait_for_completion(
        &self,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(), GenerationError> {
        for attempt in 1..=self.policy.max_attempts {
            if cancel.is_cancelled() {
                return Err(GenerationError::Cancelled(job_id.to_string()));
            }

            let check = self.service.check(job_id).await?;
            if check.faulted {
                return Err(GenerationError::Faulted(job_id.to_string()));
            }
            if check.done {
                return Ok(());
            }
            if !check.is_possible {
                warn!(job_id, "No worker can currently serve this job");
            }
            debug!(
                job_id,
                attempt,
                queue_position = check.queue_position,
                wait_time = check.wait_time,
                waiting = check.waiting,
                processing = check.processing,
                "Generation pending"
            );

            if attempt == self.policy.max_attempts {
                break;
            }
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(GenerationError::Cancelled(job_id.to_string()));
                }
                _ = sleep(self.policy.interval) => {}
            }
        }

        Err(GenerationError::Timeout {
            job_id: job_id.to_string(),
            attempts: self.policy.max_attempts,
        })
    }
}

fn filter_accepted(
    job_id: &str,
    results: Vec<crate::provider::GeneratedImage>,
) -> Vec<AcceptedImage> {
    results
        .into_iter()
        .filter_map(|image| match (image.censored, image.url) {
            (false, Some(url)) if !url.is_empty() => Some(AcceptedImage { id: image.id, url }),
            (true, _) => {
                warn!(job_id, image_id = %image.id, "Censored image detected, discarded");
                None
            }
            (false, _) => {
                warn!(job_id, image_id = %image.id, "Image has no usable URL, discarded");
                None
            }
        })
        .collect()
}
