//! Generation Service Abstraction
//!
//! The remote image-generation service is reached through [`GenerationService`], a thin
//! submit / check / results / download contract. [`GenerationClient`] layers polling,
//! the poll budget, cancellation and policy filtering on top of it.

use crate::error::GenerationError;
use crate::request::GenerationRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod generation;
pub mod horde;

pub use generation::{AcceptedImage, GenerationClient, PollPolicy};
pub use horde::HordeClient;

/// Accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedJob {
    pub id: String,
    /// Estimated cost reported by the service
    #[serde(default)]
    pub kudos: Option<f64>,
}

/// Progress snapshot for a submitted job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobCheck {
    pub done: bool,
    #[serde(default)]
    pub faulted: bool,
    #[serde(default = "default_true")]
    pub is_possible: bool,
    #[serde(default)]
    pub finished: u32,
    #[serde(default)]
    pub processing: u32,
    #[serde(default)]
    pub waiting: u32,
    #[serde(default)]
    pub queue_position: Option<u64>,
    /// Estimated seconds until done
    #[serde(default)]
    pub wait_time: Option<u64>,
}

fn default_true() -> bool {
    true
}

/// One generated image as described by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    /// Download URL; unusable when the image was censored
    #[serde(rename = "img", default)]
    pub url: Option<String>,
    #[serde(default)]
    pub censored: bool,
}

/// Remote generation service client trait
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Submit a request, returning the job id
    async fn submit(&self, request: &GenerationRequest) -> Result<SubmittedJob, GenerationError>;

    /// Check whether a job is done
    async fn check(&self, job_id: &str) -> Result<JobCheck, GenerationError>;

    /// Fetch the ordered result descriptors of a finished job
    async fn results(&self, job_id: &str) -> Result<Vec<GeneratedImage>, GenerationError>;

    /// Download an accepted image
    async fn download(&self, url: &str) -> Result<Vec<u8>, GenerationError>;

    /// Service name for logs
    fn service_name(&self) -> &str;
}

// Helper function to map HTTP errors to GenerationError
pub(crate) fn map_http_error(error: reqwest::Error) -> GenerationError {
    if let Some(status) = error.status() {
        map_status(status.as_u16(), &error.to_string())
    } else if error.is_timeout() {
        GenerationError::RequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        GenerationError::RequestFailed(format!("Connection error: {}", error))
    } else if error.is_decode() {
        GenerationError::InvalidResponse(error.to_string())
    } else {
        GenerationError::RequestFailed(format!("HTTP error: {}", error))
    }
}

pub(crate) fn map_status(status: u16, message: &str) -> GenerationError {
    match status {
        401 | 403 => GenerationError::AuthFailed(message.to_string()),
        429 => GenerationError::RateLimited(message.to_string()),
        _ => GenerationError::RequestFailed(format!("status {}: {}", status, message)),
    }
}
