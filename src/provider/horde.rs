//! AI Horde v2 async image generation client.

use crate::config::HordeConfig;
use crate::error::GenerationError;
use crate::provider::{
    map_http_error, map_status, GeneratedImage, GenerationService, JobCheck, SubmittedJob,
};
use crate::request::GenerationRequest;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

const HORDE_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct StatusResponse {
    #[serde(default)]
    generations: Vec<GeneratedImage>,
}

pub struct HordeClient {
    client: Client,
    base_url: String,
    api_key: String,
    client_agent: String,
}

impl HordeClient {
    pub fn new(config: &HordeConfig, api_key: String) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .connect_timeout(HORDE_HTTP_CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                GenerationError::RequestFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            client_agent: config.client_agent.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v2/{}", self.base_url, path)
    }

    async fn ensure_success(response: Response) -> Result<Response, GenerationError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(map_status(status, &error_text))
    }
}

#[async_trait]
impl GenerationService for HordeClient {
    async fn submit(&self, request: &GenerationRequest) -> Result<SubmittedJob, GenerationError> {
        let response = self
            .client
            .post(self.endpoint("generate/async"))
            .header("apikey", &self.api_key)
            .header("Client-Agent", &self.client_agent)
            .json(request)
            .send()
            .await
            .map_err(map_http_error)?;

        Self::ensure_success(response)
            .await?
            .json::<SubmittedJob>()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("submit: {}", e)))
    }

    async fn check(&self, job_id: &str) -> Result<JobCheck, GenerationError> {
        let response = self
            .client
            .get(self.endpoint(&format!("generate/check/{}", job_id)))
            .header("Client-Agent", &self.client_agent)
            .send()
            .await
            .map_err(map_http_error)?;

        Self::ensure_success(response)
            .await?
            .json::<JobCheck>()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("check: {}", e)))
    }

    async fn results(&self, job_id: &str) -> Result<Vec<GeneratedImage>, GenerationError> {
        let response = self
            .client
            .get(self.endpoint(&format!("generate/status/{}", job_id)))
            .header("Client-Agent", &self.client_agent)
            .send()
            .await
            .map_err(map_http_error)?;

        let status: StatusResponse = Self::ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("status: {}", e)))?;
        Ok(status.generations)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, GenerationError> {
        let response = self.client.get(url).send().await.map_err(map_http_error)?;
        let bytes = Self::ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(map_http_error)?;
        Ok(bytes.to_vec())
    }

    fn service_name(&self) -> &str {
        "aihorde"
    }
}
