//! Catalog document sources.
//!
//! `http(s)://` URLs are fetched with reqwest; `file://` URLs and bare paths are read
//! from disk so runs can be pointed at local fixtures or mirrors.

use crate::error::CatalogError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// Anything that can produce a catalog document for a URL.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value, CatalogError>;
}

const CATALOG_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

pub struct UrlCatalogSource {
    client: Client,
}

impl UrlCatalogSource {
    pub fn new() -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(CATALOG_HTTP_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::Fetch {
                url: String::new(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    async fn fetch_http(&self, url: &str) -> Result<Value, CatalogError> {
        let fetch_error = |message: String| CatalogError::Fetch {
            url: url.to_string(),
            message,
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fetch_error(format!("status {}", response.status())));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| CatalogError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn fetch_file(&self, url: &str) -> Result<Value, CatalogError> {
        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        let body = tokio::fs::read(&path)
            .await
            .map_err(|e| CatalogError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        serde_json::from_slice(&body).map_err(|e| CatalogError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogSource for UrlCatalogSource {
    async fn fetch_json(&self, url: &str) -> Result<Value, CatalogError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.fetch_http(url).await
        } else {
            self.fetch_file(url).await
        }
    }
}
