//! Error types for the style preview pipeline.

use thiserror::Error;

/// Storage-related errors (artifacts, fingerprints, run snapshot, documents)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Fingerprint store error: {0}")]
    FingerprintStore(String),

    #[error("Corrupt record for {key}: {message}")]
    CorruptRecord { key: String, message: String },

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::FingerprintStore(err.to_string())
    }
}

/// A single offending entry found by the catalog sanity gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Style (or category) the violation belongs to
    pub owner: String,
    /// Offending key, when the violation is about a single key
    pub key: Option<String>,
    pub reason: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{} has parameter {}: {}", self.owner, key, self.reason),
            None => write!(f, "{}: {}", self.owner, self.reason),
        }
    }
}

/// Catalog loading and validation errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to parse {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Catalog sanity check failed with {} violation(s)", .0.len())]
    SchemaViolations(Vec<SchemaViolation>),

    #[error("Category cycle detected: {}", .0.join(" -> "))]
    CategoryCycle(Vec<String>),
}

/// Errors raised while talking to the remote generation service
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Generation service authentication failed: {0}")]
    AuthFailed(String),

    #[error("Generation service rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Generation request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response from generation service: {0}")]
    InvalidResponse(String),

    #[error("Generation job {0} faulted on the remote service")]
    Faulted(String),

    #[error("Generation job {job_id} did not finish after {attempts} polls")]
    Timeout { job_id: String, attempts: u32 },

    #[error("Generation job {0} was cancelled")]
    Cancelled(String),

    #[error("No accepted images for {0}")]
    NoAcceptedResults(String),

    #[error("Failed to persist artifact: {0}")]
    Storage(#[from] StorageError),
}

/// Top-level pipeline errors; only these abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Generation client error: {0}")]
    Client(String),

    #[error("Run cancelled")]
    Cancelled,
}

impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        PipelineError::ConfigError(err.to_string())
    }
}
