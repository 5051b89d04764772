//! Configuration System
//!
//! Layered configuration: built-in defaults, the global config file, the workspace
//! config file, then `STYLEPREVIEW__SECTION__KEY` environment variables. The CLI
//! applies its own flags on top of the loaded value.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

pub const DEFAULT_MODELS_URL: &str =
    "https://raw.githubusercontent.com/Haidra-Org/AI-Horde-image-model-reference/main/stable_diffusion.json";
pub const DEFAULT_STYLES_URL: &str =
    "https://raw.githubusercontent.com/Haidra-Org/AI-Horde-Styles/main/styles.json";
pub const DEFAULT_CATEGORIES_URL: &str =
    "https://raw.githubusercontent.com/Haidra-Org/AI-Horde-Styles/main/categories.json";
pub const DEFAULT_HORDE_URL: &str = "https://aihorde.net/api";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Generation service connection
    #[serde(default)]
    pub horde: HordeConfig,

    /// Upstream catalog document locations
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Published output tree
    #[serde(default)]
    pub output: OutputConfig,

    /// Scheduling and polling behaviour
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HordeConfig {
    /// API key; required for `run`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sent as the `Client-Agent` header
    #[serde(default = "default_client_agent")]
    pub client_agent: String,

    #[serde(default = "default_horde_url")]
    pub base_url: String,

    /// Per-HTTP-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_client_agent() -> String {
    format!("stylepreview:{}:unknown", env!("CARGO_PKG_VERSION"))
}

fn default_horde_url() -> String {
    DEFAULT_HORDE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for HordeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            client_agent: default_client_agent(),
            base_url: default_horde_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_models_url")]
    pub models_url: String,
    #[serde(default = "default_styles_url")]
    pub styles_url: String,
    #[serde(default = "default_categories_url")]
    pub categories_url: String,
}

fn default_models_url() -> String {
    DEFAULT_MODELS_URL.to_string()
}

fn default_styles_url() -> String {
    DEFAULT_STYLES_URL.to_string()
}

fn default_categories_url() -> String {
    DEFAULT_CATEGORIES_URL.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            models_url: default_models_url(),
            styles_url: default_styles_url(),
            categories_url: default_categories_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output tree root, relative to the workspace unless absolute
    #[serde(default = "default_output_root")]
    pub root: PathBuf,

    /// Public prefix for manifest URLs, without trailing slash
    #[serde(default = "default_cdn_url_prefix")]
    pub cdn_url_prefix: String,
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_cdn_url_prefix() -> String {
    "https://raw.githubusercontent.com/Haidra-Org/AI-Horde-Styles-Previews/main/images".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            cdn_url_prefix: default_cdn_url_prefix(),
        }
    }
}

impl OutputConfig {
    /// Resolve the output root against the workspace root.
    pub fn resolve_root(&self, workspace_root: &Path) -> PathBuf {
        if self.root.is_absolute() {
            self.root.clone()
        } else {
            workspace_root.join(&self.root)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Delay between sample starts within one style
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Poll budget per job before giving up with a timeout
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Styles that are never generated. Accepts a list or a comma-separated string.
    #[serde(
        default = "default_skip_styles",
        deserialize_with = "deserialize_style_list"
    )]
    pub skip_styles: Vec<String>,
}

fn default_stagger_ms() -> u64 {
    2_000
}

fn default_poll_interval_ms() -> u64 {
    15_000
}

fn default_max_poll_attempts() -> u32 {
    240
}

fn default_skip_styles() -> Vec<String> {
    vec!["stonehenge sunrise".to_string()]
}

/// Environment values arrive as plain strings, so a list may be spelled `a,b`.
fn deserialize_style_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StyleList {
        Joined(String),
        Items(Vec<String>),
    }

    Ok(match StyleList::deserialize(deserializer)? {
        StyleList::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        StyleList::Items(items) => items,
    })
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            stagger_ms: default_stagger_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            skip_styles: default_skip_styles(),
        }
    }
}

impl GenerationConfig {
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Horde(String),
    Catalog(String),
    Output(String),
    Generation(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Horde(msg) => write!(f, "horde: {}", msg),
            ValidationError::Catalog(msg) => write!(f, "catalog: {}", msg),
            ValidationError::Output(msg) => write!(f, "output: {}", msg),
            ValidationError::Generation(msg) => write!(f, "generation: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl PreviewConfig {
    /// Validate the entire configuration, collecting every problem.
    ///
    /// The API key is not checked here; only `run` needs it, see [`PreviewConfig::api_key`].
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !is_http_url(&self.horde.base_url) {
            errors.push(ValidationError::Horde(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.horde.base_url
            )));
        }
        if self.horde.client_agent.trim().is_empty() {
            errors.push(ValidationError::Horde(
                "client_agent cannot be empty".to_string(),
            ));
        }

        for (field, value) in [
            ("models_url", &self.catalog.models_url),
            ("styles_url", &self.catalog.styles_url),
            ("categories_url", &self.catalog.categories_url),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::Catalog(format!("{} cannot be empty", field)));
            }
        }

        if self.output.root.as_os_str().is_empty() {
            errors.push(ValidationError::Output("root cannot be empty".to_string()));
        }
        if self.output.cdn_url_prefix.trim().is_empty() {
            errors.push(ValidationError::Output(
                "cdn_url_prefix cannot be empty".to_string(),
            ));
        }

        if self.generation.poll_interval_ms == 0 {
            errors.push(ValidationError::Generation(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.generation.max_poll_attempts == 0 {
            errors.push(ValidationError::Generation(
                "max_poll_attempts must be greater than zero".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The configured API key, if present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.horde
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
