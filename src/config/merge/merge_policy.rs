//! Merge rules: defaults, override order, conflict handling.

use crate::config::{
    DEFAULT_CATEGORIES_URL, DEFAULT_HORDE_URL, DEFAULT_MODELS_URL, DEFAULT_STYLES_URL,
};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override these key by key; tables are merged, lists are replaced.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("horde.base_url", DEFAULT_HORDE_URL)?
        .set_default("catalog.models_url", DEFAULT_MODELS_URL)?
        .set_default("catalog.styles_url", DEFAULT_STYLES_URL)?
        .set_default("catalog.categories_url", DEFAULT_CATEGORIES_URL)?
        .set_default("output.root", ".")
}
