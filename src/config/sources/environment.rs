//! Environment source: STYLEPREVIEW__SECTION__KEY, e.g. STYLEPREVIEW__HORDE__API_KEY.
//!
//! Values stay strings. Numeric and boolean fields are converted when `PreviewConfig`
//! is deserialized, so keys such as `0000000000` reach the service unchanged.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

pub const ENV_PREFIX: &str = "STYLEPREVIEW";

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
}
