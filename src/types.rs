//! Shared types: samples, storage naming, fingerprints.

use serde::{Deserialize, Serialize};

/// BLAKE3 digest of a style definition, hex encoded when persisted.
pub type Fingerprint = [u8; 32];

/// File extension used for every artifact.
pub const IMAGE_EXTENSION: &str = "webp";

/// One of the fixed demonstration prompts rendered for every style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sample {
    Person,
    Place,
    Thing,
}

impl Sample {
    /// All samples in column order.
    pub const ALL: [Sample; 3] = [Sample::Person, Sample::Place, Sample::Thing];

    pub fn as_str(self) -> &'static str {
        match self {
            Sample::Person => "person",
            Sample::Place => "place",
            Sample::Thing => "thing",
        }
    }

    /// Prompt text substituted into the style template.
    pub fn prompt(self) -> &'static str {
        match self {
            Sample::Person => "a man drinking coffee at a kitchen table in the morning",
            Sample::Place => "a street level view of New York City at night",
            Sample::Thing => "a red car parked on the side of the road",
        }
    }
}

impl std::fmt::Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sanitize a name for use as a file name or store key.
///
/// Every character that is not an ASCII letter or digit becomes `_`, then the
/// result is lowercased. Every storage and document key goes through here so
/// artifacts from earlier runs keep matching.
pub fn safe_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Storage key of the artifact for one (style, sample) pair.
pub fn artifact_key(style_name: &str, sample: Sample) -> String {
    format!(
        "{}_{}.{}",
        safe_name(style_name),
        sample.as_str(),
        IMAGE_EXTENSION
    )
}
