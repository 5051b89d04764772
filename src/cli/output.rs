//! CLI output: error mapping from pipeline errors to stable CLI surface.

use crate::error::{CatalogError, PipelineError};

/// Map pipeline errors to a string for CLI output.
/// Schema violations are listed one per line so every offending entry is visible.
pub fn map_error(e: &PipelineError) -> String {
    match e {
        PipelineError::Catalog(CatalogError::SchemaViolations(violations)) => {
            let mut s = e.to_string();
            for violation in violations {
                s.push_str(&format!("\n  - {}", violation));
            }
            s
        }
        other => other.to_string(),
    }
}
