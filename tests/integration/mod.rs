//! Integration tests for the style preview pipeline

mod catalog_gate;
mod config_integration;
mod pipeline_runs;
mod store_integration;
