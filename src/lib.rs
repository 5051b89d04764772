//! stylepreview: Incremental Style Preview Gallery
//!
//! Renders every style of a remote image-generation style catalog against three fixed
//! sample prompts, regenerates only the styles whose definition changed since the last
//! run, and publishes a Markdown gallery, a JSON manifest and per-category pages.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod publish;
pub mod request;
pub mod store;
pub mod types;
