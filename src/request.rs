//! Request Builder
//!
//! Maps a (style, sample prompt) pair onto a generation request for the remote
//! service. The base template is cloned for every request and never modified.

use crate::catalog::{ModelCatalog, Style, StyleParam};
use crate::error::GenerationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Placeholder for the positive prompt in a style template.
pub const POSITIVE_TOKEN: &str = "{p}";
/// Placeholder for the negative prompt in a style template.
pub const NEGATIVE_TOKEN: &str = "{np}";

/// Model families that cannot run with hires fix, matched by substring of the baseline.
pub const NO_HIRES_BASELINES: [&str; 2] = ["stable_diffusion_xl", "stable_cascade"];

/// Async generation request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub params: RequestParams,
    pub nsfw: bool,
    pub censor_nsfw: bool,
    pub trusted_workers: bool,
    pub slow_workers: bool,
    pub replacement_filter: bool,
    pub shared: bool,
    pub r2: bool,
    /// Empty means any model
    pub models: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestParams {
    pub sampler_name: String,
    pub cfg_scale: Number,
    pub width: u64,
    pub height: u64,
    pub steps: u64,
    pub karras: bool,
    pub hires_fix: bool,
    pub clip_skip: u64,
    pub n: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loras: Option<Vec<Map<String, Value>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tis: Option<Vec<Map<String, Value>>>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            params: RequestParams {
                sampler_name: "k_euler_a".to_string(),
                cfg_scale: default_cfg_scale(),
                width: 512,
                height: 512,
                steps: 30,
                karras: true,
                hires_fix: false,
                clip_skip: 1,
                n: 1,
                enhance: None,
                loras: None,
                tis: None,
            },
            nsfw: false,
            censor_nsfw: true,
            trusted_workers: false,
            slow_workers: true,
            replacement_filter: true,
            shared: false,
            r2: true,
            models: Vec::new(),
        }
    }
}

fn default_cfg_scale() -> Number {
    Number::from_f64(7.5).unwrap_or_else(|| Number::from(7))
}

impl RequestParams {
    fn apply(&mut self, param: &StyleParam) {
        match param {
            StyleParam::Steps(v) => self.steps = *v,
            StyleParam::Width(v) => self.width = *v,
            StyleParam::Height(v) => self.height = *v,
            StyleParam::CfgScale(v) => self.cfg_scale = v.clone(),
            StyleParam::ClipSkip(v) => self.clip_skip = *v,
            StyleParam::Enhance(v) => self.enhance = Some(*v),
            StyleParam::HiresFix(v) => self.hires_fix = *v,
            StyleParam::Karras(v) => self.karras = *v,
            StyleParam::SamplerName(v) => self.sampler_name = v.clone(),
            StyleParam::Loras(v) => self.loras = Some(v.clone()),
            StyleParam::Tis(v) => self.tis = Some(v.clone()),
        }
    }
}

/// Builds requests against a fixed base template and model catalog.
pub struct RequestBuilder<'a> {
    base: GenerationRequest,
    models: &'a ModelCatalog,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(models: &'a ModelCatalog) -> Self {
        Self::with_base(models, GenerationRequest::default())
    }

    pub fn with_base(models: &'a ModelCatalog, base: GenerationRequest) -> Self {
        Self { base, models }
    }

    pub fn base(&self) -> &GenerationRequest {
        &self.base
    }

    /// Build the request for one sample of a style.
    ///
    /// Fails with `UnknownModel` when the style names a model missing from the
    /// catalog; nothing should be submitted in that case.
    pub fn build(&self, style: &Style, sample_text: &str) -> Result<GenerationRequest, GenerationError> {
        let mut request = self.base.clone();

        let baseline = match &style.model {
            Some(model) => {
                let entry = self
                    .models
                    .get(model)
                    .ok_or_else(|| GenerationError::UnknownModel(model.clone()))?;
                request.models = vec![model.clone()];
                entry.baseline.as_deref()
            }
            None => None,
        };

        for param in &style.params {
            request.params.apply(param);
        }

        if baseline.is_some_and(disables_hires_fix) {
            request.params.hires_fix = false;
        }

        request.prompt = match &style.prompt {
            Some(template) => render_prompt(template, sample_text),
            None => sample_text.to_string(),
        };

        Ok(request)
    }
}

/// Whether a model baseline belongs to a family that must run without hires fix.
pub fn disables_hires_fix(baseline: &str) -> bool {
    NO_HIRES_BASELINES
        .iter()
        .any(|family| baseline.contains(family))
}

/// Substitute the sample text for `{p}` and drop `{np}`.
pub fn render_prompt(template: &str, sample_text: &str) -> String {
    template
        .replace(POSITIVE_TOKEN, sample_text)
        .replace(NEGATIVE_TOKEN, "")
}
