//! Style presets and the allow-listed generation parameters they may override.

use crate::error::SchemaViolation;
use serde_json::{Map, Number, Value};

/// Parameter keys a style may set, in the order they are overlaid onto a request.
pub const ALLOWED_PARAMS: [ParamKind; 11] = [
    ParamKind::Steps,
    ParamKind::Width,
    ParamKind::Height,
    ParamKind::CfgScale,
    ParamKind::ClipSkip,
    ParamKind::Enhance,
    ParamKind::HiresFix,
    ParamKind::Karras,
    ParamKind::SamplerName,
    ParamKind::Loras,
    ParamKind::Tis,
];

/// Style keys that are not generation parameters.
pub const MODEL_KEY: &str = "model";
pub const PROMPT_KEY: &str = "prompt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Steps,
    Width,
    Height,
    CfgScale,
    ClipSkip,
    Enhance,
    HiresFix,
    Karras,
    SamplerName,
    Loras,
    Tis,
}

impl ParamKind {
    pub fn from_key(key: &str) -> Option<Self> {
        ALLOWED_PARAMS.iter().copied().find(|kind| kind.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            ParamKind::Steps => "steps",
            ParamKind::Width => "width",
            ParamKind::Height => "height",
            ParamKind::CfgScale => "cfg_scale",
            ParamKind::ClipSkip => "clip_skip",
            ParamKind::Enhance => "enhance",
            ParamKind::HiresFix => "hires_fix",
            ParamKind::Karras => "karras",
            ParamKind::SamplerName => "sampler_name",
            ParamKind::Loras => "loras",
            ParamKind::Tis => "tis",
        }
    }

    /// Parse a raw JSON value into a typed parameter.
    pub fn parse(self, value: &Value) -> Result<StyleParam, String> {
        let param = match self {
            ParamKind::Steps => StyleParam::Steps(as_uint(value)?),
            ParamKind::Width => StyleParam::Width(as_uint(value)?),
            ParamKind::Height => StyleParam::Height(as_uint(value)?),
            ParamKind::ClipSkip => StyleParam::ClipSkip(as_uint(value)?),
            ParamKind::CfgScale => match value {
                Value::Number(number) => StyleParam::CfgScale(number.clone()),
                other => return Err(format!("expected a number, got {}", other)),
            },
            ParamKind::Enhance => StyleParam::Enhance(as_bool(value)?),
            ParamKind::HiresFix => StyleParam::HiresFix(as_bool(value)?),
            ParamKind::Karras => StyleParam::Karras(as_bool(value)?),
            ParamKind::SamplerName => StyleParam::SamplerName(
                value
                    .as_str()
                    .ok_or_else(|| format!("expected a string, got {}", value))?
                    .to_string(),
            ),
            ParamKind::Loras => StyleParam::Loras(as_object_list(value)?),
            ParamKind::Tis => StyleParam::Tis(as_object_list(value)?),
        };
        Ok(param)
    }
}

fn as_uint(value: &Value) -> Result<u64, String> {
    value
        .as_u64()
        .ok_or_else(|| format!("expected a non-negative integer, got {}", value))
}

fn as_bool(value: &Value) -> Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| format!("expected a boolean, got {}", value))
}

fn as_object_list(value: &Value) -> Result<Vec<Map<String, Value>>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected a list, got {}", value))?;
    items
        .iter()
        .map(|item| {
            item.as_object()
                .cloned()
                .ok_or_else(|| format!("expected list entries to be objects, got {}", item))
        })
        .collect()
}

/// A typed generation parameter override.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleParam {
    Steps(u64),
    Width(u64),
    Height(u64),
    /// Kept in its source form so `7` is forwarded as `7`, not `7.0`
    CfgScale(Number),
    ClipSkip(u64),
    Enhance(bool),
    HiresFix(bool),
    Karras(bool),
    SamplerName(String),
    Loras(Vec<Map<String, Value>>),
    Tis(Vec<Map<String, Value>>),
}

impl StyleParam {
    pub fn kind(&self) -> ParamKind {
        match self {
            StyleParam::Steps(_) => ParamKind::Steps,
            StyleParam::Width(_) => ParamKind::Width,
            StyleParam::Height(_) => ParamKind::Height,
            StyleParam::CfgScale(_) => ParamKind::CfgScale,
            StyleParam::ClipSkip(_) => ParamKind::ClipSkip,
            StyleParam::Enhance(_) => ParamKind::Enhance,
            StyleParam::HiresFix(_) => ParamKind::HiresFix,
            StyleParam::Karras(_) => ParamKind::Karras,
            StyleParam::SamplerName(_) => ParamKind::SamplerName,
            StyleParam::Loras(_) => ParamKind::Loras,
            StyleParam::Tis(_) => ParamKind::Tis,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            StyleParam::Steps(v)
            | StyleParam::Width(v)
            | StyleParam::Height(v)
            | StyleParam::ClipSkip(v) => Value::from(*v),
            StyleParam::CfgScale(v) => Value::Number(v.clone()),
            StyleParam::Enhance(v) | StyleParam::HiresFix(v) | StyleParam::Karras(v) => {
                Value::Bool(*v)
            }
            StyleParam::SamplerName(v) => Value::String(v.clone()),
            StyleParam::Loras(items) | StyleParam::Tis(items) => {
                Value::Array(items.iter().cloned().map(Value::Object).collect())
            }
        }
    }
}

/// A named generation preset.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub name: String,
    pub model: Option<String>,
    /// Template with `{p}` and `{np}` placeholders
    pub prompt: Option<String>,
    /// Overrides in allow-list order
    pub params: Vec<StyleParam>,
    /// The style object exactly as published upstream
    pub raw: Map<String, Value>,
}

impl Style {
    /// Parse one style entry, collecting every schema violation it contains.
    pub fn parse(name: &str, value: &Value) -> Result<Style, Vec<SchemaViolation>> {
        let Some(raw) = value.as_object() else {
            return Err(vec![SchemaViolation {
                owner: name.to_string(),
                key: None,
                reason: format!("style must be an object, got {}", value),
            }]);
        };

        let mut violations = Vec::new();
        let mut model = None;
        let mut prompt = None;
        let mut params = Vec::new();

        for (key, value) in raw {
            let result = match key.as_str() {
                MODEL_KEY => as_string(value).map(|s| model = Some(s)),
                PROMPT_KEY => as_string(value).map(|s| prompt = Some(s)),
                other => match ParamKind::from_key(other) {
                    Some(kind) => kind.parse(value).map(|param| params.push(param)),
                    None => Err("not an allowed generation parameter".to_string()),
                },
            };
            if let Err(reason) = result {
                violations.push(SchemaViolation {
                    owner: name.to_string(),
                    key: Some(key.clone()),
                    reason,
                });
            }
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        params.sort_by_key(|param| {
            ALLOWED_PARAMS
                .iter()
                .position(|kind| *kind == param.kind())
                .unwrap_or(usize::MAX)
        });

        Ok(Style {
            name: name.to_string(),
            model,
            prompt,
            params,
            raw: raw.clone(),
        })
    }

    pub fn param(&self, kind: ParamKind) -> Option<&StyleParam> {
        self.params.iter().find(|param| param.kind() == kind)
    }
}

fn as_string(value: &Value) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("expected a string, got {}", value))
}
