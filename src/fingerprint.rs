//! Style fingerprints using BLAKE3.
//!
//! Fingerprint = hash("style" || canonical_json(style object)).
//!
//! Canonical JSON sorts object keys recursively and emits no whitespace, so the
//! fingerprint depends only on the style's content, never on the order in which the
//! upstream document listed its keys.

use crate::types::Fingerprint;
use blake3::Hasher;
use serde_json::{Map, Value};

/// Compute the fingerprint of a raw style object.
pub fn compute_style_fingerprint(style: &Map<String, Value>) -> Fingerprint {
    let mut canonical = String::new();
    write_object(style, &mut canonical);

    let mut hasher = Hasher::new();
    // Type discriminator
    hasher.update(b"style");
    hasher.update(&(canonical.len() as u64).to_be_bytes());
    hasher.update(canonical.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Hex form used in persisted records and logs.
pub fn to_hex(fingerprint: &Fingerprint) -> String {
    hex::encode(fingerprint)
}

pub fn from_hex(value: &str) -> Option<Fingerprint> {
    let bytes = hex::decode(value).ok()?;
    bytes.try_into().ok()
}

/// Canonical JSON encoding of any value.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_object(map, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        // Scalars already have a single serde_json encoding.
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_object(map: &Map<String, Value>, out: &mut String) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    out.push('{');
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_value(&map[key], out);
    }
    out.push('}');
}
