//! Property-based tests for fingerprint and key stability

use proptest::prelude::*;
use serde_json::{Map, Value};
use stylepreview::fingerprint::compute_style_fingerprint;
use stylepreview::types::{artifact_key, safe_name, Sample};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<u32>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::String),
    ]
}

fn style_entries() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::btree_map("[a-z_]{1,10}", scalar(), 1..8)
        .prop_map(|map| map.into_iter().collect())
}

fn to_map(entries: &[(String, Value)]) -> Map<String, Value> {
    entries.iter().cloned().collect()
}

proptest! {
    #[test]
    fn fingerprint_ignores_key_order(entries in style_entries()) {
        let forward = to_map(&entries);
        let mut reversed_entries = entries.clone();
        reversed_entries.reverse();
        let reversed = to_map(&reversed_entries);
        prop_assert_eq!(
            compute_style_fingerprint(&forward),
            compute_style_fingerprint(&reversed)
        );
    }

    #[test]
    fn fingerprint_changes_with_any_value(entries in style_entries(), index in any::<prop::sample::Index>()) {
        let original = to_map(&entries);
        let (key, _) = &entries[index.index(entries.len())];
        let mut changed = original.clone();
        let replacement = match &original[key] {
            Value::String(s) => Value::String(format!("{}!", s)),
            Value::Bool(b) => Value::Bool(!b),
            other => Value::String(other.to_string()),
        };
        changed.insert(key.clone(), replacement);
        prop_assert_ne!(
            compute_style_fingerprint(&original),
            compute_style_fingerprint(&changed)
        );
    }

    #[test]
    fn safe_name_is_key_safe(name in ".{0,40}") {
        let safe = safe_name(&name);
        prop_assert!(safe.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        prop_assert_eq!(safe.chars().count(), name.chars().count());
        prop_assert_eq!(safe_name(&safe), safe.clone());
        for sample in Sample::ALL {
            prop_assert!(artifact_key(&name, sample).starts_with(&safe));
        }
    }
}
