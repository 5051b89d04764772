//! Category tree: each category lists member categories and styles by name.

use crate::error::{CatalogError, SchemaViolation};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    entries: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

impl CategorySet {
    /// Parse the category document, collecting malformed entries as violations.
    pub fn from_document(document: &Value) -> Result<Self, Vec<SchemaViolation>> {
        let mut entries = BTreeMap::new();
        let mut violations = Vec::new();
        let Some(object) = document.as_object() else {
            return Ok(Self { entries });
        };

        for (name, value) in object {
            let members = value.as_array().and_then(|items| {
                items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
            });
            match members {
                Some(members) => {
                    entries.insert(name.clone(), members);
                }
                None => violations.push(SchemaViolation {
                    owner: name.clone(),
                    key: None,
                    reason: "category must be a list of names".to_string(),
                }),
            }
        }

        if violations.is_empty() {
            Ok(Self { entries })
        } else {
            Err(violations)
        }
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, members)| (name.into(), members.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    pub fn is_category(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn members(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject category graphs in which a category (transitively) contains itself.
    ///
    /// The error carries the cycle path, starting and ending at the same category.
    pub fn ensure_acyclic(&self) -> Result<(), CatalogError> {
        let mut state: HashMap<&str, Visit> = HashMap::new();
        for root in self.entries.keys() {
            let mut path = Vec::new();
            if let Some(cycle) = self.visit(root, &mut state, &mut path) {
                return Err(CatalogError::CategoryCycle(cycle));
            }
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        state: &mut HashMap<&'a str, Visit>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        match state.get(name) {
            Some(Visit::Done) => return None,
            Some(Visit::InProgress) => {
                let start = path.iter().position(|n| *n == name).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(name.to_string());
                return Some(cycle);
            }
            None => {}
        }

        state.insert(name, Visit::InProgress);
        path.push(name);
        if let Some(members) = self.entries.get(name) {
            for member in members.iter().filter(|m| self.is_category(m)) {
                if let Some(cycle) = self.visit(member, state, path) {
                    return Some(cycle);
                }
            }
        }
        path.pop();
        state.insert(name, Visit::Done);
        None
    }
}
