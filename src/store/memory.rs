use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;

use super::{Record, SecretStore, SEPARATOR};

/// An in-memory secret tree keyed by full path.
///
/// Listings are derived from the stored paths, so inserting `a/c/d` makes
/// `a/` list `c/` and `a/c/` list `d`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record at `path`, replacing any previous one.
    pub fn insert(&mut self, path: impl Into<String>, record: Record) -> &mut Self {
        self.records.insert(path.into(), record);
        self
    }

    /// Store a record made of string fields.
    pub fn insert_fields(&mut self, path: impl Into<String>, fields: &[(&str, &str)]) -> &mut Self {
        let record = fields
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        self.insert(path, record)
    }
}

impl SecretStore for MemoryStore {
    fn read(&self, path: &str) -> Result<Option<Record>> {
        Ok(self.records.get(path).cloned())
    }

    fn list(&self, prefix: &str) -> Result<Option<Vec<String>>> {
        let mut children = BTreeSet::new();
        for path in self.records.keys() {
            let Some(rest) = path.strip_prefix(prefix) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            match rest.find(SEPARATOR) {
                Some(idx) => children.insert(rest[..=idx].to_string()),
                None => children.insert(rest.to_string()),
            };
        }

        if children.is_empty() {
            return Ok(None);
        }
        Ok(Some(children.into_iter().collect()))
    }
}
