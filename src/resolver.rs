//! Expansion of key patterns into concrete tokens.
//!
//! A pattern is either an exact key (`secret/totp/github`) or a prefix ending
//! in the wildcard marker (`secret/totp/*`), which selects every leaf below
//! the prefix at any depth.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::error::{Result, TotpError};
use crate::store::{SecretStore, SEPARATOR};
use crate::token::Token;

/// Trailing marker selecting all keys below a prefix.
pub const WILDCARD: char = '*';

/// Record attribute that overrides the path-derived display name.
pub const NAME_FIELD: &str = "name";

/// Default record field holding the TOTP secret.
pub const DEFAULT_FIELD: &str = "secret";

pub struct KeyResolver<S> {
    store: S,
    field: String,
}

impl<S: SecretStore> KeyResolver<S> {
    pub fn new(store: S, field: impl Into<String>) -> Self {
        Self {
            store,
            field: field.into(),
        }
    }

    /// Resolve `pattern` to an unsorted list of tokens.
    ///
    /// Any missing key, missing field or empty top-level listing fails the
    /// whole resolution.
    pub fn resolve(&self, pattern: &str) -> Result<Vec<Token>> {
        let keys = if pattern.ends_with(WILDCARD) {
            self.expand(pattern.trim_end_matches(WILDCARD))?
        } else {
            vec![pattern.to_string()]
        };

        let tokens = keys
            .iter()
            .map(|key| self.read_token(key))
            .collect::<Result<Vec<_>>>()?;

        info!(pattern, count = tokens.len(), "resolved tokens");
        Ok(tokens)
    }

    /// Walk the tree below `seed` breadth-first and collect leaf paths.
    fn expand(&self, seed: &str) -> Result<Vec<String>> {
        let mut queue = VecDeque::from([seed.to_string()]);
        let mut leaves = Vec::new();

        while let Some(prefix) = queue.pop_front() {
            debug!(prefix = %prefix, "listing keys");
            let children = match self.store.list(&prefix)? {
                Some(children) => children,
                None if prefix == seed => return Err(TotpError::NoSuchKey(prefix)),
                None => continue,
            };

            for child in children {
                let path = format!("{}{}", prefix, child);
                if child.ends_with(SEPARATOR) {
                    queue.push_back(path);
                } else {
                    leaves.push(path);
                }
            }
        }

        Ok(leaves)
    }

    fn read_token(&self, key: &str) -> Result<Token> {
        debug!(key, "reading key");
        let record = self
            .store
            .read(key)?
            .ok_or_else(|| TotpError::KeyNotFound(key.to_string()))?;

        let secret = match record.get(&self.field) {
            None | Some(serde_json::Value::Null) => {
                return Err(TotpError::FieldNotFound {
                    key: key.to_string(),
                    field: self.field.clone(),
                })
            }
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(TotpError::FieldNotString {
                    key: key.to_string(),
                    field: self.field.clone(),
                })
            }
        };

        let name = match record.get(NAME_FIELD) {
            Some(serde_json::Value::String(n)) => n.clone(),
            None | Some(serde_json::Value::Null) => key.to_string(),
            Some(other) => {
                warn!(key, value = %other, "ignoring non-string name attribute");
                key.to_string()
            }
        };

        Ok(Token::new(name, secret))
    }
}
