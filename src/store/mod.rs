pub mod memory;
pub mod vault;

use std::collections::HashMap;

use crate::error::Result;

pub use memory::MemoryStore;
pub use vault::VaultCli;

/// Fields of a single secret record.
pub type Record = HashMap<String, serde_json::Value>;

/// Suffix marking a listed child as a folder rather than a leaf.
pub const SEPARATOR: char = '/';

/// A hierarchical key/value secret store.
///
/// Each backend talks to its store and hands back plain records and child
/// listings; path semantics and wildcard expansion live in the resolver.
pub trait SecretStore {
    /// Read the record at `path`. `Ok(None)` means nothing is stored there.
    fn read(&self, path: &str) -> Result<Option<Record>>;

    /// List the immediate children of `prefix`. Folder children end in `/`.
    /// `Ok(None)` means there is nothing under the prefix.
    fn list(&self, prefix: &str) -> Result<Option<Vec<String>>>;
}

impl<S: SecretStore + ?Sized> SecretStore for &S {
    fn read(&self, path: &str) -> Result<Option<Record>> {
        (**self).read(path)
    }

    fn list(&self, prefix: &str) -> Result<Option<Vec<String>>> {
        (**self).list(prefix)
    }
}
