//! Display names for raw producer and account ids.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use concentra_core::error::LoadError;
use concentra_core::traits::AliasResolver;

/// Id to display-name table, stored as a flat JSON object.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct AliasTable {
    names: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path)
            .map_err(|e| LoadError::Io(format!("{}: {e}", path.display())))?;
        let table: Self = serde_json::from_slice(&bytes)
            .map_err(|e| LoadError::Malformed(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), aliases = table.len(), "alias table loaded");
        Ok(table)
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    /// Add every entry of `other`, replacing existing names.
    pub fn merge(&mut self, other: AliasTable) {
        self.names.extend(other.names);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

impl AliasResolver for AliasTable {
    fn resolve(&self, id: &str) -> Option<String> {
        self.names.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_flat_json_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.json");
        std::fs::write(&path, br#"{"Qa1": "Binance", "Qb2": "Pool X"}"#).unwrap();

        let table = AliasTable::read(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("Qa1").as_deref(), Some("Binance"));
        assert_eq!(table.alias_or_id("unknown"), "unknown");
    }

    #[test]
    fn non_object_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.json");
        std::fs::write(&path, b"[1, 2]").unwrap();
        assert!(matches!(AliasTable::read(&path), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn merge_replaces_existing_names() {
        let mut a: AliasTable = [("x".to_string(), "old".to_string())].into_iter().collect();
        let mut b = AliasTable::new();
        b.insert("x", "new");
        b.insert("y", "other");
        a.merge(b);
        assert_eq!(a.resolve("x").as_deref(), Some("new"));
        assert_eq!(a.len(), 2);
    }
}
