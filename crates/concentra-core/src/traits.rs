//! Trait interfaces between the engine and its collaborators.
//!
//! - [`Loader`]: populates a record store for one network (concentra-ingest implements)
//! - [`AliasResolver`]: display names for raw ids, consulted only when rendering

use std::collections::{BTreeMap, HashMap};

use crate::config::StatsConfig;
use crate::error::LoadError;
use crate::types::LoadedRecords;

/// Source of normalized records for one network.
///
/// A loader is called exactly once per session. It should return blocks in
/// non-decreasing timestamp order; the record store sorts once otherwise.
/// Retries and timeouts, if any, belong inside the implementation.
pub trait Loader {
    /// Short description of the source, used in logs and report headers.
    fn source(&self) -> String;

    /// Fetch all records relevant to `config`'s time range.
    fn load(&mut self, config: &StatsConfig) -> Result<LoadedRecords, LoadError>;
}

/// Maps raw actor ids to human-readable names.
pub trait AliasResolver {
    /// Display name for `id`, if one is known.
    fn resolve(&self, id: &str) -> Option<String>;

    /// Display name for `id`, falling back to the id itself.
    ///
    /// Default implementation delegates to [`resolve`](Self::resolve).
    fn alias_or_id(&self, id: &str) -> String {
        self.resolve(id).unwrap_or_else(|| id.to_string())
    }
}

/// Resolver that knows no aliases.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAliases;

impl AliasResolver for NoAliases {
    fn resolve(&self, _id: &str) -> Option<String> {
        None
    }
}

impl AliasResolver for HashMap<String, String> {
    fn resolve(&self, id: &str) -> Option<String> {
        self.get(id).cloned()
    }
}

impl AliasResolver for BTreeMap<String, String> {
    fn resolve(&self, id: &str) -> Option<String> {
        self.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_aliases_falls_back_to_id() {
        assert_eq!(NoAliases.alias_or_id("abc"), "abc");
    }

    #[test]
    fn map_resolver_returns_known_alias() {
        let mut map = HashMap::new();
        map.insert("1A1zP1".to_string(), "Genesis".to_string());
        assert_eq!(map.resolve("1A1zP1").as_deref(), Some("Genesis"));
        assert_eq!(map.alias_or_id("other"), "other");
    }

    #[test]
    fn resolver_is_object_safe() {
        let r: &dyn AliasResolver = &NoAliases;
        assert!(r.resolve("x").is_none());
    }
}
