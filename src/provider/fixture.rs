//! Fixture provider — canned upstream data, no network.
//!
//! Used for offline development and for exercising the full reconciliation
//! pipeline in tests. Builder methods mirror the three lookup modes.

use std::collections::HashMap;

use super::CompoundEntry;

#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    /// lowercased synonym name -> compound records
    compounds: HashMap<String, Vec<CompoundEntry>>,
    /// compound id -> upstream-assigned synonym ids
    upstream_ids: HashMap<u64, Vec<String>>,
    /// synonym id -> resolvable display name
    names: HashMap<String, String>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compound record under a lookup name.
    pub fn with_compound(mut self, name: &str, cid: u64, inline_names: &[&str]) -> Self {
        self.compounds
            .entry(name.to_lowercase())
            .or_default()
            .push(CompoundEntry {
                cid,
                inline_synonym_names: inline_names.iter().map(|s| s.to_string()).collect(),
            });
        self
    }

    /// Register the RDF synonym ids for a compound.
    pub fn with_upstream_ids(mut self, cid: u64, ids: &[&str]) -> Self {
        self.upstream_ids
            .entry(cid)
            .or_default()
            .extend(ids.iter().map(|s| s.to_string()));
        self
    }

    /// Make a synonym id resolvable to a display name. Ids without an entry
    /// behave like an upstream not-found.
    pub fn with_synonym_name(mut self, id: &str, name: &str) -> Self {
        self.names.insert(id.to_string(), name.to_string());
        self
    }

    pub fn compounds_by_name(&self, name: &str) -> Vec<CompoundEntry> {
        self.compounds.get(&name.to_lowercase()).cloned().unwrap_or_default()
    }

    pub fn synonym_ids_by_compound(&self, cid: u64) -> Vec<String> {
        self.upstream_ids.get(&cid).cloned().unwrap_or_default()
    }

    pub fn synonym_name_by_id(&self, synonym_id: &str) -> Option<String> {
        self.names.get(synonym_id).map(|n| n.to_lowercase())
    }
}
