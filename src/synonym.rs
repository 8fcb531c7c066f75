//! Synonym identity and the two-source merge.
//!
//! PubChem's RDF API keys synonyms as `MD5_<hex>` where the digest is taken
//! over the lowercased display name. Deriving the same digest locally for
//! names that arrive without an upstream id means both sources collapse onto
//! one identifier space: the same chemical name always maps to the same node
//! no matter which API produced it.

use std::collections::HashSet;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// A synonym record as persisted: content-hash or upstream-assigned id plus
/// the lowercased display name. `name` is empty when the per-id RDF name
/// lookup came back not-found — the entry is kept anyway so the
/// upstream-curated id survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub id: String,
    pub name: String,
}

/// Content-derived identifier for a synonym name.
///
/// Pure function of `name.to_lowercase()` — no I/O, no state. Collisions are
/// ordinary hash collisions and not handled.
pub fn identity(name: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(name.to_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}

/// Where a synonym record came from, before its identifier is settled.
///
/// `resolve()` always prefers an upstream-assigned id; only `Derived`
/// entries get a locally computed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynonymOrigin {
    /// RDF lookup mode — id assigned by PubChem, name already resolved
    /// (possibly to empty).
    Upstream { id: String, name: String },
    /// PUG lookup mode — only a display name; id is derived from it.
    Derived { name: String },
}

impl SynonymOrigin {
    /// Settle this record into its canonical `Synonym`.
    pub fn resolve(self) -> Synonym {
        match self {
            SynonymOrigin::Upstream { id, name } => Synonym { id, name: name.to_lowercase() },
            SynonymOrigin::Derived { name } => {
                let name = name.to_lowercase();
                let id = identity(&name);
                Synonym { id, name }
            }
        }
    }
}

/// Merge upstream (RDF) and derived (PUG) synonym sets into one
/// deduplicated list.
///
/// Iteration order is upstream first, then derived; an id that already
/// appeared is skipped. On conflict the upstream entry therefore wins and
/// the derived name for the same id is silently discarded.
pub fn merge_sources(upstream: Vec<Synonym>, derived: Vec<Synonym>) -> Vec<Synonym> {
    let mut seen: HashSet<String> = HashSet::with_capacity(upstream.len() + derived.len());
    let mut merged = Vec::with_capacity(upstream.len() + derived.len());
    for synonym in upstream.into_iter().chain(derived) {
        if seen.insert(synonym.id.clone()) {
            merged.push(synonym);
        }
    }
    merged
}
