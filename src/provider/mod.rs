//! Remote synonym provider abstraction.
//!
//! `SynonymProvider` is an enum over concrete backends (enum dispatch, no
//! trait objects): `PubChem` talks to the live PUG and RDF REST APIs,
//! `Fixture` serves canned data for offline development and tests.
//!
//! The enum methods are also the graceful-degradation boundary: a transport
//! failure, non-success status, or malformed payload is logged and degraded
//! to an empty result at the smallest affected granularity — one synonym or
//! one compound — so a single upstream failure never aborts a whole
//! reconciliation batch.

pub mod fixture;
pub mod pubchem;

use thiserror::Error;
use tracing::warn;

pub use fixture::FixtureProvider;
pub use pubchem::PubChemProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("unexpected payload: {0}")]
    Payload(String),
}

/// One upstream compound record from the name-lookup mode: the numeric
/// compound id and its inline synonym display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundEntry {
    pub cid: u64,
    pub inline_synonym_names: Vec<String>,
}

/// All available provider backends. Cheap to clone.
#[derive(Debug, Clone)]
pub enum SynonymProvider {
    PubChem(PubChemProvider),
    Fixture(FixtureProvider),
}

impl SynonymProvider {
    /// Name-lookup mode: compounds known under `name`, each with its inline
    /// synonym names. Upstream failure degrades to an empty list.
    pub async fn lookup_compounds_by_name(&self, name: &str) -> Vec<CompoundEntry> {
        let result = match self {
            SynonymProvider::PubChem(p) => p.compounds_by_name(name).await,
            SynonymProvider::Fixture(f) => Ok(f.compounds_by_name(name)),
        };
        result.unwrap_or_else(|e| {
            warn!(%name, error = %e, "compound-by-name lookup degraded to empty");
            Vec::new()
        })
    }

    /// ID-lookup mode: upstream-assigned synonym identifiers for a
    /// compound. Upstream failure degrades to an empty list.
    pub async fn lookup_synonym_ids_by_compound(&self, cid: u64) -> Vec<String> {
        let result = match self {
            SynonymProvider::PubChem(p) => p.synonym_ids_by_compound(cid).await,
            SynonymProvider::Fixture(f) => Ok(f.synonym_ids_by_compound(cid)),
        };
        result.unwrap_or_else(|e| {
            warn!(cid, error = %e, "synonym-id lookup degraded to empty");
            Vec::new()
        })
    }

    /// Resolve one upstream synonym id to its display name. `None` both for
    /// a legitimate upstream not-found and for a degraded failure.
    pub async fn lookup_synonym_name_by_id(&self, synonym_id: &str) -> Option<String> {
        let result = match self {
            SynonymProvider::PubChem(p) => p.synonym_name_by_id(synonym_id).await,
            SynonymProvider::Fixture(f) => Ok(f.synonym_name_by_id(synonym_id)),
        };
        result.unwrap_or_else(|e| {
            warn!(synonym_id, error = %e, "synonym-name lookup degraded to empty");
            None
        })
    }
}
