//! Graph store abstraction — compounds, synonyms, and the full-text index.
//!
//! `GraphStore` is an enum over concrete backends. Enum dispatch avoids
//! `dyn` trait objects and the `async-trait` dependency; adding a backend is
//! a new module + variant + match arms. `Neo4j` is production, `Memory` is
//! an in-process store for local development and tests.
//!
//! Backends are shared immutable handles — clone them freely.

pub mod memory;
pub mod neo4j;

use serde::Serialize;

use crate::error::AppError;
use crate::synonym::Synonym;

pub use memory::MemoryStore;
pub use neo4j::Neo4jStore;

/// A compound with its attached synonym names, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompoundRecord {
    pub id: String,
    pub synonyms: Vec<String>,
}

/// One full-text index hit: a synonym node, its relevance score, and the
/// compounds it is attributed to. The store returns hits ordered by score
/// descending.
#[derive(Debug, Clone)]
pub struct SynonymHit {
    pub synonym_id: String,
    pub name: String,
    pub compound_ids: Vec<String>,
    pub score: f64,
}

/// Persistent key for a compound, from its upstream numeric id.
pub fn compound_key(cid: u64) -> String {
    format!("compound:cid{cid}")
}

/// All available store backends.
#[derive(Clone)]
pub enum GraphStore {
    Neo4j(Neo4jStore),
    Memory(MemoryStore),
}

impl GraphStore {
    /// Create constraints and the synonym full-text index if absent.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        match self {
            GraphStore::Neo4j(s) => s.ensure_schema().await,
            GraphStore::Memory(_) => Ok(()),
        }
    }

    /// MERGE a compound node keyed by `compound_id`.
    pub async fn upsert_compound(&self, compound_id: &str) -> Result<(), AppError> {
        match self {
            GraphStore::Neo4j(s) => s.upsert_compound(compound_id).await,
            GraphStore::Memory(s) => s.upsert_compound(compound_id),
        }
    }

    /// Delete every attachment from this compound to a synonym whose id is
    /// not in `keep`. Synonym nodes themselves are never deleted.
    pub async fn sever_attachments(&self, compound_id: &str, keep: &[String]) -> Result<(), AppError> {
        match self {
            GraphStore::Neo4j(s) => s.sever_attachments(compound_id, keep).await,
            GraphStore::Memory(s) => s.sever_attachments(compound_id, keep),
        }
    }

    /// MERGE a synonym node, overwrite its name, and ensure the attachment
    /// to `compound_id` exists. Idempotent.
    pub async fn upsert_synonym_and_attach(
        &self,
        compound_id: &str,
        synonym: &Synonym,
    ) -> Result<(), AppError> {
        match self {
            GraphStore::Neo4j(s) => s.upsert_synonym_and_attach(compound_id, synonym).await,
            GraphStore::Memory(s) => s.upsert_synonym_and_attach(compound_id, synonym),
        }
    }

    /// Read a compound and its distinct attached synonym names.
    pub async fn get_compound(&self, compound_id: &str) -> Result<Option<CompoundRecord>, AppError> {
        match self {
            GraphStore::Neo4j(s) => s.get_compound(compound_id).await,
            GraphStore::Memory(s) => s.get_compound(compound_id),
        }
    }

    /// Run a fuzzy expression against the synonym full-text index. Returns
    /// at most `limit` hits ordered by score descending, each joined with
    /// the compounds the synonym is attributed to.
    pub async fn fulltext_query(&self, expr: &str, limit: usize) -> Result<Vec<SynonymHit>, AppError> {
        match self {
            GraphStore::Neo4j(s) => s.fulltext_query(expr, limit).await,
            GraphStore::Memory(s) => s.fulltext_query(expr, limit),
        }
    }
}
