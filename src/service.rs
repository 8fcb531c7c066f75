//! Service boundary — the operations the HTTP layer exposes, free of any
//! transport detail so tests can drive them directly.

use tracing::debug;

use crate::error::AppError;
use crate::provider::SynonymProvider;
use crate::reconcile::{CompoundSynonyms, Reconciler};
use crate::search::{collapse_hits, fuzzy_expression, tokenize, SearchRow, RAW_HIT_LIMIT};
use crate::store::{compound_key, CompoundRecord, GraphStore};

/// Shared application state injected into every request handler.
/// Cheap to clone — store, provider, and reconciler are shared handles.
#[derive(Clone)]
pub struct AppState {
    store: GraphStore,
    reconciler: Reconciler,
}

impl AppState {
    pub fn new(store: GraphStore, provider: SynonymProvider) -> Self {
        let reconciler = Reconciler::new(provider, store.clone());
        Self { store, reconciler }
    }

    /// Fuzzy autocomplete over synonym names, collapsed to at most five
    /// compound-level rows. Input with no searchable tokens returns empty
    /// without touching the store.
    pub async fn autocomplete(&self, query: &str) -> Result<Vec<SearchRow>, AppError> {
        let tokens = tokenize(query);
        let Some(expr) = fuzzy_expression(&tokens) else {
            return Ok(Vec::new());
        };
        debug!(%expr, "issuing fuzzy synonym query");
        let hits = self.store.fulltext_query(&expr, RAW_HIT_LIMIT).await?;
        Ok(collapse_hits(hits))
    }

    /// Read one compound with its synonym names.
    pub async fn compound(&self, compound_id: &str) -> Result<CompoundRecord, AppError> {
        self.store
            .get_compound(compound_id)
            .await?
            .ok_or_else(|| AppError::NotFound(compound_id.to_string()))
    }

    /// Upsert a bare compound node from its upstream numeric id. Returns
    /// the persisted key.
    pub async fn update_compound(&self, cid: u64) -> Result<String, AppError> {
        let key = compound_key(cid);
        self.store.upsert_compound(&key).await?;
        Ok(key)
    }

    /// Trigger the full reconciliation pipeline for a synonym name.
    pub async fn refresh_synonyms(&self, name: &str) -> Result<Vec<CompoundSynonyms>, AppError> {
        self.reconciler.refresh_by_name(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FixtureProvider;
    use crate::store::MemoryStore;
    use crate::synonym::Synonym;

    fn state_with_store(store: MemoryStore) -> AppState {
        AppState::new(
            GraphStore::Memory(store),
            SynonymProvider::Fixture(FixtureProvider::new()),
        )
    }

    #[tokio::test]
    async fn autocomplete_empty_query_is_empty() {
        let state = state_with_store(MemoryStore::new());
        assert!(state.autocomplete("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn autocomplete_punctuation_only_is_empty() {
        let state = state_with_store(MemoryStore::new());
        assert!(state.autocomplete("!! ?").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn autocomplete_collapses_to_compound_rows() {
        let store = MemoryStore::new();
        let s = |id: &str, name: &str| Synonym { id: id.into(), name: name.into() };
        // The same synonym name attributed to two compounds.
        store.upsert_synonym_and_attach("compound:cid1", &s("s1", "aspirin")).unwrap();
        store.upsert_synonym_and_attach("compound:cid2", &s("s1", "aspirin")).unwrap();
        store.upsert_synonym_and_attach("compound:cid3", &s("s2", "aspirin tablet")).unwrap();

        let state = state_with_store(store);
        let rows = state.autocomplete("aspirin").await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].synonym_id, "s1");
        assert_eq!(rows[0].compound_ids, vec!["compound:cid1", "compound:cid2"]);
        assert_eq!(rows[1].compound_ids, vec!["compound:cid3"]);
    }

    #[tokio::test]
    async fn compound_not_found_is_error() {
        let state = state_with_store(MemoryStore::new());
        let err = state.compound("compound:cid404").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_compound_returns_key() {
        let store = MemoryStore::new();
        let state = state_with_store(store.clone());
        let key = state.update_compound(2244).await.unwrap();
        assert_eq!(key, "compound:cid2244");
        assert!(store.get_compound("compound:cid2244").unwrap().is_some());
    }
}
