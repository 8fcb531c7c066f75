//! Synonym reconciliation — fetch from both upstream modes, merge, persist.
//!
//! The write path is sever-then-upsert and spans several store statements,
//! so writes for the same compound are serialized with a per-key async lock.
//! Different compounds proceed without coordination; reads take no lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::AppError;
use crate::provider::SynonymProvider;
use crate::store::{compound_key, GraphStore};
use crate::synonym::{merge_sources, Synonym, SynonymOrigin};

/// The reconciled synonym set for one upstream compound.
#[derive(Debug, Clone, Serialize)]
pub struct CompoundSynonyms {
    pub cid: u64,
    pub synonyms: Vec<Synonym>,
}

/// Per-compound async locks, created on first use.
#[derive(Clone, Default)]
pub struct CompoundLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl CompoundLocks {
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        slot.lock_owned().await
    }
}

/// Fetches, merges, and persists synonym sets. Cheap to clone — provider,
/// store, and lock map are all shared handles.
#[derive(Clone)]
pub struct Reconciler {
    provider: SynonymProvider,
    store: GraphStore,
    locks: CompoundLocks,
}

impl Reconciler {
    pub fn new(provider: SynonymProvider, store: GraphStore) -> Self {
        Self { provider, store, locks: CompoundLocks::default() }
    }

    /// Look up `name` in the provider's name-lookup mode and build the
    /// deduplicated synonym set for each compound it resolves to.
    ///
    /// Upstream-sourced entries (id-lookup mode) take priority over entries
    /// derived from the inline names; see [`merge_sources`].
    pub async fn fetch_synonyms_for_compound(&self, name: &str) -> Vec<CompoundSynonyms> {
        let records = self.provider.lookup_compounds_by_name(&name.to_lowercase()).await;

        let mut out = Vec::with_capacity(records.len());
        for record in records {
            let upstream = self.upstream_synonyms(record.cid).await;
            let derived = record
                .inline_synonym_names
                .into_iter()
                .map(|name| SynonymOrigin::Derived { name }.resolve())
                .collect();
            out.push(CompoundSynonyms {
                cid: record.cid,
                synonyms: merge_sources(upstream, derived),
            });
        }
        out
    }

    /// Resolve the upstream-assigned synonym ids of one compound to full
    /// records. The per-id name lookups fan out concurrently; results are
    /// re-ordered by spawn index so the merged output stays deterministic.
    /// An unresolvable name yields an entry with an empty name — kept, so
    /// the upstream-curated id survives.
    async fn upstream_synonyms(&self, cid: u64) -> Vec<Synonym> {
        let ids = self.provider.lookup_synonym_ids_by_compound(cid).await;

        let mut set = JoinSet::new();
        for (idx, id) in ids.into_iter().enumerate() {
            let provider = self.provider.clone();
            set.spawn(async move {
                let name = provider.lookup_synonym_name_by_id(&id).await.unwrap_or_default();
                (idx, SynonymOrigin::Upstream { id, name }.resolve())
            });
        }

        let mut resolved = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(pair) => resolved.push(pair),
                Err(e) => warn!(cid, "synonym name lookup task failed: {e}"),
            }
        }
        resolved.sort_by_key(|(idx, _)| *idx);
        resolved.into_iter().map(|(_, synonym)| synonym).collect()
    }

    /// Persist the authoritative synonym set for one compound: upsert the
    /// compound, sever attachments that fell out of the set, upsert and
    /// attach every entry. Safe to re-run with the same input.
    pub async fn reconcile(&self, cid: u64, synonyms: &[Synonym]) -> Result<(), AppError> {
        let key = compound_key(cid);
        let _guard = self.locks.acquire(&key).await;

        self.store.upsert_compound(&key).await?;

        let keep: Vec<String> = synonyms.iter().map(|s| s.id.clone()).collect();
        self.store.sever_attachments(&key, &keep).await?;

        for synonym in synonyms {
            self.store.upsert_synonym_and_attach(&key, synonym).await?;
        }
        Ok(())
    }

    /// The full pipeline behind the refresh-by-name endpoint: fetch and
    /// merge for every compound the name resolves to, then reconcile each
    /// independently.
    pub async fn refresh_by_name(&self, name: &str) -> Result<Vec<CompoundSynonyms>, AppError> {
        info!(synonym_name = %name, "starting synonym refresh");
        let records = self.fetch_synonyms_for_compound(name).await;
        info!(synonym_name = %name, compounds = records.len(), "upstream lookup complete");

        for record in &records {
            self.reconcile(record.cid, &record.synonyms).await?;
        }
        info!(synonym_name = %name, "synonym refresh complete");
        Ok(records)
    }
}
