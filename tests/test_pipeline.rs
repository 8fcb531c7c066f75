//! End-to-end pipeline tests: fixture provider → reconciler → memory store
//! → fuzzy autocomplete.

use syngraph::provider::{FixtureProvider, SynonymProvider};
use syngraph::service::AppState;
use syngraph::store::{GraphStore, MemoryStore};
use syngraph::synonym::identity;

fn state_with(fixture: FixtureProvider) -> (AppState, MemoryStore) {
    let store = MemoryStore::new();
    let state = AppState::new(
        GraphStore::Memory(store.clone()),
        SynonymProvider::Fixture(fixture),
    );
    (state, store)
}

#[tokio::test]
async fn refresh_then_autocomplete_round_trip() {
    let fixture = FixtureProvider::new()
        .with_compound("aspirin", 2244, &["Aspirin", "2-acetoxybenzoic acid"])
        .with_upstream_ids(2244, &["0000aaaa0000aaaa"])
        .with_synonym_name("0000aaaa0000aaaa", "Acetylsalicylic acid");
    let (state, _) = state_with(fixture);

    let records = state.refresh_synonyms("Aspirin").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].cid, 2244);
    assert_eq!(records[0].synonyms.len(), 3);

    let compound = state.compound("compound:cid2244").await.unwrap();
    assert_eq!(
        compound.synonyms,
        vec!["2-acetoxybenzoic acid", "acetylsalicylic acid", "aspirin"]
    );

    let rows = state.autocomplete("aspirin").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "aspirin");
    assert_eq!(rows[0].compound_ids, vec!["compound:cid2244"]);
}

#[tokio::test]
async fn shared_name_resolves_to_multiple_compounds() {
    // The same chemical name legitimately maps to two upstream compounds;
    // both end up attached to the one synonym node and autocomplete folds
    // them into a single row.
    let fixture = FixtureProvider::new()
        .with_compound("glucose", 5793, &["Glucose"])
        .with_compound("glucose", 79025, &["Glucose"]);
    let (state, _) = state_with(fixture);

    state.refresh_synonyms("glucose").await.unwrap();

    let rows = state.autocomplete("glucose").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].synonym_id, identity("glucose"));
    assert_eq!(
        rows[0].compound_ids,
        vec!["compound:cid5793", "compound:cid79025"]
    );
}

#[tokio::test]
async fn second_refresh_severs_stale_attachments() {
    let first = FixtureProvider::new().with_compound("paracetamol", 1983, &["Paracetamol", "Acetaminophen"]);
    let (state, store) = state_with(first);
    state.refresh_synonyms("paracetamol").await.unwrap();

    // Upstream later drops one name; a fresh state over the same store
    // simulates the next refresh seeing the reduced set.
    let second = FixtureProvider::new().with_compound("paracetamol", 1983, &["Paracetamol"]);
    let state = AppState::new(
        GraphStore::Memory(store.clone()),
        SynonymProvider::Fixture(second),
    );
    state.refresh_synonyms("paracetamol").await.unwrap();

    let compound = state.compound("compound:cid1983").await.unwrap();
    assert_eq!(compound.synonyms, vec!["paracetamol"]);
}

#[tokio::test]
async fn refresh_unknown_name_writes_nothing() {
    let (state, store) = state_with(FixtureProvider::new());
    let records = state.refresh_synonyms("unobtainium").await.unwrap();
    assert!(records.is_empty());
    assert!(store.get_compound("compound:cid1").unwrap().is_none());
}

#[tokio::test]
async fn autocomplete_caps_at_five_rows() {
    // Six compounds, each with a distinct synonym that matches the query.
    let mut fixture = FixtureProvider::new();
    for i in 0..6u64 {
        let name = format!("aspirin variant {i}");
        fixture = fixture.with_compound("aspirin", i + 1, &[name.as_str()]);
    }
    let (state, _) = state_with(fixture);
    state.refresh_synonyms("aspirin").await.unwrap();

    let rows = state.autocomplete("aspirin").await.unwrap();
    assert_eq!(rows.len(), 5);
}

#[tokio::test]
async fn empty_named_synonyms_survive_to_the_store() {
    // An upstream id whose name lookup fails is persisted with an empty
    // name rather than dropped.
    let fixture = FixtureProvider::new()
        .with_compound("aspirin", 2244, &[])
        .with_upstream_ids(2244, &["deaddeaddeaddead"]);
    let (state, store) = state_with(fixture);

    let records = state.refresh_synonyms("aspirin").await.unwrap();
    assert_eq!(records[0].synonyms.len(), 1);
    assert_eq!(records[0].synonyms[0].name, "");

    let attached = store.get_compound("compound:cid2244").unwrap().unwrap();
    assert_eq!(attached.synonyms, vec![""]);
}
