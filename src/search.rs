//! Fuzzy search aggregation — from free text to ranked per-compound rows.
//!
//! Three pure stages: tokenize the user's input, build the Lucene fuzzy
//! expression, and collapse per-synonym index hits into compound-level
//! results. The store call between stages two and three lives on
//! [`crate::service::AppState`]; everything here is side-effect free.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::store::SynonymHit;

/// Raw full-text hits requested from the index per query.
pub const RAW_HIT_LIMIT: usize = 50;
/// Result rows returned to the caller per query.
pub const MAX_RESULTS: usize = 5;

// Maximal runs of Unicode letters/digits, two or more. Anything the pattern
// rejects never reaches the full-text query language, which is the injection
// whitelist for the Lucene expression.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]{2,}").expect("token pattern is valid"));

/// One autocomplete result row: a winning synonym and every compound it is
/// the best-scoring hit for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRow {
    pub name: String,
    pub synonym_id: String,
    pub compound_ids: Vec<String>,
}

/// Extract searchable tokens from free-text input.
///
/// Punctuation, whitespace and single characters are discarded.
pub fn tokenize(input: &str) -> Vec<String> {
    TOKEN_RE.find_iter(input).map(|m| m.as_str().to_string()).collect()
}

/// Build the fuzzy conjunctive expression: every token edit-distance
/// tolerant, all tokens required. `["aspirin", "acid"]` becomes
/// `"aspirin~ AND acid~"`. `None` when there is nothing to search — the
/// caller must not issue a store query in that case.
pub fn fuzzy_expression(tokens: &[String]) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }
    Some(format!("{}~", tokens.join("~ AND ")))
}

/// Collapse per-synonym hits into at most [`MAX_RESULTS`] per-compound rows.
///
/// `hits` must be ordered by score descending (the store contract). Each
/// compound is claimed by its first-seen (best-scoring) synonym hit; the
/// claimed compounds are then grouped under their winning synonym. Row order
/// follows each row's best score because rows are created in hit order.
pub fn collapse_hits(hits: Vec<SynonymHit>) -> Vec<SearchRow> {
    let mut claimed: HashSet<String> = HashSet::new();
    let mut row_by_synonym: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<SearchRow> = Vec::new();

    for hit in hits {
        for compound_id in &hit.compound_ids {
            if claimed.contains(compound_id) {
                continue;
            }
            claimed.insert(compound_id.clone());
            let idx = *row_by_synonym.entry(hit.synonym_id.clone()).or_insert_with(|| {
                rows.push(SearchRow {
                    name: hit.name.clone(),
                    synonym_id: hit.synonym_id.clone(),
                    compound_ids: Vec::new(),
                });
                rows.len() - 1
            });
            rows[idx].compound_ids.push(compound_id.clone());
        }
    }

    rows.truncate(MAX_RESULTS);
    rows
}
