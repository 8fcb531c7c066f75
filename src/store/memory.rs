//! In-process store backend — local development and the test double.
//!
//! Mirrors the Neo4j backend's observable behavior, with a simplified
//! stand-in for Lucene fuzzy scoring: a token matches a name word exactly,
//! by prefix, or within Levenshtein distance 2. Scores are deterministic;
//! equal scores tie-break on synonym id so result order is stable.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::error::AppError;
use crate::synonym::Synonym;

use super::{CompoundRecord, SynonymHit};

#[derive(Default)]
struct Inner {
    /// compound key -> attached synonym ids
    attachments: HashMap<String, HashSet<String>>,
    /// synonym id -> display name
    synonyms: HashMap<String, String>,
}

/// Shared in-memory graph. Clones share the same underlying maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn upsert_compound(&self, compound_id: &str) -> Result<(), AppError> {
        self.write().attachments.entry(compound_id.to_string()).or_default();
        Ok(())
    }

    pub fn sever_attachments(&self, compound_id: &str, keep: &[String]) -> Result<(), AppError> {
        let keep: HashSet<&str> = keep.iter().map(String::as_str).collect();
        if let Some(attached) = self.write().attachments.get_mut(compound_id) {
            attached.retain(|id| keep.contains(id.as_str()));
        }
        Ok(())
    }

    pub fn upsert_synonym_and_attach(
        &self,
        compound_id: &str,
        synonym: &Synonym,
    ) -> Result<(), AppError> {
        let mut inner = self.write();
        inner.synonyms.insert(synonym.id.clone(), synonym.name.clone());
        inner
            .attachments
            .entry(compound_id.to_string())
            .or_default()
            .insert(synonym.id.clone());
        Ok(())
    }

    pub fn get_compound(&self, compound_id: &str) -> Result<Option<CompoundRecord>, AppError> {
        let inner = self.read();
        let Some(attached) = inner.attachments.get(compound_id) else {
            return Ok(None);
        };
        let mut synonyms: Vec<String> = attached
            .iter()
            .filter_map(|id| inner.synonyms.get(id).cloned())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        synonyms.sort();
        Ok(Some(CompoundRecord { id: compound_id.to_string(), synonyms }))
    }

    pub fn fulltext_query(&self, expr: &str, limit: usize) -> Result<Vec<SynonymHit>, AppError> {
        let tokens = parse_expression(expr);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let inner = self.read();

        // synonym id -> compounds it is attached to; unattached synonyms
        // cannot produce a hit (the Cypher MATCH would drop them too).
        let mut compounds_by_synonym: HashMap<&str, Vec<&str>> = HashMap::new();
        for (compound, attached) in &inner.attachments {
            for synonym_id in attached {
                compounds_by_synonym.entry(synonym_id).or_default().push(compound);
            }
        }

        let mut hits: Vec<SynonymHit> = Vec::new();
        for (synonym_id, compound_ids) in compounds_by_synonym {
            let Some(name) = inner.synonyms.get(synonym_id) else {
                continue;
            };
            let Some(score) = score_name(name, &tokens) else {
                continue;
            };
            let mut compound_ids: Vec<String> =
                compound_ids.into_iter().map(str::to_string).collect();
            compound_ids.sort();
            hits.push(SynonymHit {
                synonym_id: synonym_id.to_string(),
                name: name.clone(),
                compound_ids,
                score,
            });
        }

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.synonym_id.cmp(&b.synonym_id))
        });
        hits.truncate(limit);
        Ok(hits)
    }
}

/// Recover the tokens from a `"tok~ AND tok~"` expression.
fn parse_expression(expr: &str) -> Vec<String> {
    expr.split(" AND ")
        .map(|part| part.trim_end_matches('~'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Conjunctive fuzzy score of `name` against `tokens`, or `None` when some
/// token matches no word of the name.
fn score_name(name: &str, tokens: &[String]) -> Option<f64> {
    let words: Vec<String> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    let mut total = 0.0;
    for token in tokens {
        let best = words.iter().filter_map(|w| word_score(w, token)).fold(None, f64_max);
        total += best?;
    }
    Some(total)
}

fn f64_max(acc: Option<f64>, x: f64) -> Option<f64> {
    Some(match acc {
        Some(a) if a >= x => a,
        _ => x,
    })
}

/// Match strength of one token against one word: exact > prefix > edit
/// distance (max 2 edits, Lucene's fuzzy default).
fn word_score(word: &str, token: &str) -> Option<f64> {
    if word == token {
        return Some(1.0);
    }
    if word.starts_with(token) {
        return Some(0.75);
    }
    match levenshtein(word, token) {
        1 => Some(0.5),
        2 => Some(0.25),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 0..=a.len() {
        dp[i][0] = i;
    }
    for j in 0..=b.len() {
        dp[0][j] = j;
    }
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }
    dp[a.len()][b.len()]
}
