//! PubChem REST client — PUG (compound-by-name) and RDF (synonym graph)
//! APIs.
//!
//! All wire types are private to this module; callers only see
//! [`CompoundEntry`] and plain strings. Constructed once at startup, then
//! cheaply cloned because `reqwest::Client` is an `Arc` internally.
//!
//! Synonym names are appended to URLs as encoded path segments, never by
//! string formatting, so arbitrary user input cannot alter the request path.

use std::collections::HashMap;

use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::config::PubChemConfig;

use super::{CompoundEntry, ProviderError};

const SYNONYM_KEY_PREFIX: &str = "synonym/MD5_";
const IS_ATTRIBUTE_OF: &str = "http://semanticscience.org/resource/is-attribute-of";
const HAS_VALUE: &str = "http://semanticscience.org/resource/has-value";

#[derive(Debug, Clone)]
pub struct PubChemProvider {
    client: Client,
    pug_base_url: String,
    rdf_base_url: String,
}

impl PubChemProvider {
    pub fn new(cfg: &PubChemConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            pug_base_url: cfg.pug_base_url.clone(),
            rdf_base_url: cfg.rdf_base_url.clone(),
        })
    }

    /// PUG: `GET /compound/name/{name}/synonyms/JSON`.
    pub async fn compounds_by_name(&self, name: &str) -> Result<Vec<CompoundEntry>, ProviderError> {
        let url = join_segments(
            &self.pug_base_url,
            &["compound", "name", name, "synonyms", "JSON"],
        )?;
        let envelope: SynonymsEnvelope = self.get_json(url).await?;

        let compounds = envelope
            .information_list
            .map(|l| l.information)
            .unwrap_or_default()
            .into_iter()
            .map(|info| CompoundEntry {
                cid: info.cid,
                inline_synonym_names: info.synonyms,
            })
            .collect();
        Ok(compounds)
    }

    /// RDF: `GET /compound/CID{cid}.json` — synonym ids attributed to the
    /// compound. Keys look like `synonym/MD5_<hex>`; only entries that carry
    /// an `is-attribute-of` predicate count.
    pub async fn synonym_ids_by_compound(&self, cid: u64) -> Result<Vec<String>, ProviderError> {
        let url = join_segments(&self.rdf_base_url, &["compound", &format!("CID{cid}.json")])?;
        let doc: HashMap<String, serde_json::Value> = self.get_json(url).await?;

        let ids = doc
            .into_iter()
            .filter(|(key, value)| {
                key.starts_with(SYNONYM_KEY_PREFIX) && value.get(IS_ATTRIBUTE_OF).is_some()
            })
            .map(|(key, _)| key[SYNONYM_KEY_PREFIX.len()..].to_string())
            .collect();
        Ok(ids)
    }

    /// RDF: `GET /synonym/MD5_{id}.json` — resolve an id to its display
    /// name. A non-success status is a legitimate not-found (derived ids do
    /// not always exist upstream) and yields `Ok(None)`, as does a document
    /// without a `has-value` literal.
    pub async fn synonym_name_by_id(&self, synonym_id: &str) -> Result<Option<String>, ProviderError> {
        let key = format!("MD5_{synonym_id}");
        let url = join_segments(&self.rdf_base_url, &["synonym", &format!("{key}.json")])?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        if !response.status().is_success() {
            debug!(synonym_id, status = %response.status(), "synonym id not resolvable upstream");
            return Ok(None);
        }
        let doc: HashMap<String, serde_json::Value> = response
            .json()
            .await
            .map_err(|e| ProviderError::Payload(format!("failed to parse response body: {e}")))?;

        let name = doc
            .get(&format!("synonym/{key}"))
            .and_then(|entry| entry.get(HAS_VALUE))
            .and_then(|values| values.get(0))
            .and_then(|first| first.get("value"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_lowercase());
        Ok(name)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Request(format!("HTTP {status} from {url}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Payload(format!("failed to parse response body: {e}")))
    }
}

/// Append path segments to a base URL with percent-encoding.
fn join_segments(base: &str, segments: &[&str]) -> Result<Url, ProviderError> {
    let mut url = Url::parse(base)
        .map_err(|e| ProviderError::Request(format!("invalid base url '{base}': {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ProviderError::Request(format!("base url '{base}' cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

// ── Private wire types (PUG synonyms endpoint) ────────────────────────────────

#[derive(Debug, Deserialize)]
struct SynonymsEnvelope {
    #[serde(rename = "InformationList", default)]
    information_list: Option<InformationList>,
}

#[derive(Debug, Deserialize, Default)]
struct InformationList {
    #[serde(rename = "Information", default)]
    information: Vec<Information>,
}

#[derive(Debug, Deserialize)]
struct Information {
    #[serde(rename = "CID")]
    cid: u64,
    #[serde(rename = "Synonym", default)]
    synonyms: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_segments_encodes_reserved_chars() {
        let url = join_segments(
            "https://example.org/rest/pug",
            &["compound", "name", "2-acetoxybenzoic acid/salt", "synonyms", "JSON"],
        )
        .unwrap();
        let s = url.as_str();
        assert!(s.starts_with("https://example.org/rest/pug/compound/name/"));
        // The slash inside the name must not create an extra path segment.
        assert!(s.contains("2-acetoxybenzoic%20acid%2Fsalt"));
        assert!(s.ends_with("/synonyms/JSON"));
    }

    #[test]
    fn join_segments_rejects_opaque_base() {
        assert!(join_segments("mailto:nobody", &["x"]).is_err());
    }

    #[test]
    fn pug_envelope_parses() {
        let body = r#"{
            "InformationList": {
                "Information": [
                    {"CID": 2244, "Synonym": ["aspirin", "2-acetoxybenzoic acid"]}
                ]
            }
        }"#;
        let envelope: SynonymsEnvelope = serde_json::from_str(body).unwrap();
        let info = &envelope.information_list.unwrap().information[0];
        assert_eq!(info.cid, 2244);
        assert_eq!(info.synonyms.len(), 2);
    }

    #[test]
    fn pug_envelope_tolerates_missing_list() {
        let envelope: SynonymsEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.information_list.is_none());
    }

    #[test]
    fn rdf_compound_doc_filters_synonym_keys() {
        // Shape check against a trimmed RDF compound document.
        let body = r#"{
            "compound/CID2244": {"something": []},
            "synonym/MD5_aaaa": {"http://semanticscience.org/resource/is-attribute-of": [{"value": "compound/CID2244"}]},
            "synonym/MD5_bbbb": {"http://semanticscience.org/resource/some-other-predicate": []}
        }"#;
        let doc: HashMap<String, serde_json::Value> = serde_json::from_str(body).unwrap();
        let ids: Vec<String> = doc
            .into_iter()
            .filter(|(key, value)| {
                key.starts_with(SYNONYM_KEY_PREFIX) && value.get(IS_ATTRIBUTE_OF).is_some()
            })
            .map(|(key, _)| key[SYNONYM_KEY_PREFIX.len()..].to_string())
            .collect();
        assert_eq!(ids, vec!["aaaa"]);
    }
}
