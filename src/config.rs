//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `SYNGRAPH_BIND`, `SYNGRAPH_LOG_LEVEL`, `NEO4J_URL`,
//! `NEO4J_USER` and `NEO4J_PSWD` env overrides. The Neo4j password is only
//! ever sourced from the environment, never from TOML.

use std::{env, fs, path::Path};

use serde::Deserialize;

use crate::error::AppError;

/// Which graph store backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Neo4j over Bolt — the production store.
    Neo4j,
    /// In-process store — local development and tests.
    Memory,
}

impl StoreBackend {
    fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "neo4j" => Ok(Self::Neo4j),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Config(format!("unknown store backend: '{other}'"))),
        }
    }
}

/// Which synonym provider backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderBackend {
    /// Live PubChem PUG + RDF REST APIs.
    PubChem,
    /// Canned in-process data — offline development and tests.
    Fixture,
}

impl ProviderBackend {
    fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "pubchem" => Ok(Self::PubChem),
            "fixture" => Ok(Self::Fixture),
            other => Err(AppError::Config(format!("unknown provider backend: '{other}'"))),
        }
    }
}

/// Neo4j connection settings.
#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    /// From `NEO4J_PSWD`; defaults match a local test database.
    pub password: String,
}

/// PubChem REST settings.
#[derive(Debug, Clone)]
pub struct PubChemConfig {
    /// Base URL of the PUG API (compound-by-name lookups).
    pub pug_base_url: String,
    /// Base URL of the RDF API (per-compound synonym ids, per-id names).
    pub rdf_base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// Graph store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub neo4j: Neo4jConfig,
}

/// Synonym provider configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub backend: ProviderBackend,
    pub pubchem: PubChemConfig,
}

/// Fully-resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address the HTTP listener binds to.
    pub bind: String,
    pub log_level: String,
    pub store: StoreConfig,
    pub provider: ProviderConfig,
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    service: RawService,
    #[serde(default)]
    store: RawStore,
    #[serde(default)]
    provider: RawProvider,
}

#[derive(Deserialize)]
struct RawService {
    #[serde(default = "default_bind")]
    bind: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawService {
    fn default() -> Self {
        Self { bind: default_bind(), log_level: default_log_level() }
    }
}

#[derive(Deserialize)]
struct RawStore {
    #[serde(default = "default_store_backend")]
    backend: String,
    #[serde(default)]
    neo4j: RawNeo4j,
}

impl Default for RawStore {
    fn default() -> Self {
        Self { backend: default_store_backend(), neo4j: RawNeo4j::default() }
    }
}

#[derive(Deserialize)]
struct RawNeo4j {
    #[serde(default = "default_neo4j_uri")]
    uri: String,
    #[serde(default = "default_neo4j_user")]
    user: String,
}

impl Default for RawNeo4j {
    fn default() -> Self {
        Self { uri: default_neo4j_uri(), user: default_neo4j_user() }
    }
}

#[derive(Deserialize)]
struct RawProvider {
    #[serde(default = "default_provider_backend")]
    backend: String,
    #[serde(default)]
    pubchem: RawPubChem,
}

impl Default for RawProvider {
    fn default() -> Self {
        Self { backend: default_provider_backend(), pubchem: RawPubChem::default() }
    }
}

#[derive(Deserialize)]
struct RawPubChem {
    #[serde(default = "default_pug_base_url")]
    pug_base_url: String,
    #[serde(default = "default_rdf_base_url")]
    rdf_base_url: String,
    #[serde(default = "default_pubchem_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawPubChem {
    fn default() -> Self {
        Self {
            pug_base_url: default_pug_base_url(),
            rdf_base_url: default_rdf_base_url(),
            timeout_seconds: default_pubchem_timeout_seconds(),
        }
    }
}

fn default_bind() -> String { "127.0.0.1:8080".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_store_backend() -> String { "neo4j".to_string() }
fn default_neo4j_uri() -> String { "bolt://localhost:7687".to_string() }
fn default_neo4j_user() -> String { "neo4j".to_string() }
// Matches the default of a freshly provisioned local database.
fn default_neo4j_password() -> String { "password".to_string() }
fn default_provider_backend() -> String { "pubchem".to_string() }
fn default_pug_base_url() -> String { "https://pubchem.ncbi.nlm.nih.gov/rest/pug".to_string() }
fn default_rdf_base_url() -> String { "https://pubchem.ncbi.nlm.nih.gov/rest/rdf".to_string() }
fn default_pubchem_timeout_seconds() -> u64 { 30 }

/// Environment overrides applied on top of the TOML file.
///
/// Tests construct this directly instead of mutating process env vars.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub bind: Option<String>,
    pub log_level: Option<String>,
    pub neo4j_uri: Option<String>,
    pub neo4j_user: Option<String>,
    pub neo4j_password: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            bind: env::var("SYNGRAPH_BIND").ok(),
            log_level: env::var("SYNGRAPH_LOG_LEVEL").ok(),
            neo4j_uri: env::var("NEO4J_URL").ok(),
            neo4j_user: env::var("NEO4J_USER").ok(),
            neo4j_password: env::var("NEO4J_PSWD").ok(),
        }
    }
}

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    load_from(Path::new("config/default.toml"), &EnvOverrides::from_env())
}

/// Internal loader — accepts an explicit path and explicit overrides.
pub fn load_from(path: &Path, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let bind = overrides.bind.clone().unwrap_or(parsed.service.bind);
    let log_level = overrides.log_level.clone().unwrap_or(parsed.service.log_level);

    Ok(Config {
        bind,
        log_level,
        store: StoreConfig {
            backend: StoreBackend::parse(&parsed.store.backend)?,
            neo4j: Neo4jConfig {
                uri: overrides.neo4j_uri.clone().unwrap_or(parsed.store.neo4j.uri),
                user: overrides.neo4j_user.clone().unwrap_or(parsed.store.neo4j.user),
                password: overrides
                    .neo4j_password
                    .clone()
                    .unwrap_or_else(default_neo4j_password),
            },
        },
        provider: ProviderConfig {
            backend: ProviderBackend::parse(&parsed.provider.backend)?,
            pubchem: PubChemConfig {
                pug_base_url: parsed.provider.pubchem.pug_base_url,
                rdf_base_url: parsed.provider.pubchem.rdf_base_url,
                timeout_seconds: parsed.provider.pubchem.timeout_seconds,
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL_TOML: &str = r#"
[service]
bind = "0.0.0.0:9090"
log_level = "debug"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_basic_config() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), &EnvOverrides::default()).unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:9090");
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.store.backend, StoreBackend::Neo4j);
        assert_eq!(cfg.provider.backend, ProviderBackend::PubChem);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let f = write_toml("");
        let cfg = load_from(f.path(), &EnvOverrides::default()).unwrap();
        assert_eq!(cfg.bind, "127.0.0.1:8080");
        assert_eq!(cfg.store.neo4j.uri, "bolt://localhost:7687");
        assert_eq!(cfg.store.neo4j.user, "neo4j");
        assert!(cfg.provider.pubchem.pug_base_url.contains("/rest/pug"));
    }

    #[test]
    fn backend_selection_parses() {
        let f = write_toml("[store]\nbackend = \"memory\"\n\n[provider]\nbackend = \"fixture\"\n");
        let cfg = load_from(f.path(), &EnvOverrides::default()).unwrap();
        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.provider.backend, ProviderBackend::Fixture);
    }

    #[test]
    fn unknown_backend_errors() {
        let f = write_toml("[store]\nbackend = \"postgres\"\n");
        let err = load_from(f.path(), &EnvOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("unknown store backend"));
    }

    #[test]
    fn env_overrides_apply() {
        let f = write_toml(MINIMAL_TOML);
        let overrides = EnvOverrides {
            bind: Some("127.0.0.1:7000".into()),
            log_level: Some("warn".into()),
            neo4j_uri: Some("bolt://db:7687".into()),
            neo4j_user: Some("svc".into()),
            neo4j_password: Some("secret".into()),
        };
        let cfg = load_from(f.path(), &overrides).unwrap();
        assert_eq!(cfg.bind, "127.0.0.1:7000");
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.store.neo4j.uri, "bolt://db:7687");
        assert_eq!(cfg.store.neo4j.user, "svc");
        assert_eq!(cfg.store.neo4j.password, "secret");
    }

    #[test]
    fn password_defaults_without_env() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), &EnvOverrides::default()).unwrap();
        assert_eq!(cfg.store.neo4j.password, "password");
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(Path::new("/nonexistent/config.toml"), &EnvOverrides::default());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("config error"));
    }
}
