//! syngraph — service entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at configured level
//!   4. Connect store, build provider
//!   5. Serve HTTP until SIGINT

use tokio_util::sync::CancellationToken;
use tracing::info;

use syngraph::config::{self, ProviderBackend, StoreBackend};
use syngraph::error::AppError;
use syngraph::http;
use syngraph::logger;
use syngraph::provider::{FixtureProvider, PubChemProvider, SynonymProvider};
use syngraph::service::AppState;
use syngraph::store::{GraphStore, MemoryStore, Neo4jStore};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level)?;

    info!(
        bind = %config.bind,
        store = ?config.store.backend,
        provider = ?config.provider.backend,
        "config loaded"
    );

    let store = match config.store.backend {
        StoreBackend::Neo4j => GraphStore::Neo4j(Neo4jStore::connect(&config.store.neo4j).await?),
        StoreBackend::Memory => GraphStore::Memory(MemoryStore::new()),
    };
    store.ensure_schema().await?;

    let provider = match config.provider.backend {
        ProviderBackend::PubChem => SynonymProvider::PubChem(
            PubChemProvider::new(&config.provider.pubchem)
                .map_err(|e| AppError::Config(format!("provider init: {e}")))?,
        ),
        ProviderBackend::Fixture => SynonymProvider::Fixture(FixtureProvider::new()),
    };

    let state = AppState::new(store, provider);

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
                shutdown.cancel();
            }
        });
    }

    http::serve(&config.bind, state, shutdown).await
}
