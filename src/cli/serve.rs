//! Serve command implementation.

use super::CliError;
use jetsquad::api::{HttpServer, Router};
use jetsquad::clock::SystemClock;
use jetsquad::config::Config;
use jetsquad::engine::Engine;
use jetsquad::rng::{RollSource, SeededRolls};
use jetsquad::store::{JsonFileStore, MemoryStore, ProfileStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Execute the serve command. Blocks until the process is killed.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the address bound.
pub(crate) fn execute(config: &Config, seed: Option<u64>) -> Result<(), CliError> {
    let store: Arc<dyn ProfileStore> = match &config.server.store_path {
        Some(path) => Arc::new(JsonFileStore::open(path)?),
        None => {
            warn!("no store_path configured; profiles are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };
    let rolls: Box<dyn RollSource + Send> = match seed {
        Some(seed) => Box::new(SeededRolls::new(seed)),
        None => Box::new(SeededRolls::from_entropy()),
    };

    let engine = Engine::new(store, Arc::new(SystemClock), rolls, config.economy);
    let server = HttpServer::bind(&config.server.bind, Router::new(Arc::new(engine)))
        .map_err(|e| CliError::new(format!("Failed to bind {}: {e}", config.server.bind)))?;

    server.run(
        config.server.workers,
        Duration::from_millis(config.server.sweep_interval_ms),
    );
    Ok(())
}
