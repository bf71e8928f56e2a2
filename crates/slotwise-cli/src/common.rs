//! Shared helpers for CLI commands: fixture loading, proposal state
//! persistence, and engine assembly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, Utc};
use slotwise_core::config::data_dir;
use slotwise_core::{
    CalendarFixture, EngineConfig, Horizon, InMemoryGateway, Proposal, ProposalStore,
    SchedulingEngine, StaticAuthDirectory,
};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Load a calendar fixture (authenticated users + busy intervals).
pub fn load_fixture(path: &Path) -> CliResult<CalendarFixture> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read fixture {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

/// Where proposals persist between invocations.
pub fn state_path(custom: Option<PathBuf>) -> CliResult<PathBuf> {
    match custom {
        Some(path) => Ok(path),
        None => Ok(data_dir()?.join("proposals.json")),
    }
}

/// Load the proposal store from the state file; missing file is empty.
pub fn load_store(path: &Path) -> CliResult<ProposalStore> {
    if !path.exists() {
        return Ok(ProposalStore::new());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read state {}: {e}", path.display()))?;
    let proposals: Vec<Proposal> = serde_json::from_str(&text)?;
    Ok(ProposalStore::from_snapshot(proposals))
}

/// Persist the proposal store back to the state file.
pub fn save_store(store: &ProposalStore, path: &Path) -> CliResult {
    let text = serde_json::to_string_pretty(&store.snapshot())?;
    std::fs::write(path, text)
        .map_err(|e| format!("cannot write state {}: {e}", path.display()))?;
    Ok(())
}

/// Assemble an engine over a fixture-backed gateway and a store.
pub fn build_engine(
    fixture: &CalendarFixture,
    store: Arc<ProposalStore>,
    config: EngineConfig,
) -> SchedulingEngine {
    let gateway = Arc::new(InMemoryGateway::from_fixture(fixture));
    let directory = Arc::new(StaticAuthDirectory::new(fixture.authenticated.clone()));
    SchedulingEngine::with_parts(gateway, directory, store, config)
}

/// Horizon from now through `days` days ahead.
pub fn default_horizon(days: i64) -> CliResult<Horizon> {
    let start = Utc::now();
    Ok(Horizon::new(start, start + Duration::days(days))
        .map_err(slotwise_core::SchedulingError::from)?)
}
