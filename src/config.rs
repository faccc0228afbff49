use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::storage::{MemoryStorage, SharedStorage, SqliteStorage};

/// Student roster sidecar: one JSON request per stdin line, one JSON response
/// per stdout line.
#[derive(Parser, Debug, Clone)]
#[command(name = "rosterd")]
#[command(about = "Student roster data service for the dashboard front end")]
pub struct Args {
    /// SQLite file holding the roster, theme and demo sign-in
    #[arg(long, env = "ROSTERD_STORAGE", default_value = "roster.sqlite3")]
    pub storage: PathBuf,

    /// Keep everything in process memory; nothing survives a restart
    #[arg(long, env = "ROSTERD_IN_MEMORY", default_value = "false")]
    pub in_memory: bool,

    /// Artificial delay applied to every roster request
    #[arg(long, env = "ROSTERD_LATENCY_MS", default_value = "1000")]
    pub latency_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ROSTERD_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Seed for generated attendance values
    #[arg(long, env = "ROSTERD_SEED")]
    pub seed: Option<u64>,
}

impl Args {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn open_storage(&self) -> anyhow::Result<SharedStorage> {
        if self.in_memory {
            return Ok(Arc::new(MemoryStorage::new()));
        }
        Ok(Arc::new(SqliteStorage::open(&self.storage)?))
    }
}
