use std::{env, time::Duration};

use crate::storage::cached::DEFAULT_EVENT_CAPACITY;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the SQLite database file backing the local store (default: "tasksync.db")
    pub sqlite_path: String,
    /// Simulated remote latency in milliseconds (default: 0)
    pub remote_latency_ms: u64,
    /// Capacity of the task event channel (default: 100)
    pub event_capacity: usize,
    /// Seed the simulated remote with sample tasks (default: true)
    pub seed_remote: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TASKSYNC_SQLITE_PATH` - SQLite database path (default: "tasksync.db")
    /// - `TASKSYNC_REMOTE_LATENCY_MS` - Simulated remote latency (default: 0)
    /// - `TASKSYNC_EVENT_CAPACITY` - Event channel capacity (default: 100)
    /// - `TASKSYNC_SEED_REMOTE` - Seed the remote with sample tasks (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            sqlite_path: lookup("TASKSYNC_SQLITE_PATH")
                .unwrap_or_else(|| "tasksync.db".to_string()),
            remote_latency_ms: lookup("TASKSYNC_REMOTE_LATENCY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            event_capacity: lookup("TASKSYNC_EVENT_CAPACITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
            seed_remote: lookup("TASKSYNC_SEED_REMOTE")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
        }
    }

    /// Get simulated remote latency as a Duration.
    pub fn remote_latency(&self) -> Duration {
        Duration::from_millis(self.remote_latency_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
