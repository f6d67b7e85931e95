// file: src/tools.rs
// version: 1.0.0
// guid: 21dff300-3da9-42c4-9153-031555486312

//! Installed-tool probing with per-invocation memoization

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Memoizes "is this tool on PATH" probes for one invocation.
///
/// Commands probe the same tools repeatedly; the cache makes each probe
/// happen at most once per invocation. Entries can be pre-recorded.
#[derive(Clone, Default)]
pub struct InstalledCheckCache {
    entries: Arc<Mutex<HashMap<String, bool>>>,
}

impl InstalledCheckCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe PATH for a tool, memoized.
    pub fn check_installed(&self, name: &str) -> bool {
        self.check_with(name, |tool| which::which(tool).is_ok())
    }

    /// Memoized check with a caller-supplied probe.
    pub fn check_with(&self, name: &str, probe: impl FnOnce(&str) -> bool) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        *entries.entry(name.to_string()).or_insert_with(|| {
            let installed = probe(name);
            debug!(tool = name, installed, "tool probe");
            installed
        })
    }

    /// Pre-record a probe result.
    pub fn record(&self, name: &str, installed: bool) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(name.to_string(), installed);
    }
}
