// # Module State Tracker
//
// Concurrent map of module name -> load state.
//
// ## Purpose
//
// Every MODULE_LOAD / MODULE_UNLOAD notification upserts an entry here, so
// the map always reflects the last state the host reported. Load and unload
// requests are checked against it before anything is forwarded to the host.
//
// ## Concurrency
//
// Notifications and lookups arrive from arbitrary host threads. The map is
// sharded (`DashMap`), so callers never lock anything themselves. Reports
// are last-writer-wins.

use crate::error::{Error, Result};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Tracked state of one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    /// Module name
    pub name: String,
    /// Whether the module table asks for it at startup
    pub requested_at_startup: bool,
    /// Last state reported by the host
    pub currently_loaded: bool,
}

/// Concurrent module state tracker
///
/// Cloning is cheap and every clone shares the same map.
///
/// # Example
///
/// ```rust
/// use switchconf_core::state::ModuleTracker;
///
/// let tracker = ModuleTracker::new();
/// tracker.report_state("mod_sofia", true);
///
/// assert_eq!(tracker.is_loaded("mod_sofia"), Some(true));
/// assert!(tracker.request_load("mod_sofia").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleTracker {
    modules: Arc<DashMap<String, ModuleEntry>>,
}

impl ModuleTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module from the startup table
    ///
    /// Registration never overwrites a state the host already reported; it
    /// only records whether the module was requested at startup.
    pub fn register(&self, name: &str, requested_at_startup: bool) {
        self.modules
            .entry(name.to_string())
            .and_modify(|entry| entry.requested_at_startup = requested_at_startup)
            .or_insert_with(|| ModuleEntry {
                name: name.to_string(),
                requested_at_startup,
                currently_loaded: false,
            });
    }

    /// Record the state reported by the host (last writer wins)
    pub fn report_state(&self, name: &str, loaded: bool) {
        self.modules
            .entry(name.to_string())
            .and_modify(|entry| entry.currently_loaded = loaded)
            .or_insert_with(|| ModuleEntry {
                name: name.to_string(),
                requested_at_startup: false,
                currently_loaded: loaded,
            });

        if loaded {
            info!("Loaded module => {}", name);
        } else {
            info!("Unloaded module => {}", name);
        }
    }

    /// Check whether a module may be loaded
    ///
    /// This does not change any state; the host reports the actual load
    /// through a notification once it has happened.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Module is known and currently not loaded
    /// - `Err(Error::AlreadyInState)`: Module is already loaded
    /// - `Err(Error::UnknownTarget)`: Module was never registered or reported
    pub fn request_load(&self, name: &str) -> Result<()> {
        match self.is_loaded(name) {
            Some(false) => Ok(()),
            Some(true) => {
                error!("Already loaded {}", name);
                Err(Error::already_in_state(name, "loaded"))
            }
            None => {
                error!("Unable to load {}", name);
                Err(Error::unknown_target(name))
            }
        }
    }

    /// Check whether a module may be unloaded
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Module is known and currently loaded
    /// - `Err(Error::AlreadyInState)`: Module is not loaded
    /// - `Err(Error::UnknownTarget)`: Module was never registered or reported
    pub fn request_unload(&self, name: &str) -> Result<()> {
        match self.is_loaded(name) {
            Some(true) => Ok(()),
            Some(false) => {
                error!("Already unloaded {}", name);
                Err(Error::already_in_state(name, "unloaded"))
            }
            None => {
                error!("Unable to unload {}", name);
                Err(Error::unknown_target(name))
            }
        }
    }

    /// Current load state, `None` if the module was never seen
    pub fn is_loaded(&self, name: &str) -> Option<bool> {
        self.modules.get(name).map(|entry| entry.currently_loaded)
    }

    /// Full entry for a module
    pub fn get(&self, name: &str) -> Option<ModuleEntry> {
        self.modules.get(name).map(|entry| entry.value().clone())
    }

    /// Names of all loaded modules, sorted
    pub fn loaded_modules(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .modules
            .iter()
            .filter(|entry| entry.currently_loaded)
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Copy of every entry, sorted by name
    pub fn snapshot(&self) -> Vec<ModuleEntry> {
        let mut entries: Vec<ModuleEntry> = self
            .modules
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Number of tracked modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module has been registered or reported
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_is_last_writer_wins() {
        let tracker = ModuleTracker::new();
        assert!(tracker.is_empty());

        tracker.report_state("mod_sofia", true);
        tracker.report_state("mod_sofia", false);
        tracker.report_state("mod_sofia", true);

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.is_loaded("mod_sofia"), Some(true));
    }

    #[test]
    fn test_request_load() {
        let tracker = ModuleTracker::new();
        tracker.register("mod_opus", true);
        tracker.report_state("mod_sofia", true);

        assert!(tracker.request_load("mod_opus").is_ok());
        assert!(matches!(
            tracker.request_load("mod_sofia"),
            Err(Error::AlreadyInState { state: "loaded", .. })
        ));
        assert!(matches!(
            tracker.request_load("mod_unknown"),
            Err(Error::UnknownTarget(name)) if name == "mod_unknown"
        ));

        // Requests never mutate state
        assert_eq!(tracker.is_loaded("mod_opus"), Some(false));
    }

    #[test]
    fn test_request_unload() {
        let tracker = ModuleTracker::new();
        tracker.report_state("mod_sofia", true);
        tracker.register("mod_opus", false);

        assert!(tracker.request_unload("mod_sofia").is_ok());
        assert!(matches!(
            tracker.request_unload("mod_opus"),
            Err(Error::AlreadyInState { state: "unloaded", .. })
        ));
        assert!(tracker.request_unload("mod_unknown").is_err());
    }

    #[test]
    fn test_register_keeps_reported_state() {
        let tracker = ModuleTracker::new();
        tracker.report_state("mod_console", true);
        tracker.register("mod_console", true);

        let entry = tracker.get("mod_console").unwrap();
        assert!(entry.currently_loaded);
        assert!(entry.requested_at_startup);
    }

    #[test]
    fn test_snapshot_and_loaded_modules_are_sorted() {
        let tracker = ModuleTracker::new();
        tracker.report_state("mod_sofia", true);
        tracker.report_state("mod_commands", true);
        tracker.report_state("mod_lua", false);

        assert_eq!(tracker.loaded_modules(), vec!["mod_commands", "mod_sofia"]);
        let names: Vec<_> = tracker.snapshot().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["mod_commands", "mod_lua", "mod_sofia"]);
    }

    #[test]
    fn test_concurrent_reports() {
        let tracker = ModuleTracker::new();

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let tracker = tracker.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        tracker.report_state(&format!("mod_{}", i), worker % 2 == 0);
                        let _ = tracker.is_loaded(&format!("mod_{}", (i + worker) % 100));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.len(), 100);
    }
}
