//! Lifecycle notifications
//!
//! The host emits an event for everything that happens inside it. This
//! module turns those raw notifications into typed values and routes the few
//! kinds the core cares about.
//!
//! ## Event Flow
//!
//! 1. Kind name normalized (`SWITCH_EVENT_MODULE_LOAD` -> `MODULE_LOAD`)
//! 2. Linked header list folded into [`Headers`] (first occurrence wins)
//! 3. [`EventClassifier`] discards noise and routes the rest

pub mod classifier;
pub mod headers;

pub use classifier::{API_LOG_TARGET, Disposition, EventClassifier};
pub use headers::{EventHeader, Headers};

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Header carrying the command name of an API event
pub const API_COMMAND_HEADER: &str = "API-Command";

/// Header carrying the argument string of an API event
pub const API_COMMAND_ARGUMENT_HEADER: &str = "API-Command-Argument";

/// Header carrying the module name of a load/unload event
pub const MODULE_NAME_HEADER: &str = "name";

/// Normalized event kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Heartbeat,
    SessionHeartbeat,
    ReSchedule,
    ReloadXml,
    Api,
    ModuleLoad,
    ModuleUnload,
    /// Any kind the core does not route
    Other(String),
}

impl EventKind {
    /// Normalize a raw kind name
    ///
    /// Trims, upper-cases and strips an optional `SWITCH_EVENT_` prefix.
    pub fn parse(raw: &str) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("SWITCH_EVENT_").unwrap_or(&upper);
        match name {
            "HEARTBEAT" => EventKind::Heartbeat,
            "SESSION_HEARTBEAT" => EventKind::SessionHeartbeat,
            "RE_SCHEDULE" => EventKind::ReSchedule,
            "RELOADXML" => EventKind::ReloadXml,
            "API" => EventKind::Api,
            "MODULE_LOAD" => EventKind::ModuleLoad,
            "MODULE_UNLOAD" => EventKind::ModuleUnload,
            other => EventKind::Other(other.to_string()),
        }
    }

    /// High-frequency kinds that are dropped before any handler runs
    pub fn is_noise(&self) -> bool {
        matches!(
            self,
            EventKind::Heartbeat | EventKind::SessionHeartbeat | EventKind::ReSchedule
        )
    }

    /// Canonical name
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Heartbeat => "HEARTBEAT",
            EventKind::SessionHeartbeat => "SESSION_HEARTBEAT",
            EventKind::ReSchedule => "RE_SCHEDULE",
            EventKind::ReloadXml => "RELOADXML",
            EventKind::Api => "API",
            EventKind::ModuleLoad => "MODULE_LOAD",
            EventKind::ModuleUnload => "MODULE_UNLOAD",
            EventKind::Other(name) => name,
        }
    }
}

impl FromStr for EventKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EventKind::parse(s))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle notification with normalized headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Event kind
    pub kind: EventKind,
    /// Key-unique headers
    pub headers: Headers,
}

impl Notification {
    /// Create a notification from already normalized parts
    pub fn new(kind: EventKind, headers: Headers) -> Self {
        Self { kind, headers }
    }

    /// Create a notification from the host's raw shape
    pub fn from_host(kind: &str, headers: Option<&EventHeader>) -> Self {
        Self::new(EventKind::parse(kind), Headers::from_linked(headers))
    }

    /// Create a notification from name/value pairs
    pub fn with_pairs<I, K, V>(kind: EventKind, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::new(kind, Headers::from_pairs(pairs))
    }
}
