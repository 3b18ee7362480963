// # Event Classifier
//
// Stateless filter in front of the module tracker and the diagnostic log.
//
// | Kind                                     | Outcome                          |
// |------------------------------------------|----------------------------------|
// | HEARTBEAT, SESSION_HEARTBEAT, RE_SCHEDULE | discarded                        |
// | RELOADXML                                | accepted, no-op hook             |
// | API                                      | one log entry if both headers    |
// | MODULE_LOAD / MODULE_UNLOAD              | forwarded to tracker if `name`   |
// | anything else                            | ignored                          |

use crate::events::{
    API_COMMAND_ARGUMENT_HEADER, API_COMMAND_HEADER, EventKind, MODULE_NAME_HEADER, Notification,
};
use crate::state::ModuleTracker;
use tracing::{info, trace};

/// Tracing target for inbound API request diagnostics
pub const API_LOG_TARGET: &str = "switchconf::api";

/// What the classifier did with a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// High-frequency noise, dropped before any handler
    Discarded,
    /// Configuration reload requested
    ReloadRequested,
    /// API invocation logged
    ApiLogged {
        /// Value of the `API-Command` header
        command: String,
        /// Value of the `API-Command-Argument` header
        argument: String,
    },
    /// Module state forwarded to the tracker
    ModuleReported {
        /// Module name from the `name` header
        name: String,
        /// True for MODULE_LOAD, false for MODULE_UNLOAD
        loaded: bool,
    },
    /// Nothing to do for this notification
    Ignored,
}

/// Routes notifications to the module tracker and the diagnostic log
#[derive(Debug, Clone)]
pub struct EventClassifier {
    tracker: ModuleTracker,
}

impl EventClassifier {
    /// Create a classifier feeding the given tracker
    pub fn new(tracker: ModuleTracker) -> Self {
        Self { tracker }
    }

    /// The tracker module reports are forwarded to
    pub fn tracker(&self) -> &ModuleTracker {
        &self.tracker
    }

    /// Classify and route a notification
    pub fn classify(&self, notification: &Notification) -> Disposition {
        let kind = &notification.kind;
        if kind.is_noise() {
            return Disposition::Discarded;
        }

        let headers = &notification.headers;
        match kind {
            EventKind::ReloadXml => {
                trace!("Reload requested");
                Disposition::ReloadRequested
            }
            EventKind::Api => {
                match (
                    headers.get(API_COMMAND_HEADER),
                    headers.get(API_COMMAND_ARGUMENT_HEADER),
                ) {
                    (Some(command), Some(argument)) => {
                        info!(
                            target: API_LOG_TARGET,
                            command,
                            argument,
                            "API request => {} {}",
                            command,
                            argument
                        );
                        Disposition::ApiLogged {
                            command: command.to_string(),
                            argument: argument.to_string(),
                        }
                    }
                    _ => Disposition::Ignored,
                }
            }
            EventKind::ModuleLoad | EventKind::ModuleUnload => {
                match headers.get(MODULE_NAME_HEADER) {
                    Some(name) => {
                        let loaded = *kind == EventKind::ModuleLoad;
                        self.tracker.report_state(name, loaded);
                        Disposition::ModuleReported {
                            name: name.to_string(),
                            loaded,
                        }
                    }
                    None => Disposition::Ignored,
                }
            }
            _ => Disposition::Ignored,
        }
    }
}
