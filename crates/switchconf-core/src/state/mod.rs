// # State Tracking
//
// Authoritative in-memory state fed by lifecycle notifications.

pub mod modules;

pub use modules::{ModuleEntry, ModuleTracker};
