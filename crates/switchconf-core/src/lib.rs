// # switchconf-core
//
// Core library for generating telephony host configuration on demand.
//
// ## Architecture Overview
//
// The host asks for a configuration section by key (`acl.conf`,
// `modules.conf`, ...) and receives a freshly rendered XML document instead
// of reading a static file. In parallel it feeds lifecycle notifications
// into the engine, which keeps track of loaded modules.
//
// - **cidr**: Subnet mask / prefix length conversion
// - **ConfigProvider**: Trait for one configuration section (defaults + render)
// - **ProviderRegistry**: Section key -> provider dispatch
// - **DocumentGenerator**: Envelope construction and delegation to providers
// - **ModuleTracker**: Concurrent module name -> state map
// - **EventClassifier**: Noise filtering and routing of notifications
// - **ConfigEngine**: Facade tying the pieces together
//
// ## Design Principles
//
// 1. **Typed models**: Every section renders from in-memory structs, never from files
// 2. **Explicit configuration**: Defaults live in a `SwitchConfig` built once at startup
// 3. **Recoverable failures**: Nothing in the core terminates the host process

pub mod cidr;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod events;
pub mod providers;
pub mod registry;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::{EngineSettings, SwitchConfig};
pub use document::{Document, Element};
pub use engine::{ConfigEngine, EngineEvent, LookupRequest};
pub use error::{Error, Result};
pub use events::{Disposition, EventClassifier, EventKind, Headers, Notification};
pub use registry::{DocumentGenerator, ProviderRegistry, Section};
pub use state::{ModuleEntry, ModuleTracker};
pub use traits::{ConfigProvider, TimezoneCatalog};
