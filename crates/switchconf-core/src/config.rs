//! Configuration types for the switchconf system
//!
//! A [`SwitchConfig`] holds the typed model of every section plus engine
//! settings. It is built once at startup (stock defaults or a JSON profile)
//! and handed to the engine; nothing reads ambient globals.
//!
//! ## Profile file
//!
//! Every section is optional and falls back to the stock defaults:
//!
//! ```json
//! {
//!   "acl": [
//!     { "name": "lan", "default": "allow",
//!       "nodes": [ { "type": "deny", "address": "192.168.42.0", "mask": "255.255.255.0" } ] }
//!   ],
//!   "msrp": { "enabled": false },
//!   "engine": { "event_channel_capacity": 256 }
//! }
//! ```

use crate::error::{Error, Result};
use crate::providers::acl::{self, AclList};
use crate::providers::conference::ConferenceSettings;
use crate::providers::modules::{self, ModuleToggle};
use crate::providers::msrp::MsrpSettings;
use crate::providers::speex;
use crate::providers::Param;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main switchconf configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchConfig {
    /// ACL lists for `acl.conf`
    #[serde(default = "AclList::defaults")]
    pub acl: Vec<AclList>,

    /// Module table for `modules.conf`
    #[serde(default = "ModuleToggle::defaults")]
    pub modules: Vec<ModuleToggle>,

    /// Settings for `msrp.conf`
    #[serde(default)]
    pub msrp: MsrpSettings,

    /// Codec properties for `speex.conf`
    #[serde(default = "speex::default_properties")]
    pub speex: Vec<Param>,

    /// Settings for `conference.conf`
    #[serde(default)]
    pub conference: ConferenceSettings,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineSettings,
}

impl SwitchConfig {
    /// Create a configuration with stock defaults
    pub fn new() -> Self {
        Self {
            acl: AclList::defaults(),
            modules: ModuleToggle::defaults(),
            msrp: MsrpSettings::default(),
            speex: speex::default_properties(),
            conference: ConferenceSettings::default(),
            engine: EngineSettings::default(),
        }
    }

    /// Parse a JSON profile
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Read and parse a JSON profile file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        acl::validate_lists(&self.acl)?;
        modules::validate_modules(&self.modules)?;
        self.msrp.validate()?;
        self.conference.validate()?;
        self.engine.validate()?;

        if self.speex.iter().any(|param| param.name.trim().is_empty()) {
            return Err(Error::config("Speex parameter name cannot be empty"));
        }

        Ok(())
    }
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Capacity of the engine event channel
    ///
    /// When full, new engine events are dropped (with a warning log).
    ///
    /// Default: 1000 events
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Whether dialplan lookups are answered
    ///
    /// When disabled, dialplan lookups get the bare envelope.
    #[serde(default = "default_dialplan_enabled")]
    pub dialplan_enabled: bool,
}

impl EngineSettings {
    /// Validate the engine settings
    pub fn validate(&self) -> Result<()> {
        if self.event_channel_capacity == 0 {
            return Err(Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
            dialplan_enabled: default_dialplan_enabled(),
        }
    }
}

fn default_event_channel_capacity() -> usize {
    1000
}

fn default_dialplan_enabled() -> bool {
    true
}
