// # MSRP Provider
//
// Renders `msrp.conf`: listener and TLS settings for the message session
// relay transport. When the feature is disabled the `<settings>` element is
// still emitted, just without parameters.

use crate::document::Element;
use crate::error::{Error, Result};
use crate::providers::param_element;
use crate::traits::ConfigProvider;
use serde::{Deserialize, Serialize};

/// Section key served by this provider
pub const MSRP_KEY: &str = "msrp.conf";

/// MSRP transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsrpSettings {
    /// Whether MSRP parameters are emitted at all
    pub enabled: bool,
    /// Address to listen on
    pub listen_ip: String,
    /// Plain TCP port
    pub listen_port: u16,
    /// TLS port
    pub listen_ssl_port: u16,
    /// Message buffer size
    pub message_buffer_size: u32,
    /// Verbose protocol tracing in the host
    pub debug: bool,
    /// TLS certificate path
    pub secure_cert: String,
    /// TLS key path
    pub secure_key: String,
}

impl Default for MsrpSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            listen_ip: "$${local_ip_v4}".to_string(),
            listen_port: 2855,
            listen_ssl_port: 2856,
            message_buffer_size: 50,
            debug: false,
            secure_cert: "$${certs_dir}/wss.pem".to_string(),
            secure_key: "$${certs_dir}/wss.pem".to_string(),
        }
    }
}

impl MsrpSettings {
    /// Validate port numbers
    pub fn validate(&self) -> Result<()> {
        if self.listen_port == 0 || self.listen_ssl_port == 0 {
            return Err(Error::config("MSRP listen ports must be > 0"));
        }
        Ok(())
    }

    fn params(&self) -> [(&'static str, String); 7] {
        [
            ("listen-ip", self.listen_ip.clone()),
            ("listen-port", self.listen_port.to_string()),
            ("listen-ssl-port", self.listen_ssl_port.to_string()),
            ("message-buffer-size", self.message_buffer_size.to_string()),
            ("debug", self.debug.to_string()),
            ("secure-cert", self.secure_cert.clone()),
            ("secure-key", self.secure_key.clone()),
        ]
    }
}

/// Provider for `msrp.conf`
#[derive(Debug, Clone, Default)]
pub struct MsrpProvider {
    settings: MsrpSettings,
}

impl MsrpProvider {
    /// Create a provider from explicit settings
    pub fn new(settings: MsrpSettings) -> Self {
        Self { settings }
    }

    /// Current settings
    pub fn settings(&self) -> &MsrpSettings {
        &self.settings
    }
}

impl ConfigProvider for MsrpProvider {
    fn key(&self) -> &'static str {
        MSRP_KEY
    }

    fn generate_defaults(&mut self) {
        self.settings = MsrpSettings::default();
    }

    fn render(&self, parent: &mut Element) -> Result<()> {
        let root = parent.push(Element::new("settings"));
        if self.settings.enabled {
            for (name, value) in self.settings.params() {
                root.push(param_element(name, value));
            }
        }
        Ok(())
    }
}
