// # Modules Provider
//
// Renders `modules.conf`: the ordered list of modules the host loads at
// startup. Only enabled entries are emitted; disabled ones are left out
// entirely rather than rendered as disabled.

use crate::document::Element;
use crate::error::{Error, Result};
use crate::traits::ConfigProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Section key served by this provider
pub const MODULES_KEY: &str = "modules.conf";

/// Stock module table, in load order
const DEFAULT_MODULES: &[(&str, bool)] = &[
    ("mod_console", true),
    ("mod_graylog2", false),
    ("mod_logfile", true),
    ("mod_syslog", false),
    ("mod_yaml", false),
    ("mod_enum", false),
    ("mod_xml_rpc", false),
    ("mod_xml_curl", false),
    ("mod_xml_cdr", false),
    ("mod_xml_radius", false),
    ("mod_xml_scgi", false),
    ("mod_amqp", false),
    ("mod_cdr_csv", false),
    ("mod_cdr_sqlite", false),
    ("mod_event_multicast", false),
    ("mod_event_socket", true),
    ("mod_event_zmq", false),
    ("mod_zeroconf", false),
    ("mod_erlang_event", false),
    ("mod_smpp", false),
    ("mod_snmp", false),
    ("mod_ldap", false),
    ("mod_dingaling", false),
    ("mod_portaudio", true),
    ("mod_sofia", true),
    ("mod_loopback", true),
    ("mod_woomera", false),
    ("mod_freetdm", false),
    ("mod_unicall", false),
    ("mod_skinny", false),
    ("mod_khomp", false),
    ("mod_rtc", false),
    ("mod_rtmp", false),
    ("mod_verto", true),
    ("mod_signalwire", false),
    ("mod_commands", true),
    ("mod_conference", true),
    ("mod_curl", false),
    ("mod_db", false),
    ("mod_dptools", false),
    ("mod_expr", false),
    ("mod_fifo", false),
    ("mod_hash", false),
    ("mod_mongo", false),
    ("mod_voicemail", false),
    ("mod_directory", false),
    ("mod_distributor", true),
    ("mod_lcr", false),
    ("mod_easyroute", false),
    ("mod_esf", false),
    ("mod_fsv", false),
    ("mod_valet_parking", false),
    ("mod_fsk", false),
    ("mod_spy", false),
    ("mod_sms", false),
    ("mod_sms_flowroute", false),
    ("mod_random", false),
    ("mod_httapi", false),
    ("mod_translate", false),
    ("mod_snom", false),
    ("mod_dialplan_directory", false),
    ("mod_dialplan_xml", true),
    ("mod_dialplan_asterisk", false),
    ("mod_spandsp", false),
    ("mod_g723_1", false),
    ("mod_g729", false),
    ("mod_amr", false),
    ("mod_ilbc", false),
    ("mod_h26x", false),
    ("mod_b64", false),
    ("mod_siren", false),
    ("mod_isac", false),
    ("mod_opus", true),
    ("mod_av", false),
    ("mod_sndfile", false),
    ("mod_native_file", false),
    ("mod_opusfile", false),
    ("mod_png", false),
    ("mod_shout", false),
    ("mod_local_stream", false),
    ("mod_tone_stream", true),
    ("mod_timerfd", false),
    ("mod_v8", false),
    ("mod_perl", false),
    ("mod_python", false),
    ("mod_python3", false),
    ("mod_lua", false),
    ("mod_flite", false),
    ("mod_pocketsphinx", false),
    ("mod_cepstral", false),
    ("mod_tts_commandline", false),
    ("mod_rss", false),
    ("mod_say_en", true),
    ("mod_say_ru", false),
    ("mod_say_zh", false),
    ("mod_say_sv", false),
];

/// One row of the module table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleToggle {
    /// Module name (e.g. "mod_sofia")
    pub name: String,
    /// Whether the host should load it at startup
    pub load: bool,
}

impl ModuleToggle {
    /// Create a new table row
    pub fn new(name: impl Into<String>, load: bool) -> Self {
        Self {
            name: name.into(),
            load,
        }
    }

    /// Stock module table
    pub fn defaults() -> Vec<ModuleToggle> {
        DEFAULT_MODULES
            .iter()
            .map(|(name, load)| ModuleToggle::new(*name, *load))
            .collect()
    }
}

/// Reject empty or duplicated module names
pub fn validate_modules(modules: &[ModuleToggle]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for module in modules {
        if module.name.trim().is_empty() {
            return Err(Error::config("Module name cannot be empty"));
        }
        if !seen.insert(module.name.as_str()) {
            return Err(Error::config(format!("Duplicate module entry: {}", module.name)));
        }
    }
    Ok(())
}

/// Provider for `modules.conf`
#[derive(Debug, Clone, Default)]
pub struct ModulesProvider {
    modules: Vec<ModuleToggle>,
}

impl ModulesProvider {
    /// Create a provider from an explicit table
    pub fn new(modules: Vec<ModuleToggle>) -> Self {
        Self { modules }
    }

    /// Full table, enabled and disabled rows
    pub fn modules(&self) -> &[ModuleToggle] {
        &self.modules
    }

    /// Names of the modules requested at startup, in table order
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.modules
            .iter()
            .filter(|module| module.load)
            .map(|module| module.name.as_str())
    }
}

impl ConfigProvider for ModulesProvider {
    fn key(&self) -> &'static str {
        MODULES_KEY
    }

    fn generate_defaults(&mut self) {
        self.modules = ModuleToggle::defaults();
    }

    fn render(&self, parent: &mut Element) -> Result<()> {
        let root = parent.push(Element::new("modules"));
        for name in self.enabled() {
            root.push(Element::new("load").attr("module", name));
        }
        debug!("Rendered {} module load entries", root.children().len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_entry_table() -> Vec<ModuleToggle> {
        vec![
            ModuleToggle::new("mod_console", true),
            ModuleToggle::new("mod_graylog2", false),
            ModuleToggle::new("mod_logfile", true),
            ModuleToggle::new("mod_syslog", false),
            ModuleToggle::new("mod_yaml", false),
            ModuleToggle::new("mod_enum", false),
            ModuleToggle::new("mod_xml_rpc", false),
            ModuleToggle::new("mod_xml_curl", false),
            ModuleToggle::new("mod_xml_cdr", false),
            ModuleToggle::new("mod_xml_radius", false),
        ]
    }

    #[test]
    fn test_render_only_enabled_modules() {
        let provider = ModulesProvider::new(ten_entry_table());

        let mut parent = Element::new("configuration");
        provider.render(&mut parent).unwrap();

        let modules = parent.find("modules").unwrap();
        let loads: Vec<_> = modules
            .children_named("load")
            .filter_map(|load| load.attribute("module"))
            .collect();
        assert_eq!(loads, vec!["mod_console", "mod_logfile"]);
        assert_eq!(modules.children().len(), 2);
    }

    #[test]
    fn test_defaults_keep_table_order() {
        let mut provider = ModulesProvider::default();
        provider.generate_defaults();

        assert_eq!(provider.modules().len(), DEFAULT_MODULES.len());
        let enabled: Vec<_> = provider.enabled().take(3).collect();
        assert_eq!(enabled, vec!["mod_console", "mod_logfile", "mod_event_socket"]);
        assert!(provider.enabled().any(|name| name == "mod_sofia"));
        assert!(validate_modules(provider.modules()).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let table = vec![
            ModuleToggle::new("mod_sofia", true),
            ModuleToggle::new("mod_sofia", false),
        ];
        assert!(validate_modules(&table).is_err());
        assert!(validate_modules(&[ModuleToggle::new(" ", true)]).is_err());
    }
}
