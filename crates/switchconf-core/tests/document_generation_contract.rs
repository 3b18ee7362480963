//! Contract Test: Document Generation
//!
//! This test verifies the documents handed back to the host.
//!
//! Constraints verified:
//! - Every lookup is wrapped in the same document/section/configuration envelope
//! - ACL lists render as contiguous CIDR nodes in declaration order
//! - The modules table renders only the modules requested at startup
//! - Unknown section keys get an empty envelope rather than an error
//! - Dialplan lookups share the configuration envelope
//!
//! If this test fails, someone has changed:
//! - The envelope shape the host parses
//! - The order or format of rendered nodes
//! - The unknown-key fallback

mod common;

use common::*;
use std::sync::Arc;
use switchconf_core::providers::{AclList, AclNode, ModuleToggle, MsrpSettings, Permission};
use switchconf_core::{ConfigEngine, EngineEvent, Error, LookupRequest, Section, SwitchConfig};

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>";

#[test]
fn acl_list_renders_cidr_nodes_in_order() {
    let lan = AclList::new("lan", Permission::Allow)
        .with_node(AclNode::from_cidr(Permission::Deny, "192.168.42.0/24").unwrap())
        .with_node(AclNode::from_cidr(Permission::Allow, "192.168.42.42/32").unwrap());
    let config = SwitchConfig {
        acl: vec![lan],
        ..SwitchConfig::default()
    };
    let (engine, _rx) = engine_with(config);

    let document = engine
        .create_document(&LookupRequest::configuration("acl.conf", "Network Lists"))
        .unwrap();

    let list = document
        .configuration()
        .find("network-lists")
        .and_then(|lists| lists.find("list"))
        .expect("one list rendered");
    assert_eq!(list.attribute("name"), Some("lan"));
    assert_eq!(list.attribute("default"), Some("allow"));

    let nodes: Vec<_> = list.children_named("node").collect();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].attribute("type"), Some("deny"));
    assert_eq!(nodes[0].attribute("cidr"), Some("192.168.42.0/24"));
    assert_eq!(nodes[1].attribute("type"), Some("allow"));
    assert_eq!(nodes[1].attribute("cidr"), Some("192.168.42.42/32"));
}

#[test]
fn stock_acl_serializes_inside_envelope() {
    let (engine, _rx) = default_engine();

    let xml = engine.config_lookup("acl.conf", "Network Lists").unwrap();

    assert_eq!(
        xml,
        format!(
            "{DECLARATION}<document type=\"freeswitch/xml\">\
             <section name=\"configuration\">\
             <configuration name=\"acl.conf\" description=\"Network Lists\">\
             <network-lists><list name=\"lan\" default=\"allow\">\
             <node type=\"deny\" cidr=\"192.168.42.0/24\"/>\
             <node type=\"allow\" cidr=\"192.168.42.42/32\"/>\
             </list></network-lists>\
             </configuration></section></document>"
        )
    );
}

#[test]
fn modules_table_renders_only_enabled_entries() {
    let names = [
        "mod_console",
        "mod_graylog2",
        "mod_logfile",
        "mod_syslog",
        "mod_yaml",
        "mod_enum",
        "mod_xml_rpc",
        "mod_xml_curl",
        "mod_xml_cdr",
        "mod_sofia",
    ];
    let modules = names
        .iter()
        .map(|name| ModuleToggle::new(*name, *name == "mod_console" || *name == "mod_logfile"))
        .collect();
    let config = SwitchConfig {
        modules,
        ..SwitchConfig::default()
    };
    let (engine, _rx) = engine_with(config);

    let document = engine
        .create_document(&LookupRequest::configuration("modules.conf", "Modules"))
        .unwrap();

    let loads: Vec<_> = document
        .configuration()
        .find("modules")
        .unwrap()
        .children()
        .iter()
        .map(|load| (load.name(), load.attribute("module")))
        .collect();
    assert_eq!(
        loads,
        vec![
            ("load", Some("mod_console")),
            ("load", Some("mod_logfile")),
        ]
    );
}

#[test]
fn unknown_key_returns_empty_configuration() {
    let (engine, mut rx) = default_engine();

    let xml = engine.config_lookup("nonexistent.conf", "Nothing here").unwrap();

    assert_eq!(
        xml,
        format!(
            "{DECLARATION}<document type=\"freeswitch/xml\">\
             <section name=\"configuration\">\
             <configuration name=\"nonexistent.conf\" description=\"Nothing here\"/>\
             </section></document>"
        )
    );
    assert!(matches!(
        drain(&mut rx).as_slice(),
        [EngineEvent::DocumentServed { .. }]
    ));
}

#[test]
fn dialplan_lookup_shares_configuration_envelope() {
    let (engine, _rx) = default_engine();

    let dialplan = engine.dialplan_lookup("speex.conf", "Speex").unwrap();
    let configuration = engine.config_lookup("speex.conf", "Speex").unwrap();

    assert_eq!(dialplan, configuration);
    assert!(dialplan.contains("<section name=\"configuration\">"));
}

#[test]
fn disabled_dialplan_gets_bare_envelope() {
    let mut config = SwitchConfig::default();
    config.engine.dialplan_enabled = false;
    let (engine, _rx) = engine_with(config);

    let document = engine
        .create_document(&LookupRequest::dialplan("speex.conf", "Speex"))
        .unwrap();
    assert!(document.configuration().children().is_empty());

    let document = engine
        .create_document(&LookupRequest::configuration("speex.conf", "Speex"))
        .unwrap();
    assert_eq!(document.configuration().children().len(), 1);
}

#[test]
fn disabled_msrp_renders_empty_settings() {
    let config = SwitchConfig {
        msrp: MsrpSettings {
            enabled: false,
            ..MsrpSettings::default()
        },
        ..SwitchConfig::default()
    };
    let (engine, _rx) = engine_with(config);

    let xml = engine.config_lookup("msrp.conf", "MSRP").unwrap();
    assert!(xml.contains("<configuration name=\"msrp.conf\" description=\"MSRP\"><settings/>"));
}

#[test]
fn timezones_render_from_catalog() {
    let (engine, _rx) = default_engine();

    let document = engine
        .create_document(&LookupRequest::configuration("timezones.conf", "Timezones"))
        .unwrap();

    let zones: Vec<_> = document
        .configuration()
        .find("timezones")
        .unwrap()
        .children()
        .iter()
        .map(|zone| (zone.attribute("name"), zone.attribute("value")))
        .collect();
    assert_eq!(
        zones,
        vec![
            (Some("UTC"), Some("UTC0")),
            (Some("Europe/Paris"), Some("UTC1")),
            (Some("Asia/Kolkata"), Some("UTC5")),
            (Some("America/Los_Angeles"), Some("UTC-8")),
        ]
    );
}

#[test]
fn timezone_catalog_is_read_per_render_only() {
    let catalog = Arc::new(FixedCatalog::new());
    let (engine, _rx) = ConfigEngine::with_catalog(SwitchConfig::default(), catalog.clone())
        .expect("engine construction succeeds");

    assert_eq!(catalog.call_count(), 0);

    engine.config_lookup("timezones.conf", "Timezones").unwrap();
    engine.config_lookup("timezones.conf", "Timezones").unwrap();
    assert_eq!(catalog.call_count(), 2);

    engine.config_lookup("acl.conf", "Network Lists").unwrap();
    assert_eq!(catalog.call_count(), 2);
}

#[test]
fn illegal_characters_are_rejected_at_lookup() {
    let (engine, mut rx) = default_engine();

    let result = engine.config_lookup("nope.conf", "bad\u{1}desc");
    assert!(matches!(result, Err(Error::InvalidInput(_))));

    let result = engine.dialplan_lookup("acl\u{FFFF}.conf", "ACL");
    assert!(matches!(result, Err(Error::InvalidInput(_))));

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(events
        .iter()
        .all(|event| matches!(event, EngineEvent::DocumentFailed { .. })));

    // Markup characters are escaped rather than rejected
    let xml = engine.config_lookup("nope.conf", "tabs\tand <tags>").unwrap();
    assert!(xml.contains("description=\"tabs\tand &lt;tags&gt;\""));
}

#[test]
fn every_registered_section_renders() {
    let (engine, _rx) = default_engine();

    for key in engine.registry().keys() {
        let document = engine
            .create_document(&LookupRequest::configuration(key.as_str(), "all"))
            .unwrap();
        assert!(
            !document.configuration().children().is_empty(),
            "{} rendered no content",
            key
        );
    }
}

#[test]
fn section_names_parse() {
    assert_eq!("config".parse::<Section>().unwrap(), Section::Configuration);
    assert!(matches!(
        "directory".parse::<Section>(),
        Err(Error::InvalidInput(_))
    ));
}
