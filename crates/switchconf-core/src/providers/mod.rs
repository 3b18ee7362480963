//! Configuration section providers
//!
//! Each submodule holds the typed model of one section together with the
//! [`ConfigProvider`](crate::traits::ConfigProvider) implementation that
//! renders it.

pub mod acl;
pub mod conference;
pub mod modules;
pub mod msrp;
pub mod speex;
pub mod timezones;

pub use acl::{AclList, AclNode, AclProvider, Permission};
pub use conference::{
    AdvertisedRoom, CallerControl, CallerControlGroup, ConferenceProfile, ConferenceProvider,
    ConferenceSettings,
};
pub use modules::{ModuleToggle, ModulesProvider};
pub use msrp::{MsrpProvider, MsrpSettings};
pub use speex::SpeexProvider;
pub use timezones::{TimezoneTable, TimezonesProvider};

use crate::document::Element;
use serde::{Deserialize, Serialize};

/// A generic `name`/`value` parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// Parameter value
    pub value: String,
}

impl Param {
    /// Create a new parameter
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }

    /// Render as `<param name="..." value="..."/>`
    pub fn to_element(&self) -> Element {
        param_element(&self.name, &self.value)
    }
}

/// Build a `<param name="..." value="..."/>` element
pub fn param_element(name: &str, value: impl ToString) -> Element {
    Element::new("param").attr("name", name).attr("value", value)
}
