// # ACL Provider
//
// Renders `acl.conf`: named network lists with ordered allow/deny nodes.
//
// ```xml
// <network-lists>
//   <list name="lan" default="allow">
//     <node type="deny" cidr="192.168.42.0/24"/>
//     <node type="allow" cidr="192.168.42.42/32"/>
//   </list>
// </network-lists>
// ```

use crate::cidr;
use crate::document::Element;
use crate::error::{Error, Result};
use crate::traits::ConfigProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use tracing::debug;

/// Section key served by this provider
pub const ACL_KEY: &str = "acl.conf";

/// Allow or deny
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Traffic matching the rule is allowed
    Allow,
    /// Traffic matching the rule is denied
    Deny,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Allow => f.write_str("allow"),
            Permission::Deny => f.write_str("deny"),
        }
    }
}

/// A single rule inside an ACL list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclNode {
    /// Rule type
    #[serde(rename = "type")]
    pub permission: Permission,
    /// Network address
    pub address: Ipv4Addr,
    /// Subnet mask
    pub mask: Ipv4Addr,
}

impl AclNode {
    /// Create a node from an address and a subnet mask
    pub fn new(permission: Permission, address: Ipv4Addr, mask: Ipv4Addr) -> Self {
        Self {
            permission,
            address,
            mask,
        }
    }

    /// Create a node from `address/prefix` notation
    pub fn from_cidr(permission: Permission, cidr: &str) -> Result<Self> {
        let (address, mask) = cidr::parse_cidr(cidr)?;
        Ok(Self::new(permission, address, mask))
    }

    /// The node in `address/prefix` notation
    pub fn cidr(&self) -> String {
        cidr::to_cidr_string(self.address, self.mask)
    }

    /// Reject masks that are not contiguous
    pub fn validate(&self) -> Result<()> {
        cidr::validate_mask(self.mask).map(|_| ())
    }

    fn to_element(&self) -> Element {
        Element::new("node")
            .attr("type", self.permission)
            .attr("cidr", self.cidr())
    }
}

/// A named ACL list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclList {
    /// List name, unique across the section
    pub name: String,
    /// Permission applied when no node matches
    pub default: Permission,
    /// Rules in evaluation order
    #[serde(default)]
    pub nodes: Vec<AclNode>,
}

impl AclList {
    /// Create an empty list
    pub fn new(name: impl Into<String>, default: Permission) -> Self {
        Self {
            name: name.into(),
            default,
            nodes: Vec::new(),
        }
    }

    /// Append a node
    pub fn with_node(mut self, node: AclNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Stock ACL lists
    pub fn defaults() -> Vec<AclList> {
        vec![
            AclList::new("lan", Permission::Allow)
                .with_node(AclNode::new(
                    Permission::Deny,
                    Ipv4Addr::new(192, 168, 42, 0),
                    Ipv4Addr::new(255, 255, 255, 0),
                ))
                .with_node(AclNode::new(
                    Permission::Allow,
                    Ipv4Addr::new(192, 168, 42, 42),
                    Ipv4Addr::new(255, 255, 255, 255),
                )),
        ]
    }

    fn to_element(&self) -> Element {
        self.nodes.iter().fold(
            Element::new("list")
                .attr("name", &self.name)
                .attr("default", self.default),
            |list, node| list.child(node.to_element()),
        )
    }
}

/// Validate a set of lists: non-empty unique names, contiguous masks
pub fn validate_lists(lists: &[AclList]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for list in lists {
        if list.name.trim().is_empty() {
            return Err(Error::config("ACL list name cannot be empty"));
        }
        if !seen.insert(list.name.as_str()) {
            return Err(Error::config(format!("Duplicate ACL list name: {}", list.name)));
        }
        for node in &list.nodes {
            node.validate()
                .map_err(|e| Error::config(format!("ACL list {}: {}", list.name, e)))?;
        }
    }
    Ok(())
}

/// Provider for `acl.conf`
#[derive(Debug, Clone, Default)]
pub struct AclProvider {
    lists: Vec<AclList>,
}

impl AclProvider {
    /// Create a provider from explicit lists
    pub fn new(lists: Vec<AclList>) -> Self {
        Self { lists }
    }

    /// Current lists
    pub fn lists(&self) -> &[AclList] {
        &self.lists
    }
}

impl ConfigProvider for AclProvider {
    fn key(&self) -> &'static str {
        ACL_KEY
    }

    fn generate_defaults(&mut self) {
        self.lists = AclList::defaults();
    }

    fn render(&self, parent: &mut Element) -> Result<()> {
        debug!("Rendering {} ACL list(s)", self.lists.len());
        let root = parent.push(Element::new("network-lists"));
        for list in &self.lists {
            root.push(list.to_element());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_defaults_replaces() {
        let mut provider = AclProvider::default();
        provider.generate_defaults();
        provider.generate_defaults();

        assert_eq!(provider.lists().len(), 1);
        assert_eq!(provider.lists()[0].nodes.len(), 2);
    }

    #[test]
    fn test_render_default_lan_list() {
        let mut provider = AclProvider::default();
        provider.generate_defaults();

        let mut parent = Element::new("configuration");
        provider.render(&mut parent).unwrap();

        let lists = parent.find("network-lists").unwrap();
        let list = lists.find("list").unwrap();
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
    fn test_list_default_reflects_configuration() {
        let provider = AclProvider::new(vec![AclList::new("blocked", Permission::Deny)]);

        let mut parent = Element::new("configuration");
        provider.render(&mut parent).unwrap();

        let list = parent.find("network-lists").and_then(|l| l.find("list")).unwrap();
        assert_eq!(list.attribute("default"), Some("deny"));
        assert!(list.children().is_empty());
    }

    #[test]
    fn test_validate_lists() {
        assert!(validate_lists(&AclList::defaults()).is_ok());

        let duplicate = vec![
            AclList::new("lan", Permission::Allow),
            AclList::new("lan", Permission::Deny),
        ];
        assert!(matches!(validate_lists(&duplicate), Err(Error::Config(_))));

        let bad_mask = vec![AclList::new("odd", Permission::Allow).with_node(AclNode::new(
            Permission::Allow,
            Ipv4Addr::new(10, 0, 0, 0),
            Ipv4Addr::new(0, 255, 0, 0),
        ))];
        assert!(validate_lists(&bad_mask).is_err());
    }

    #[test]
    fn test_node_from_cidr() {
        let node = AclNode::from_cidr(Permission::Deny, "172.16.0.0/12").unwrap();
        assert_eq!(node.mask, Ipv4Addr::new(255, 240, 0, 0));
        assert_eq!(node.cidr(), "172.16.0.0/12");
        assert!(AclNode::from_cidr(Permission::Deny, "172.16.0.0/33").is_err());
    }
}
