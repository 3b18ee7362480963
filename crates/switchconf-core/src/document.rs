//! Declarative XML document model
//!
//! Providers describe their content as a tree of [`Element`] values; the
//! tree is only turned into markup at the very end by [`Document::to_xml`],
//! so rendering logic never touches a writer or a DOM API.
//!
//! Every generated document shares the same envelope:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8" standalone="no"?>
//! <document type="freeswitch/xml">
//!   <section name="configuration">
//!     <configuration name="{module_key}" description="{description}">
//!       ... provider content ...
//!     </configuration>
//!   </section>
//! </document>
//! ```

use crate::error::{Error, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

/// Value of the `type` attribute on the root element
pub const DOCUMENT_TYPE: &str = "freeswitch/xml";

/// Value of the `name` attribute on the section element
///
/// Fixed for every entry point, including dialplan lookups.
pub const SECTION_NAME: &str = "configuration";

/// A single XML element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute (builder style)
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push((name.into(), value.to_string()));
        self
    }

    /// Add a child element (builder style)
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child and return a mutable reference to it
    pub fn push(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All attributes in insertion order
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// All children in insertion order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First child with the given name
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            validate_text(value)
                .map_err(|e| Error::invalid_input(format!("<{} {}>: {}", self.name, key, e)))?;
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            write_event(writer, Event::Empty(start))?;
            return Ok(());
        }

        write_event(writer, Event::Start(start))?;
        for child in &self.children {
            child.write_to(writer)?;
        }
        write_event(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }
}

/// Reject text that cannot appear in an XML 1.0 document
///
/// Markup characters are escaped on output; control characters other than
/// tab, line feed and carriage return (and U+FFFE, U+FFFF) cannot be
/// represented at all.
pub fn validate_text(value: &str) -> Result<()> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(Error::invalid_input(format!(
            "character U+{:04X} is not allowed in XML",
            u32::from(c)
        ))),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// A generated configuration document
///
/// Only the `<configuration>` node is mutable; the outer envelope is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    configuration: Element,
}

impl Document {
    /// Build the common envelope for a module key
    pub fn envelope(module_key: &str, description: &str) -> Self {
        Self {
            configuration: Element::new("configuration")
                .attr("name", module_key)
                .attr("description", description),
        }
    }

    /// The `<configuration>` node
    pub fn configuration(&self) -> &Element {
        &self.configuration
    }

    /// Mutable access to the `<configuration>` node, for providers
    pub fn configuration_mut(&mut self) -> &mut Element {
        &mut self.configuration
    }

    /// Materialize the whole tree, envelope included
    pub fn root(&self) -> Element {
        Element::new("document")
            .attr("type", DOCUMENT_TYPE)
            .child(
                Element::new("section")
                    .attr("name", SECTION_NAME)
                    .child(self.configuration.clone()),
            )
    }

    /// Serialize to an XML string with a UTF-8 declaration
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());

        write_event(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))),
        )?;

        let mut document = BytesStart::new("document");
        document.push_attribute(("type", DOCUMENT_TYPE));
        write_event(&mut writer, Event::Start(document))?;

        let mut section = BytesStart::new("section");
        section.push_attribute(("name", SECTION_NAME));
        write_event(&mut writer, Event::Start(section))?;

        self.configuration.write_to(&mut writer)?;

        write_event(&mut writer, Event::End(BytesEnd::new("section")))?;
        write_event(&mut writer, Event::End(BytesEnd::new("document")))?;

        String::from_utf8(writer.into_inner()).map_err(|e| Error::render(e.to_string()))
    }
}

fn write_event<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_envelope_serialization() {
        let document = Document::envelope("acl.conf", "Network Lists");
        let xml = document.to_xml().unwrap();

        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\
             <document type=\"freeswitch/xml\">\
             <section name=\"configuration\">\
             <configuration name=\"acl.conf\" description=\"Network Lists\"/>\
             </section>\
             </document>"
        );
    }

    #[test]
    fn test_nested_content_and_escaping() {
        let mut document = Document::envelope("speex.conf", "a \"quoted\" <desc>");
        document
            .configuration_mut()
            .push(Element::new("settings").attr("name", "default"))
            .push(Element::new("param").attr("name", "quality").attr("value", 5));

        let xml = document.to_xml().unwrap();
        assert!(xml.contains("description=\"a &quot;quoted&quot; &lt;desc&gt;\""));
        assert!(xml.contains(
            "<settings name=\"default\"><param name=\"quality\" value=\"5\"/></settings>"
        ));
    }

    #[test]
    fn test_illegal_characters_are_rejected() {
        let document = Document::envelope("nope.conf", "bad\u{1}desc");
        assert!(matches!(document.to_xml(), Err(Error::InvalidInput(_))));

        let mut document = Document::envelope("speex.conf", "Speex");
        document
            .configuration_mut()
            .push(Element::new("param").attr("value", "\u{FFFE}"));
        assert!(matches!(document.to_xml(), Err(Error::InvalidInput(_))));

        assert!(validate_text("tab\there\r\nand 日本語 \u{1F600}").is_ok());
        assert!(validate_text("nul\0").is_err());
    }

    #[test]
    fn test_root_tree_shape() {
        let document = Document::envelope("modules.conf", "Modules");
        let root = document.root();

        assert_eq!(root.name(), "document");
        assert_eq!(root.attribute("type"), Some(DOCUMENT_TYPE));
        let section = root.find("section").unwrap();
        assert_eq!(section.attribute("name"), Some("configuration"));
        let configuration = section.find("configuration").unwrap();
        assert_eq!(configuration.attribute("name"), Some("modules.conf"));
        assert!(configuration.children().is_empty());
    }
}
