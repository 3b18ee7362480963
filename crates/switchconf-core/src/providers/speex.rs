// # Speex Provider
//
// Renders `speex.conf`: a single `default` settings block of codec
// properties, in table order.

use crate::document::Element;
use crate::error::Result;
use crate::providers::Param;
use crate::traits::ConfigProvider;

/// Section key served by this provider
pub const SPEEX_KEY: &str = "speex.conf";

const DEFAULT_PROPERTIES: &[(&str, &str)] = &[
    ("quality", "5"),
    ("complexity", "5"),
    ("enhancement", "true"),
    ("vad", "false"),
    ("vbr", "false"),
    ("vbr-quality", "4.0"),
    ("abr", "0"),
    ("dtx", "false"),
    ("preproc", "false"),
    ("pp-vad", "false"),
    ("pp-agc", "false"),
    ("pp-agc-level", "8000.0"),
    ("pp-denoise", "false"),
    ("pp-dereverb", "false"),
];

/// Stock Speex codec properties
pub fn default_properties() -> Vec<Param> {
    DEFAULT_PROPERTIES
        .iter()
        .map(|(name, value)| Param::new(*name, value))
        .collect()
}

/// Provider for `speex.conf`
#[derive(Debug, Clone, Default)]
pub struct SpeexProvider {
    properties: Vec<Param>,
}

impl SpeexProvider {
    /// Create a provider from explicit properties
    pub fn new(properties: Vec<Param>) -> Self {
        Self { properties }
    }

    /// Current properties
    pub fn properties(&self) -> &[Param] {
        &self.properties
    }
}

impl ConfigProvider for SpeexProvider {
    fn key(&self) -> &'static str {
        SPEEX_KEY
    }

    fn generate_defaults(&mut self) {
        self.properties = default_properties();
    }

    fn render(&self, parent: &mut Element) -> Result<()> {
        let root = parent.push(Element::new("settings").attr("name", "default"));
        for property in &self.properties {
            root.push(property.to_element());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults_in_order() {
        let mut provider = SpeexProvider::default();
        provider.generate_defaults();

        let mut parent = Element::new("configuration");
        provider.render(&mut parent).unwrap();

        let settings = parent.find("settings").unwrap();
        assert_eq!(settings.attribute("name"), Some("default"));
        assert_eq!(settings.children().len(), DEFAULT_PROPERTIES.len());

        let first = &settings.children()[0];
        assert_eq!(first.attribute("name"), Some("quality"));
        assert_eq!(first.attribute("value"), Some("5"));

        let last = settings.children().last().unwrap();
        assert_eq!(last.attribute("name"), Some("pp-dereverb"));
    }
}
