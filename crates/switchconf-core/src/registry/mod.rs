//! Section-key provider registry and document generator
//!
//! The registry maps a section key (`acl.conf`, `modules.conf`, ...) to the
//! [`ConfigProvider`] that renders it, avoiding a hardcoded match on the key.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use switchconf_core::registry::{DocumentGenerator, ProviderRegistry, Section};
//! use switchconf_core::providers::AclProvider;
//!
//! let registry = ProviderRegistry::new();
//! registry.register(Box::new(AclProvider::new(lists)));
//!
//! let generator = DocumentGenerator::new(registry);
//! let document = generator.create_document(Section::Configuration, "acl.conf", "Network Lists")?;
//! println!("{}", document.to_xml()?);
//! ```

use crate::document::{Document, Element};
use crate::error::{Error, Result};
use crate::traits::ConfigProvider;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Which host search binding asked for the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Configuration section lookups
    Configuration,
    /// Dialplan section lookups
    Dialplan,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Configuration => f.write_str("configuration"),
            Section::Dialplan => f.write_str("dialplan"),
        }
    }
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "configuration" | "config" => Ok(Section::Configuration),
            "dialplan" => Ok(Section::Dialplan),
            other => Err(Error::invalid_input(format!("unknown section: {}", other))),
        }
    }
}

/// Provider registry keyed by section key
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// renders and exclusive registration. Providers are shared as `Arc` so a
/// render never holds the lock.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Arc<dyn ConfigProvider>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own key
    ///
    /// A provider registered under an existing key replaces the previous one.
    pub fn register(&self, provider: Box<dyn ConfigProvider>) {
        let key = provider.key().to_string();
        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        providers.insert(key, Arc::from(provider));
    }

    /// Look up the provider for a key
    pub fn get(&self, key: &str) -> Option<Arc<dyn ConfigProvider>> {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.get(key).cloned()
    }

    /// Render the section for `key` under `parent`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Content appended
    /// - `Err(Error::NotFound)`: No provider for this key
    /// - `Err(Error::NotImplemented)`: Provider has no document logic
    pub fn render(&self, key: &str, parent: &mut Element) -> Result<()> {
        let provider = self.get(key).ok_or_else(|| Error::not_found(key))?;
        provider.render(parent)
    }

    /// Whether a key is registered
    pub fn has_provider(&self, key: &str) -> bool {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.contains_key(key)
    }

    /// All registered keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = providers.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Builds envelopes and delegates their content to the registry
#[derive(Debug, Default)]
pub struct DocumentGenerator {
    registry: ProviderRegistry,
}

impl DocumentGenerator {
    /// Create a generator over a populated registry
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Generate the document for `module_key`
    ///
    /// The envelope's section attribute is always `configuration`, whichever
    /// binding made the request. An unknown key yields the bare envelope.
    ///
    /// # Returns
    ///
    /// - `Ok(Document)`: Envelope with the provider's content (possibly empty)
    /// - `Err(Error::NotImplemented)`: The provider has no document logic
    pub fn create_document(
        &self,
        section: Section,
        module_key: &str,
        description: &str,
    ) -> Result<Document> {
        debug!("Asking for {} document for {}", section, module_key);

        let mut document = Document::envelope(module_key, description);
        match self.registry.render(module_key, document.configuration_mut()) {
            Ok(()) => Ok(document),
            Err(Error::NotFound(_)) => {
                debug!("No configuration known for {}, returning empty envelope", module_key);
                Ok(document)
            }
            Err(e) => Err(e),
        }
    }
}
