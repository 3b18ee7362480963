// # Config Provider Trait
//
// Defines the interface for a single configuration section.
//
// ## Implementations
//
// - `acl.conf`, `modules.conf`, `msrp.conf`, `speex.conf`,
//   `timezones.conf`, `conference.conf`: see the `providers` module
//
// ## Usage
//
// ```rust,ignore
// use switchconf_core::{ConfigProvider, Document};
//
// let mut provider = /* ConfigProvider implementation */;
// provider.generate_defaults();
//
// let mut document = Document::envelope(provider.key(), "description");
// provider.render(document.configuration_mut())?;
// ```

use crate::document::Element;
use crate::error::{Error, Result};

/// Trait for configuration section providers
///
/// A provider owns the typed model of one section and knows how to turn it
/// into XML content under the `<configuration>` node.
///
/// # Lifecycle
///
/// 1. Constructed from a `SwitchConfig` section (or via `generate_defaults()`)
/// 2. Registered once in the `ProviderRegistry`
/// 3. Rendered on every lookup; the registry never mutates it afterwards
///
/// # Thread Safety
///
/// Renders may run concurrently from several host threads, so `render()`
/// takes `&self` and must not rely on interior mutation of shared state.
pub trait ConfigProvider: Send + Sync {
    /// Section key this provider answers for (e.g. "acl.conf")
    fn key(&self) -> &'static str;

    /// Replace the in-memory model with the stock defaults
    ///
    /// Always replaces, never appends, so repeated calls are safe.
    fn generate_defaults(&mut self);

    /// Append this section's content under `parent`
    ///
    /// The default implementation reports that the section has no document
    /// logic, which the generator surfaces as [`Error::NotImplemented`].
    fn render(&self, parent: &mut Element) -> Result<()> {
        let _ = parent;
        Err(Error::not_implemented(self.key()))
    }
}
