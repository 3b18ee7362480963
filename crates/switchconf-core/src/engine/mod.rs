//! Core switchconf engine
//!
//! The ConfigEngine is responsible for:
//! - Building and registering every section provider from a `SwitchConfig`
//! - Answering configuration and dialplan lookups with rendered documents
//! - Routing lifecycle notifications to the module tracker
//! - Emitting engine events for monitoring
//!
//! ## Architecture
//!
//! ```text
//!   host lookup                         host notification
//!        │                                      │
//!        ▼                                      ▼
//! ┌──────────────────┐                ┌──────────────────┐
//! │ DocumentGenerator│                │ EventClassifier  │
//! └──────────────────┘                └──────────────────┘
//!        │                                      │
//!        ▼                                      ▼
//! ┌──────────────────┐                ┌──────────────────┐
//! │ ProviderRegistry │                │  ModuleTracker   │
//! └──────────────────┘                └──────────────────┘
//!        │                                      │
//!        └──────────────┬───────────────────────┘
//!                       ▼
//!                ┌─────────────┐
//!                │ EngineEvent │
//!                └─────────────┘
//! ```

use crate::config::{EngineSettings, SwitchConfig};
use crate::document::{self, Document};
use crate::error::Result;
use crate::events::{Disposition, EventClassifier, Notification};
use crate::providers::{
    AclProvider, ConferenceProvider, ModulesProvider, MsrpProvider, SpeexProvider,
    TimezonesProvider,
};
use crate::registry::{DocumentGenerator, ProviderRegistry, Section};
use crate::state::ModuleTracker;
use crate::traits::{SystemTimezoneCatalog, TimezoneCatalog};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error, info, trace, warn};

/// Events emitted by the ConfigEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Notification loop started
    Started {
        sections: usize,
        modules: usize,
    },

    /// A document was rendered for the host
    DocumentServed {
        section: Section,
        module_key: String,
        bytes: usize,
    },

    /// A lookup failed
    DocumentFailed {
        module_key: String,
        error: String,
    },

    /// The host reported a module state change
    ModuleStateChanged {
        name: String,
        loaded: bool,
    },

    /// The host asked for a configuration reload
    ReloadRequested,

    /// Notification loop stopped
    Stopped {
        reason: String,
    },
}

/// A configuration lookup as issued by a host search binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Binding that made the request
    pub section: Section,
    /// Section key, e.g. "acl.conf"
    pub module_key: String,
    /// Free-form description copied into the envelope
    pub description: String,
}

impl LookupRequest {
    /// A configuration-section lookup
    pub fn configuration(module_key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            section: Section::Configuration,
            module_key: module_key.into(),
            description: description.into(),
        }
    }

    /// A dialplan-section lookup
    pub fn dialplan(module_key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            section: Section::Dialplan,
            module_key: module_key.into(),
            description: description.into(),
        }
    }
}

/// Core switchconf engine
///
/// ## Lifecycle
///
/// 1. Create with [`ConfigEngine::new()`]
/// 2. Serve lookups with [`ConfigEngine::lookup()`] from any thread
/// 3. Feed notifications with [`ConfigEngine::handle_notification()`] or
///    drive them from a stream with [`ConfigEngine::run_with_shutdown()`]
///
/// ## Threading
///
/// Every method takes `&self`; the engine can be shared behind an `Arc`
/// between the host's lookup and event threads.
pub struct ConfigEngine {
    /// Envelope builder over the provider registry
    generator: DocumentGenerator,

    /// Module state, shared with the classifier
    tracker: ModuleTracker,

    /// Notification router
    classifier: EventClassifier,

    /// Engine settings
    settings: EngineSettings,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl ConfigEngine {
    /// Create an engine using the system time-zone catalog
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(config: SwitchConfig) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        Self::with_catalog(config, Arc::new(SystemTimezoneCatalog))
    }

    /// Create an engine over a specific time-zone catalog
    pub fn with_catalog(
        config: SwitchConfig,
        catalog: Arc<dyn TimezoneCatalog>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let SwitchConfig {
            acl,
            modules,
            msrp,
            speex,
            conference,
            engine: settings,
        } = config;

        let tracker = ModuleTracker::new();
        for module in &modules {
            tracker.register(&module.name, module.load);
        }

        let timezones = TimezonesProvider::new(catalog);

        let registry = ProviderRegistry::new();
        registry.register(Box::new(AclProvider::new(acl)));
        registry.register(Box::new(ModulesProvider::new(modules)));
        registry.register(Box::new(MsrpProvider::new(msrp)));
        registry.register(Box::new(SpeexProvider::new(speex)));
        registry.register(Box::new(timezones));
        registry.register(Box::new(ConferenceProvider::new(conference)));

        info!(
            "Engine configured: {} section(s), {} module(s)",
            registry.keys().len(),
            tracker.len()
        );

        let (tx, rx) = mpsc::channel(settings.event_channel_capacity);
        let engine = Self {
            generator: DocumentGenerator::new(registry),
            classifier: EventClassifier::new(tracker.clone()),
            tracker,
            settings,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Render the document for a lookup
    ///
    /// Dialplan lookups share the configuration dispatcher and envelope.
    /// When dialplan lookups are disabled they receive the bare envelope.
    ///
    /// A key or description that cannot be carried in an XML attribute is
    /// rejected with [`Error::InvalidInput`](crate::Error::InvalidInput).
    pub fn create_document(&self, request: &LookupRequest) -> Result<Document> {
        document::validate_text(&request.module_key)?;
        document::validate_text(&request.description)?;

        if request.section == Section::Dialplan && !self.settings.dialplan_enabled {
            debug!("Dialplan lookups disabled, empty envelope for {}", request.module_key);
            return Ok(Document::envelope(&request.module_key, &request.description));
        }

        self.generator
            .create_document(request.section, &request.module_key, &request.description)
    }

    /// Answer a lookup with serialized XML
    pub fn lookup(&self, request: &LookupRequest) -> Result<String> {
        debug!("{} provider: {}", request.section, request.module_key);

        let result = self
            .create_document(request)
            .and_then(|document| document.to_xml());

        match &result {
            Ok(xml) => self.emit_event(EngineEvent::DocumentServed {
                section: request.section,
                module_key: request.module_key.clone(),
                bytes: xml.len(),
            }),
            Err(e) => {
                error!("Failed to render {}: {}", request.module_key, e);
                self.emit_event(EngineEvent::DocumentFailed {
                    module_key: request.module_key.clone(),
                    error: e.to_string(),
                });
            }
        }

        result
    }

    /// Configuration-section entry point
    pub fn config_lookup(&self, module_key: &str, description: &str) -> Result<String> {
        self.lookup(&LookupRequest::configuration(module_key, description))
    }

    /// Dialplan-section entry point
    pub fn dialplan_lookup(&self, module_key: &str, description: &str) -> Result<String> {
        self.lookup(&LookupRequest::dialplan(module_key, description))
    }

    /// Route one lifecycle notification
    pub fn handle_notification(&self, notification: &Notification) -> Disposition {
        let disposition = self.classifier.classify(notification);

        match &disposition {
            Disposition::ModuleReported { name, loaded } => {
                self.emit_event(EngineEvent::ModuleStateChanged {
                    name: name.clone(),
                    loaded: *loaded,
                });
            }
            Disposition::ReloadRequested => self.emit_event(EngineEvent::ReloadRequested),
            _ => {}
        }

        disposition
    }

    /// Check whether a module may be loaded (see [`ModuleTracker::request_load`])
    pub fn request_load(&self, name: &str) -> Result<()> {
        self.tracker.request_load(name)
    }

    /// Check whether a module may be unloaded (see [`ModuleTracker::request_unload`])
    pub fn request_unload(&self, name: &str) -> Result<()> {
        self.tracker.request_unload(name)
    }

    /// Module state tracker
    pub fn tracker(&self) -> &ModuleTracker {
        &self.tracker
    }

    /// Provider registry
    pub fn registry(&self) -> &ProviderRegistry {
        self.generator.registry()
    }

    /// Consume notifications until the stream ends or Ctrl-C is received
    pub async fn run<S>(&self, notifications: S) -> Result<()>
    where
        S: Stream<Item = Notification> + Unpin,
    {
        self.run_internal(notifications, None).await
    }

    /// Consume notifications until the stream ends or `shutdown_rx` fires
    pub async fn run_with_shutdown<S>(
        &self,
        notifications: S,
        shutdown_rx: oneshot::Receiver<()>,
    ) -> Result<()>
    where
        S: Stream<Item = Notification> + Unpin,
    {
        self.run_internal(notifications, Some(shutdown_rx)).await
    }

    /// Internal run implementation that accepts an optional shutdown signal
    ///
    /// # Parameters
    ///
    /// - `shutdown_rx`: Oneshot receiver that stops the loop; Ctrl-C when `None`
    async fn run_internal<S>(
        &self,
        mut notifications: S,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<()>
    where
        S: Stream<Item = Notification> + Unpin,
    {
        self.emit_event(EngineEvent::Started {
            sections: self.registry().keys().len(),
            modules: self.tracker.len(),
        });

        let shutdown = async move {
            match shutdown_rx {
                Some(rx) => {
                    let _ = rx.await;
                }
                None => {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        warn!("Failed to listen for Ctrl-C: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            }
        };
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                next = notifications.next() => match next {
                    Some(notification) => {
                        self.handle_notification(&notification);
                    }
                    None => {
                        info!("Notification stream closed");
                        self.emit_event(EngineEvent::Stopped {
                            reason: "Notification stream closed".to_string(),
                        });
                        break;
                    }
                },

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    self.emit_event(EngineEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    break;
                }
            }
        }

        Ok(())
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                trace!("Event receiver dropped, discarding event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_engine_registers_all_sections() {
        let (engine, _rx) = ConfigEngine::new(SwitchConfig::default()).unwrap();

        assert_eq!(
            engine.registry().keys(),
            vec![
                "acl.conf",
                "conference.conf",
                "modules.conf",
                "msrp.conf",
                "speex.conf",
                "timezones.conf",
            ]
        );
        assert_eq!(engine.tracker().is_loaded("mod_sofia"), Some(false));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SwitchConfig::default();
        config.engine.event_channel_capacity = 0;
        assert!(ConfigEngine::new(config).is_err());
    }

    #[test]
    fn test_lookup_and_notification_emit_events() {
        let (engine, mut rx) = ConfigEngine::new(SwitchConfig::default()).unwrap();

        let xml = engine.config_lookup("speex.conf", "Speex").unwrap();
        assert!(xml.contains("<settings name=\"default\">"));

        let load = Notification::with_pairs(EventKind::ModuleLoad, [("name", "mod_sofia")]);
        engine.handle_notification(&load);

        assert!(matches!(
            rx.try_recv().unwrap(),
            EngineEvent::DocumentServed { section: Section::Configuration, .. }
        ));
        assert_eq!(
            rx.try_recv().unwrap(),
            EngineEvent::ModuleStateChanged {
                name: "mod_sofia".to_string(),
                loaded: true
            }
        );
    }

    #[test]
    fn test_full_channel_drops_events() {
        let mut config = SwitchConfig::default();
        config.engine.event_channel_capacity = 1;
        let (engine, mut rx) = ConfigEngine::new(config).unwrap();

        engine.config_lookup("acl.conf", "ACL").unwrap();
        engine.config_lookup("acl.conf", "ACL").unwrap();

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
