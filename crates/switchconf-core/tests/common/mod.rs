//! Test doubles and common utilities for contract tests
//!
//! This module provides a fixed time-zone catalog, config helpers and a
//! tracing layer that counts events per target.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use switchconf_core::traits::{TimezoneCatalog, ZoneOffset};
use switchconf_core::{ConfigEngine, EngineEvent, SwitchConfig};
use tokio::sync::mpsc;
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};

/// A catalog with a handful of zones whose offsets never move
pub struct FixedCatalog {
    zones: Vec<ZoneOffset>,
    /// Number of times offsets_at() was called
    calls: AtomicUsize,
}

impl FixedCatalog {
    pub fn new() -> Self {
        Self {
            zones: vec![
                ZoneOffset::new("UTC", 0),
                ZoneOffset::new("Europe/Paris", 3600),
                ZoneOffset::new("Asia/Kolkata", 5 * 3600 + 1800),
                ZoneOffset::new("America/Los_Angeles", -8 * 3600),
            ],
            calls: AtomicUsize::new(0),
        }
    }

    /// Get the number of times offsets_at() was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TimezoneCatalog for FixedCatalog {
    fn offsets_at(&self, _instant: DateTime<Utc>) -> Vec<ZoneOffset> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.zones.clone()
    }
}

/// Build an engine from stock defaults over the fixed catalog
pub fn default_engine() -> (ConfigEngine, mpsc::Receiver<EngineEvent>) {
    engine_with(SwitchConfig::default())
}

/// Build an engine from a given config over the fixed catalog
pub fn engine_with(config: SwitchConfig) -> (ConfigEngine, mpsc::Receiver<EngineEvent>) {
    ConfigEngine::with_catalog(config, Arc::new(FixedCatalog::new()))
        .expect("engine construction succeeds")
}

/// Drain every event currently queued
pub fn drain(rx: &mut mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// A tracing layer that counts events emitted for one target
#[derive(Clone)]
pub struct CountingLayer {
    target: &'static str,
    count: Arc<AtomicUsize>,
}

impl CountingLayer {
    pub fn new(target: &'static str) -> Self {
        Self {
            target,
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of matching events seen so far
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for CountingLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() == self.target {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}
