// # Timezones Provider
//
// Renders `timezones.conf` from the host's time-zone catalog.
//
// The table is rebuilt on every render because offsets move with daylight
// saving transitions. Each render builds its own local table, so concurrent
// lookups never share a half-refreshed structure.

use crate::document::Element;
use crate::error::Result;
use crate::traits::{ConfigProvider, SystemTimezoneCatalog, TimezoneCatalog, ZoneOffset};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Section key served by this provider
pub const TIMEZONES_KEY: &str = "timezones.conf";

/// Zone identifier -> `UTC<hours>` label, in catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimezoneTable {
    zones: Vec<(String, String)>,
}

impl TimezoneTable {
    /// Build the table from a catalog at a given instant
    ///
    /// Duplicate zone identifiers keep their first occurrence.
    pub fn build(catalog: &dyn TimezoneCatalog, instant: DateTime<Utc>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let zones = catalog
            .offsets_at(instant)
            .into_iter()
            .filter(|zone| seen.insert(zone.name.clone()))
            .map(|zone| {
                let label = offset_label(&zone);
                (zone.name, label)
            })
            .collect();
        Self { zones }
    }

    /// Number of zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Label for a zone
    pub fn get(&self, name: &str) -> Option<&str> {
        self.zones
            .iter()
            .find(|(zone, _)| zone == name)
            .map(|(_, label)| label.as_str())
    }

    /// Iterate `(zone, label)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.zones
            .iter()
            .map(|(zone, label)| (zone.as_str(), label.as_str()))
    }
}

/// Whole hours, truncated toward zero, without a `+` sign
fn offset_label(zone: &ZoneOffset) -> String {
    format!("UTC{}", zone.offset_seconds / 3600)
}

/// Provider for `timezones.conf`
///
/// `render` never reads the cached table; it always builds a fresh one.
#[derive(Clone)]
pub struct TimezonesProvider {
    catalog: Arc<dyn TimezoneCatalog>,
    /// Snapshot taken by the last `generate_defaults()` call, for inspection only
    table: TimezoneTable,
}

impl TimezonesProvider {
    /// Create a provider over a specific catalog
    pub fn new(catalog: Arc<dyn TimezoneCatalog>) -> Self {
        Self {
            catalog,
            table: TimezoneTable::default(),
        }
    }

    /// Snapshot produced by the last `generate_defaults()` call
    ///
    /// Empty until `generate_defaults()` runs. Renders do not use it.
    pub fn table(&self) -> &TimezoneTable {
        &self.table
    }

    /// Build a fresh table for `instant`
    pub fn table_at(&self, instant: DateTime<Utc>) -> TimezoneTable {
        TimezoneTable::build(self.catalog.as_ref(), instant)
    }

    /// Render the table as it stands at `instant`
    pub fn render_at(&self, parent: &mut Element, instant: DateTime<Utc>) -> Result<()> {
        let table = self.table_at(instant);
        debug!("Rendering {} time zones", table.len());

        let root = parent.push(Element::new("timezones"));
        for (zone, label) in table.iter() {
            root.push(Element::new("zone").attr("name", zone).attr("value", label));
        }
        Ok(())
    }
}

impl Default for TimezonesProvider {
    fn default() -> Self {
        Self::new(Arc::new(SystemTimezoneCatalog))
    }
}

impl std::fmt::Debug for TimezonesProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimezonesProvider")
            .field("zones", &self.table.len())
            .finish()
    }
}

impl ConfigProvider for TimezonesProvider {
    fn key(&self) -> &'static str {
        TIMEZONES_KEY
    }

    fn generate_defaults(&mut self) {
        self.table = self.table_at(Utc::now());
    }

    fn render(&self, parent: &mut Element) -> Result<()> {
        self.render_at(parent, Utc::now())
    }
}
