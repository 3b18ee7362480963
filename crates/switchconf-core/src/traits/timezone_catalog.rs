// # Timezone Catalog Trait
//
// Abstracts the host environment's list of time zones so the timezone
// provider can be exercised with a fixed catalog in tests.

use chrono::{DateTime, Offset, TimeZone, Utc};

/// A zone identifier and its UTC offset at a given instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneOffset {
    /// Zone identifier as reported by the catalog
    pub name: String,
    /// Offset from UTC in seconds (local minus UTC)
    pub offset_seconds: i32,
}

impl ZoneOffset {
    /// Create a new zone offset
    pub fn new(name: impl Into<String>, offset_seconds: i32) -> Self {
        Self {
            name: name.into(),
            offset_seconds,
        }
    }
}

/// Trait for time-zone catalogs
pub trait TimezoneCatalog: Send + Sync {
    /// Every known zone with its offset at `instant`, in catalog order
    fn offsets_at(&self, instant: DateTime<Utc>) -> Vec<ZoneOffset>;
}

/// Catalog backed by the IANA database bundled with `chrono-tz`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimezoneCatalog;

impl TimezoneCatalog for SystemTimezoneCatalog {
    fn offsets_at(&self, instant: DateTime<Utc>) -> Vec<ZoneOffset> {
        chrono_tz::TZ_VARIANTS
            .iter()
            .map(|tz| {
                let offset = tz.offset_from_utc_datetime(&instant.naive_utc());
                ZoneOffset::new(tz.name(), offset.fix().local_minus_utc())
            })
            .collect()
    }
}
