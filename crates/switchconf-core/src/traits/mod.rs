//! Core traits for the switchconf system
//!
//! - [`ConfigProvider`]: One configuration section (defaults + document rendering)
//! - [`TimezoneCatalog`]: The host environment's time-zone catalog

pub mod config_provider;
pub mod timezone_catalog;

pub use config_provider::ConfigProvider;
pub use timezone_catalog::{SystemTimezoneCatalog, TimezoneCatalog, ZoneOffset};
