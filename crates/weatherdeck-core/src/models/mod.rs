//! Data models for weather entities.
//!
//! This module contains the domain structures shared between the provider
//! clients, the cache and the TUI:
//!
//! - `Location`: where the resolved weather applies
//! - `WeatherData`: one weather snapshot for one calendar day
//! - `WeatherDataset`: the date-keyed ±3-day window
//! - `FetchOutcome`: location plus dataset, as returned by one provider call

pub mod location;
pub mod weather;

pub use location::Location;
pub use weather::{merge_dataset, FetchOutcome, WeatherData, WeatherDataset};
