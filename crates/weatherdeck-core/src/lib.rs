//! Core library for weatherdeck.
//!
//! This crate contains everything below the terminal UI:
//!
//! - `api`: the live WeatherStack client and the error type
//! - `mock`: the deterministic offline provider
//! - `provider`: mock/live dispatch with read-through response caching
//! - `cache`: the on-disk response cache
//! - `config`: configuration file and environment overrides
//! - `models`: shared domain types (`Location`, `WeatherData`, ...)
//! - `dates`: ±3-day window helpers

pub mod api;
pub mod cache;
pub mod config;
pub mod dates;
pub mod mock;
pub mod models;
pub mod provider;

pub use api::{ApiClient, WeatherError};
pub use cache::{CacheManager, Endpoint};
pub use config::Config;
pub use mock::MockClient;
pub use models::{merge_dataset, FetchOutcome, Location, WeatherData, WeatherDataset};
pub use provider::Provider;
