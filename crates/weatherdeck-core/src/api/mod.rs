//! REST API client module for the WeatherStack weather service.
//!
//! This module provides the `ApiClient` for fetching current, historical
//! and forecast weather, and the `WeatherError` type every provider call
//! reduces to.
//!
//! The API authenticates with an access key passed as a query parameter;
//! historical and forecast endpoints require a paid subscription tier.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::WeatherError;
