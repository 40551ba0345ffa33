//! API client for the WeatherStack REST API.
//!
//! This module provides the `ApiClient` struct for fetching current,
//! historical and forecast weather. WeatherStack authenticates with an
//! `access_key` query parameter and reports failures inside an HTTP 200
//! response via a `{"success": false, "error": {...}}` envelope, which is
//! surfaced as `WeatherError::Provider`.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::dates;
use crate::models::{FetchOutcome, Location, WeatherData, WeatherDataset};

use super::WeatherError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the WeatherStack API
const API_BASE_URL: &str = "https://api.weatherstack.com";

/// HTTP request timeout in seconds.
/// Weather lookups are small payloads; anything slower should fail fast.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Metric units ("m") so temperatures arrive in °C and wind in km/h
const UNITS_METRIC: &str = "m";

/// Days of forecast requested, matching the forward half of the ±3-day window
const FORECAST_DAYS: &str = "3";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct LocationBlock {
    name: Option<String>,
    country: Option<String>,
    region: Option<String>,
    localtime: Option<String>,
}

impl LocationBlock {
    fn into_location(self) -> Location {
        let part = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
        Location {
            name: part(self.name),
            country: part(self.country),
            region: part(self.region),
        }
    }
}

/// One day (or hour) of weather as WeatherStack reports it.
/// The same block shape appears under `current`, `historical.<date>` and
/// `forecast.<date>.hourly[]`.
#[derive(Debug, Deserialize)]
struct DayBlock {
    temperature: Option<f64>,
    #[serde(default)]
    weather_icons: Vec<String>,
    #[serde(default)]
    weather_descriptions: Vec<String>,
    wind_speed: Option<f64>,
    pressure: Option<f64>,
    precip: Option<f64>,
}

impl DayBlock {
    fn into_weather(self) -> WeatherData {
        WeatherData {
            temperature: self.temperature,
            wind_speed: self.wind_speed,
            pressure: self.pressure,
            precip: self.precip,
            description: self
                .weather_descriptions
                .into_iter()
                .next()
                .unwrap_or_else(|| "-".to_string()),
            icon: self
                .weather_icons
                .into_iter()
                .next()
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: Option<LocationBlock>,
    current: Option<DayBlock>,
}

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    location: Option<LocationBlock>,
    #[serde(default)]
    historical: HashMap<String, DayBlock>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    location: Option<LocationBlock>,
    #[serde(default)]
    forecast: HashMap<String, ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    #[serde(default)]
    hourly: Vec<DayBlock>,
}

/// WeatherStack error envelope, delivered with HTTP 200
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    success: Option<bool>,
    error: Option<ProviderErrorBlock>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBlock {
    code: Option<i64>,
    info: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// API client for WeatherStack.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    access_key: String,
}

impl ApiClient {
    /// Create a new API client with the given access key
    pub fn new(access_key: String) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            access_key,
        })
    }

    /// Override the API base URL (compatible mirrors, stub servers in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send a GET request and deserialize the body, checking both the HTTP
    /// status and the provider's in-band error envelope first.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[("access_key", self.access_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::from_status(status, &body));
        }

        let text = response.text().await?;

        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&text) {
            if envelope.success == Some(false) {
                let (code, info) = envelope
                    .error
                    .map(|e| {
                        (
                            e.code.unwrap_or(0),
                            e.info.unwrap_or_else(|| "Unknown provider error".to_string()),
                        )
                    })
                    .unwrap_or((0, "Unknown provider error".to_string()));
                return Err(WeatherError::Provider { code, info });
            }
        }

        serde_json::from_str(&text).map_err(|e| WeatherError::InvalidResponse(e.to_string()))
    }

    /// Fetch current weather for a location query.
    ///
    /// The day key is taken from the date part of the provider's `localtime`,
    /// so "today" is the location's today rather than the machine's.
    pub async fn current(&self, query: &str) -> Result<FetchOutcome, WeatherError> {
        debug!(query, "Fetching current weather");

        let response: CurrentResponse = self
            .get_json("current", &[("query", query), ("units", UNITS_METRIC)])
            .await?;

        let location_block = response
            .location
            .ok_or_else(|| WeatherError::LocationUnavailable(query.to_string()))?;
        let day = response.current.ok_or(WeatherError::MissingCurrent)?;

        let date = location_block
            .localtime
            .as_deref()
            .and_then(|lt| lt.split_whitespace().next())
            .and_then(|d| d.parse::<NaiveDate>().ok())
            .unwrap_or_else(dates::today);

        let mut weather_data = WeatherDataset::new();
        weather_data.insert(date, Some(day.into_weather()));

        Ok(FetchOutcome {
            location: location_block.into_location(),
            weather_data,
        })
    }

    /// Fetch the three days before `today` in one historical call.
    ///
    /// Dates the provider has no record for map to `None`.
    pub async fn historical(
        &self,
        today: NaiveDate,
        query: &str,
    ) -> Result<FetchOutcome, WeatherError> {
        let dates: Vec<NaiveDate> = dates::dates_around(today)
            .into_iter()
            .filter(|d| *d < today)
            .collect();
        let historical_date = dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect::<Vec<_>>()
            .join(";");

        debug!(query, %historical_date, "Fetching historical weather");

        let response: HistoricalResponse = self
            .get_json(
                "historical",
                &[
                    ("query", query),
                    ("units", UNITS_METRIC),
                    ("historical_date", &historical_date),
                ],
            )
            .await?;

        let location = response
            .location
            .map(LocationBlock::into_location)
            .unwrap_or_default();

        let mut blocks = response.historical;
        let mut weather_data = WeatherDataset::new();
        for date in dates {
            let key = date.format("%Y-%m-%d").to_string();
            weather_data.insert(date, blocks.remove(&key).map(DayBlock::into_weather));
        }

        Ok(FetchOutcome {
            location,
            weather_data,
        })
    }

    /// Fetch the three days after `today`.
    ///
    /// The forecast is requested with a 24h interval, so each day carries a
    /// single hourly entry that stands for the day average.
    pub async fn forecast(
        &self,
        today: NaiveDate,
        query: &str,
    ) -> Result<FetchOutcome, WeatherError> {
        debug!(query, "Fetching forecast weather");

        let response: ForecastResponse = self
            .get_json(
                "forecast",
                &[
                    ("query", query),
                    ("units", UNITS_METRIC),
                    ("forecast_days", FORECAST_DAYS),
                    ("hourly", "1"),
                    ("interval", "24"),
                ],
            )
            .await?;

        let location = response
            .location
            .map(LocationBlock::into_location)
            .unwrap_or_default();

        let mut blocks = response.forecast;
        let mut weather_data = WeatherDataset::new();
        for date in dates::dates_around(today).into_iter().filter(|d| *d > today) {
            let key = date.format("%Y-%m-%d").to_string();
            let day = blocks
                .remove(&key)
                .and_then(|d| d.hourly.into_iter().next())
                .map(DayBlock::into_weather);
            weather_data.insert(date, day);
        }

        Ok(FetchOutcome {
            location,
            weather_data,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
