//! Mock weather provider for development and tests.
//!
//! Returns deterministic data for any query without touching the network,
//! so the dashboard can be exercised without an API key (or a paid tier).
//! A short artificial delay keeps the loading state visible.

use std::time::Duration;

use chrono::NaiveDate;

use crate::api::WeatherError;
use crate::dates;
use crate::models::{FetchOutcome, Location, WeatherData, WeatherDataset};

/// Icon reference used for every mock day
const MOCK_ICON: &str =
    "https://assets.weatherstack.com/images/wsymbols01_png_64/wsymbol_0001_sunny.png";

/// Simulated network latency in milliseconds
const MOCK_DELAY_MS: u64 = 150;

#[derive(Debug, Clone, Default)]
pub struct MockClient;

impl MockClient {
    pub fn new() -> Self {
        Self
    }

    /// The fixed mock location, with the name replaced by the query
    fn location(query: &str) -> Location {
        Location {
            name: query.to_string(),
            region: "Gauteng".to_string(),
            country: "South Africa".to_string(),
        }
    }

    /// Mock day snapshot: values step with `i` so each day is
    /// distinguishable in the timeline.
    fn sample(i: i64) -> WeatherData {
        WeatherData {
            temperature: Some(25.0 + i as f64),
            wind_speed: Some(10.0 + i as f64),
            pressure: Some(1012.0 + i as f64),
            precip: Some(i as f64),
            description: "Sunny".to_string(),
            icon: MOCK_ICON.to_string(),
        }
    }

    async fn delay() {
        tokio::time::sleep(Duration::from_millis(MOCK_DELAY_MS)).await;
    }

    pub async fn current(&self, query: &str) -> Result<FetchOutcome, WeatherError> {
        Self::delay().await;

        let mut weather_data = WeatherDataset::new();
        weather_data.insert(dates::today(), Some(Self::sample(3)));

        Ok(FetchOutcome {
            location: Self::location(query),
            weather_data,
        })
    }

    /// The three days before `today`, oldest first with i = 0, 1, 2.
    pub async fn historical(
        &self,
        today: NaiveDate,
        query: &str,
    ) -> Result<FetchOutcome, WeatherError> {
        Self::delay().await;

        let weather_data: WeatherDataset = dates::dates_around(today)
            .into_iter()
            .filter(|d| *d < today)
            .zip(0..)
            .map(|(date, i)| (date, Some(Self::sample(i))))
            .collect();

        Ok(FetchOutcome {
            location: Self::location(query),
            weather_data,
        })
    }

    /// The three days after `today`, starting at i = 4 so forecast values
    /// never collide with historical ones.
    pub async fn forecast(
        &self,
        today: NaiveDate,
        query: &str,
    ) -> Result<FetchOutcome, WeatherError> {
        Self::delay().await;

        let weather_data: WeatherDataset = dates::dates_around(today)
            .into_iter()
            .filter(|d| *d > today)
            .zip(4..)
            .map(|(date, i)| (date, Some(Self::sample(i))))
            .collect();

        Ok(FetchOutcome {
            location: Self::location(query),
            weather_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_current_is_today_with_fixed_values() {
        let outcome = MockClient::new().current("Pretoria").await.unwrap();

        assert_eq!(outcome.location.name, "Pretoria");
        assert_eq!(outcome.location.country, "South Africa");
        assert_eq!(outcome.weather_data.len(), 1);

        let day = outcome.weather_data[&dates::today()].as_ref().unwrap();
        assert_eq!(day.temperature, Some(28.0));
        assert_eq!(day.wind_speed, Some(13.0));
        assert_eq!(day.pressure, Some(1015.0));
        assert_eq!(day.precip, Some(3.0));
        assert_eq!(day.description, "Sunny");
    }

    #[tokio::test]
    async fn test_historical_covers_three_past_days() {
        let today = date("2026-08-05");
        let outcome = MockClient::new().historical(today, "Pretoria").await.unwrap();

        assert_eq!(outcome.weather_data.len(), 3);
        assert!(outcome.weather_data.keys().all(|d| *d < today));

        // oldest day gets i = 0
        let oldest = outcome.weather_data[&date("2026-08-02")].as_ref().unwrap();
        assert_eq!(oldest.temperature, Some(25.0));
        assert_eq!(oldest.precip, Some(0.0));
    }

    #[tokio::test]
    async fn test_forecast_covers_three_future_days() {
        let today = date("2026-08-05");
        let outcome = MockClient::new().forecast(today, "Pretoria").await.unwrap();

        assert_eq!(outcome.weather_data.len(), 3);
        assert!(outcome.weather_data.keys().all(|d| *d > today));

        let first = outcome.weather_data[&date("2026-08-06")].as_ref().unwrap();
        assert_eq!(first.temperature, Some(29.0));
    }
}
