//! Provider dispatch and read-through response caching.
//!
//! A `Provider` routes each of the three weather operations to the mock or
//! live backend (selected by configuration) and wraps every call in the
//! response cache: a same-day hit for the same endpoint and query is
//! returned without any network activity.

use std::future::Future;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::api::{ApiClient, WeatherError};
use crate::cache::{CacheManager, Endpoint};
use crate::config::Config;
use crate::dates;
use crate::mock::MockClient;
use crate::models::FetchOutcome;

enum Backend {
    Mock(MockClient),
    Live(ApiClient),
}

pub struct Provider {
    backend: Backend,
    cache: CacheManager,
}

impl Provider {
    /// Build a provider from configuration: mock when configured (or when no
    /// access key exists), live otherwise.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache = CacheManager::new(config.cache_dir()?)?;

        if config.is_mock_enabled() {
            Ok(Self::mock(cache))
        } else {
            let access_key = config.access_key.clone().ok_or_else(|| {
                anyhow::anyhow!("WEATHERDECK_ACCESS_KEY is required for live mode")
            })?;
            let client = ApiClient::new(access_key)?;
            Ok(Self::live(client, cache))
        }
    }

    pub fn mock(cache: CacheManager) -> Self {
        Self {
            backend: Backend::Mock(MockClient::new()),
            cache,
        }
    }

    pub fn live(client: ApiClient, cache: CacheManager) -> Self {
        Self {
            backend: Backend::Live(client),
            cache,
        }
    }

    /// Mode discriminator, also part of every cache key
    pub fn mode(&self) -> &'static str {
        match self.backend {
            Backend::Mock(_) => "mock",
            Backend::Live(_) => "live",
        }
    }

    /// Serve from cache or fetch and store. Failed fetches are not cached.
    /// The `fetch` future is only polled on a cache miss.
    async fn cached<Fut>(
        &self,
        endpoint: Endpoint,
        query: &str,
        fetch: Fut,
    ) -> Result<FetchOutcome, WeatherError>
    where
        Fut: Future<Output = Result<FetchOutcome, WeatherError>>,
    {
        let day = dates::today();

        if let Some(hit) = self.cache.load_outcome(day, self.mode(), endpoint, query) {
            debug!(endpoint = endpoint.as_str(), query, "Cache hit");
            return Ok(hit.data);
        }

        let outcome = fetch.await?;

        if let Err(e) = self
            .cache
            .save_outcome(day, self.mode(), endpoint, query, &outcome)
        {
            warn!(error = %e, endpoint = endpoint.as_str(), "Failed to write cache entry");
        }

        Ok(outcome)
    }

    pub async fn current(&self, query: &str) -> Result<FetchOutcome, WeatherError> {
        self.cached(Endpoint::Current, query, async {
            match &self.backend {
                Backend::Mock(mock) => mock.current(query).await,
                Backend::Live(api) => api.current(query).await,
            }
        })
        .await
    }

    pub async fn historical(
        &self,
        today: NaiveDate,
        query: &str,
    ) -> Result<FetchOutcome, WeatherError> {
        self.cached(Endpoint::Historical, query, async {
            match &self.backend {
                Backend::Mock(mock) => mock.historical(today, query).await,
                Backend::Live(api) => api.historical(today, query).await,
            }
        })
        .await
    }

    pub async fn forecast(
        &self,
        today: NaiveDate,
        query: &str,
    ) -> Result<FetchOutcome, WeatherError> {
        self.cached(Endpoint::Forecast, query, async {
            match &self.backend {
                Backend::Mock(mock) => mock.forecast(today, query).await,
                Backend::Live(api) => api.forecast(today, query).await,
            }
        })
        .await
    }

    /// Cache age of today's current-weather entry for the status bar
    pub fn age_display(&self, query: &str) -> Option<String> {
        self.cache
            .age_display(dates::today(), self.mode(), query)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn current_body() -> serde_json::Value {
        json!({
            "location": {
                "name": "Pretoria",
                "country": "South Africa",
                "region": "Gauteng",
                "localtime": "2026-08-05 14:30"
            },
            "current": {
                "temperature": 25,
                "weather_icons": ["icon"],
                "weather_descriptions": ["Sunny"],
                "wind_speed": 10,
                "pressure": 1012,
                "precip": 0
            }
        })
    }

    fn provider_for(server: &MockServer, dir: &tempfile::TempDir) -> Provider {
        let client = ApiClient::new("testkey".to_string())
            .unwrap()
            .with_base_url(server.uri());
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        Provider::live(client, cache)
    }

    #[tokio::test]
    async fn test_same_day_cache_hit_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .expect(1) // the second lookup must be served from cache
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = provider_for(&server, &dir);

        let first = provider.current("Pretoria").await.unwrap();
        let second = provider.current("Pretoria").await.unwrap();

        assert_eq!(first.location.name, second.location.name);
        assert_eq!(first.weather_data, second.weather_data);
    }

    #[tokio::test]
    async fn test_distinct_queries_fetch_separately() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .expect(2)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = provider_for(&server, &dir);

        provider.current("Pretoria").await.unwrap();
        provider.current("Cape Town").await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_fetches_are_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = provider_for(&server, &dir);

        assert!(provider.current("Pretoria").await.is_err());
        // the error must not poison the cache; the retry reaches the server
        let outcome = provider.current("Pretoria").await.unwrap();
        assert_eq!(outcome.location.name, "Pretoria");
    }

    #[tokio::test]
    async fn test_mock_mode_populates_cache_too() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        let provider = Provider::mock(cache);

        assert!(provider.age_display("Pretoria").is_none());
        provider.current("Pretoria").await.unwrap();
        assert_eq!(provider.age_display("Pretoria").as_deref(), Some("just now"));
    }
}
