use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::FetchOutcome;

/// Cache schema version. Bump when the structure of cached payloads
/// changes, to orphan entries written by older builds.
const SCHEMA_VERSION: &str = "1";

/// The three provider endpoints a response can be cached for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Historical,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::Historical => "historical",
            Endpoint::Forecast => "forecast",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        }
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    /// File name for one cached response. The day is part of the key, so
    /// entries expire by becoming unreachable when the date changes.
    fn cache_path(&self, day: NaiveDate, mode: &str, endpoint: Endpoint, query: &str) -> PathBuf {
        let name = format!(
            "{}_{}_{}_{}_{}.json",
            SCHEMA_VERSION,
            day.format("%Y-%m-%d"),
            mode,
            endpoint.as_str(),
            urlencoding::encode(query),
        );
        self.cache_dir.join(name)
    }

    fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<CachedData<T>>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cache file: {}", path.display()))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", path.display()))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Look up a cached response for the given day/mode/endpoint/query.
    /// Unreadable or corrupt entries count as misses.
    pub fn load_outcome(
        &self,
        day: NaiveDate,
        mode: &str,
        endpoint: Endpoint,
        query: &str,
    ) -> Option<CachedData<FetchOutcome>> {
        let path = self.cache_path(day, mode, endpoint, query);
        match self.load(&path) {
            Ok(hit) => hit,
            Err(e) => {
                debug!(error = %e, endpoint = endpoint.as_str(), "Cache read failed, treating as miss");
                None
            }
        }
    }

    pub fn save_outcome(
        &self,
        day: NaiveDate,
        mode: &str,
        endpoint: Endpoint,
        query: &str,
        outcome: &FetchOutcome,
    ) -> Result<()> {
        let path = self.cache_path(day, mode, endpoint, query);
        self.save(&path, outcome)
    }

    /// Age of the cached current-weather entry for the status bar,
    /// or None when nothing is cached for the query today.
    pub fn age_display(&self, day: NaiveDate, mode: &str, query: &str) -> Option<String> {
        self.load_outcome(day, mode, Endpoint::Current, query)
            .map(|cached| cached.age_display())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, WeatherDataset};
    use chrono::Duration;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn outcome(name: &str) -> FetchOutcome {
        FetchOutcome {
            location: Location {
                name: name.to_string(),
                region: "Gauteng".to_string(),
                country: "South Africa".to_string(),
            },
            weather_data: WeatherDataset::new(),
        }
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        let day = date("2026-08-05");

        cache
            .save_outcome(day, "mock", Endpoint::Current, "Pretoria", &outcome("Pretoria"))
            .unwrap();

        let hit = cache
            .load_outcome(day, "mock", Endpoint::Current, "Pretoria")
            .unwrap();
        assert_eq!(hit.data.location.name, "Pretoria");
    }

    #[test]
    fn test_keys_are_disjoint_per_day_endpoint_query_mode() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        let day = date("2026-08-05");

        cache
            .save_outcome(day, "mock", Endpoint::Current, "Pretoria", &outcome("Pretoria"))
            .unwrap();

        // different day
        assert!(cache
            .load_outcome(date("2026-08-06"), "mock", Endpoint::Current, "Pretoria")
            .is_none());
        // different endpoint
        assert!(cache
            .load_outcome(day, "mock", Endpoint::Forecast, "Pretoria")
            .is_none());
        // different query
        assert!(cache
            .load_outcome(day, "mock", Endpoint::Current, "Cape Town")
            .is_none());
        // different mode
        assert!(cache
            .load_outcome(day, "live", Endpoint::Current, "Pretoria")
            .is_none());
    }

    #[test]
    fn test_query_with_special_characters_is_a_valid_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        let day = date("2026-08-05");
        let query = "São Paulo / BR";

        cache
            .save_outcome(day, "live", Endpoint::Current, query, &outcome(query))
            .unwrap();

        let hit = cache.load_outcome(day, "live", Endpoint::Current, query).unwrap();
        assert_eq!(hit.data.location.name, query);
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        let day = date("2026-08-05");

        cache
            .save_outcome(day, "mock", Endpoint::Current, "Pretoria", &outcome("Pretoria"))
            .unwrap();
        let path = cache.cache_path(day, "mock", Endpoint::Current, "Pretoria");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(cache
            .load_outcome(day, "mock", Endpoint::Current, "Pretoria")
            .is_none());
    }

    #[test]
    fn test_cached_data_age_display() {
        let fresh = CachedData::new(());
        assert_eq!(fresh.age_display(), "just now");

        let mut old = CachedData::new(());
        old.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(old.age_display(), "5m ago");

        old.cached_at = Utc::now() - Duration::minutes(95);
        assert_eq!(old.age_display(), "2h ago");
    }
}
