//! Application state management for weatherdeck.
//!
//! This module contains the core `App` struct: the query/timeline state, the
//! background fetch task that aggregates current, historical and forecast
//! weather into one date-keyed window, and the generation guard that keeps
//! rapid re-queries from applying stale results.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use weatherdeck_core::config::Config;
use weatherdeck_core::models::{merge_dataset, Location, WeatherDataset};
use weatherdeck_core::provider::Provider;
use weatherdeck_core::{dates, WeatherError};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the fetch task message channel.
/// One query produces at most five messages, so 16 leaves ample headroom.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for the location query input
pub const MAX_QUERY_LENGTH: usize = 64;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EditingQuery,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

// ============================================================================
// Fetch Task Results
// ============================================================================

/// Messages sent from the background fetch task back to the app.
///
/// Every variant carries the generation it was spawned under; results from a
/// superseded generation are discarded on receipt, which is what protects
/// against a rapid re-query racing an in-flight fetch.
enum FetchResult {
    /// Current weather arrived: the full ±3-day window (current day filled,
    /// the rest placeholders) and the resolved location
    Current {
        generation: u64,
        location: Location,
        data: WeatherDataset,
    },
    /// A historical or forecast call completed: merge into the window
    Merge {
        generation: u64,
        location: Option<Location>,
        data: WeatherDataset,
    },
    /// A call failed, reduced to its display string
    Failed { generation: u64, message: String },
    /// Every call of this generation has settled
    Settled { generation: u64 },
}

impl FetchResult {
    fn generation(&self) -> u64 {
        match self {
            FetchResult::Current { generation, .. }
            | FetchResult::Merge { generation, .. }
            | FetchResult::Failed { generation, .. }
            | FetchResult::Settled { generation } => *generation,
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    provider: Arc<Provider>,

    // UI state
    pub state: AppState,
    pub query_input: String,

    // Weather state
    pub query: Option<String>,
    pub location: Location,
    pub weather_data: WeatherDataset,
    pub selected_date: Option<NaiveDate>,
    pub is_loading: bool,
    pub error: Option<String>,

    // Status bar
    pub status_message: Option<String>,
    pub cache_age: Option<String>,

    // Fetch task coordination
    generation: u64,
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,
}

impl App {
    pub fn new(config: Config, provider: Provider) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let state = if config.last_query.is_some() {
            AppState::Normal
        } else {
            AppState::EditingQuery
        };

        Self {
            config,
            provider: Arc::new(provider),

            state,
            query_input: String::new(),

            query: None,
            location: Location::unknown(),
            weather_data: WeatherDataset::new(),
            selected_date: None,
            is_loading: false,
            error: None,

            status_message: None,
            cache_age: None,

            generation: 0,
            fetch_rx: rx,
            fetch_tx: tx,
        }
    }

    // =========================================================================
    // Query Submission
    // =========================================================================

    /// Submit a location query: install the loading window and spawn the
    /// fetch task. Whitespace-only input is ignored.
    pub fn submit_query(&mut self, raw: &str) {
        let query = raw.trim();
        if query.is_empty() {
            return;
        }
        let query = query.to_string();

        self.generation += 1;
        let generation = self.generation;
        let today = dates::today();

        info!(%query, generation, "Submitting weather query");

        self.query = Some(query.clone());
        self.is_loading = true;
        self.error = None;
        self.weather_data = dates::null_window(today);
        self.selected_date = Some(today);
        self.status_message = Some(format!("Fetching weather for {}...", query));

        let provider = Arc::clone(&self.provider);
        let paid = self.config.paid_endpoints_enabled();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            Self::execute_fetch(tx, provider, query, generation, paid).await;
        });
    }

    /// Re-run the active query (after an error, or just to refresh)
    pub fn refresh(&mut self) {
        if let Some(query) = self.query.clone() {
            self.submit_query(&query);
        }
    }

    // =========================================================================
    // Background Fetch
    // =========================================================================

    /// Helper to send fetch results, logging any channel errors
    async fn send(tx: &mpsc::Sender<FetchResult>, result: FetchResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send fetch result - channel closed");
        }
    }

    /// Execute one query's fetches in a spawned Tokio task.
    ///
    /// Current weather is fetched first; its response fixes the provider-local
    /// "today" the window is centered on. If the paid endpoints are enabled,
    /// historical and forecast are then fetched concurrently and merged as
    /// they complete. A failed current fetch short-circuits the paid calls.
    async fn execute_fetch(
        tx: mpsc::Sender<FetchResult>,
        provider: Arc<Provider>,
        query: String,
        generation: u64,
        paid: bool,
    ) {
        debug!(%query, generation, "Fetch task started");

        let today = match provider.current(&query).await {
            Ok(outcome) => {
                // The current call returns exactly one day: the provider-local
                // today, which may differ from the machine-local date the
                // placeholder window assumed.
                let today = outcome
                    .weather_data
                    .keys()
                    .next()
                    .copied()
                    .unwrap_or_else(dates::today);

                let mut data = dates::null_window(today);
                merge_dataset(&mut data, outcome.weather_data);

                Self::send(
                    &tx,
                    FetchResult::Current {
                        generation,
                        location: outcome.location,
                        data,
                    },
                )
                .await;
                today
            }
            Err(e) => {
                Self::send_failure(&tx, generation, &e).await;
                Self::send(&tx, FetchResult::Settled { generation }).await;
                return;
            }
        };

        if paid {
            let (historical, forecast) = future::join(
                provider.historical(today, &query),
                provider.forecast(today, &query),
            )
            .await;

            for result in [historical, forecast] {
                match result {
                    Ok(outcome) => {
                        // Only merge a location the call actually resolved
                        let location = (outcome.location != Location::unknown())
                            .then_some(outcome.location);
                        Self::send(
                            &tx,
                            FetchResult::Merge {
                                generation,
                                location,
                                data: outcome.weather_data,
                            },
                        )
                        .await;
                    }
                    Err(e) => Self::send_failure(&tx, generation, &e).await,
                }
            }
        }

        debug!(%query, generation, "Fetch task complete");
        Self::send(&tx, FetchResult::Settled { generation }).await;
    }

    async fn send_failure(tx: &mpsc::Sender<FetchResult>, generation: u64, e: &WeatherError) {
        warn!(error = %e, generation, "Weather fetch failed");
        Self::send(
            tx,
            FetchResult::Failed {
                generation,
                message: e.to_string(),
            },
        )
        .await;
    }

    /// Check for completed fetch work and apply it to the app state
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.fetch_rx.try_recv() {
            self.process_fetch_result(result);
        }
    }

    /// Apply a single fetch result, dropping anything from a stale generation.
    fn process_fetch_result(&mut self, result: FetchResult) {
        if result.generation() != self.generation {
            debug!(
                stale = result.generation(),
                current = self.generation,
                "Discarding stale fetch result"
            );
            return;
        }

        match result {
            FetchResult::Current { location, data, .. } => {
                self.location = location;
                // The window's center is the provider-local today
                self.selected_date = data.keys().nth(dates::WINDOW_DAYS as usize).copied();
                self.weather_data = data;
            }
            FetchResult::Merge { location, data, .. } => {
                if let Some(location) = location {
                    self.location = location;
                }
                merge_dataset(&mut self.weather_data, data);
            }
            FetchResult::Failed { message, .. } => {
                // First error of a query wins
                if self.error.is_none() {
                    self.error = Some(message);
                }
            }
            FetchResult::Settled { .. } => {
                self.is_loading = false;
                self.status_message = None;
                self.cache_age = self
                    .query
                    .as_deref()
                    .and_then(|q| self.provider.age_display(q));
            }
        }
    }

    // =========================================================================
    // Day Selection
    // =========================================================================

    pub fn select_prev_day(&mut self) {
        self.move_selection(-1);
    }

    pub fn select_next_day(&mut self) {
        self.move_selection(1);
    }

    fn move_selection(&mut self, step: i64) {
        let days: Vec<NaiveDate> = self.weather_data.keys().copied().collect();
        if days.is_empty() {
            return;
        }

        let current = self
            .selected_date
            .and_then(|d| days.iter().position(|x| *x == d))
            .unwrap_or(0);
        let next = (current as i64 + step).clamp(0, days.len() as i64 - 1) as usize;
        self.selected_date = Some(days[next]);
    }

    /// The snapshot for the selected day, if any data has arrived for it
    pub fn selected_weather(&self) -> Option<&weatherdeck_core::WeatherData> {
        self.selected_date
            .and_then(|d| self.weather_data.get(&d))
            .and_then(Option::as_ref)
    }

    // =========================================================================
    // Shutdown
    // =========================================================================

    /// Persist the active query so the next start reopens with it
    pub fn save_session(&mut self) {
        if self.query.is_some() && self.config.last_query != self.query {
            self.config.last_query = self.query.clone();
            if let Err(e) = self.config.save() {
                warn!(error = %e, "Failed to save config");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use weatherdeck_core::CacheManager;

    fn mock_app(paid: bool) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        let provider = Provider::mock(cache);
        let config = Config {
            paid_endpoints: Some(paid),
            ..Config::default()
        };
        (App::new(config, provider), dir)
    }

    /// Pump fetch results into the app until the active query settles
    async fn settle(app: &mut App) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while app.is_loading {
                let result = app.fetch_rx.recv().await.expect("fetch channel closed");
                app.process_fetch_result(result);
            }
        })
        .await
        .expect("fetch did not settle in time");
    }

    #[tokio::test]
    async fn test_query_fills_full_window_with_paid_endpoints() {
        let (mut app, _dir) = mock_app(true);

        app.submit_query("Pretoria");
        assert!(app.is_loading);
        settle(&mut app).await;

        assert_eq!(app.weather_data.len(), 7);
        assert!(app.weather_data.values().all(|v| v.is_some()));
        assert_eq!(app.location.name, "Pretoria");
        assert_eq!(app.error, None);
        assert_eq!(app.selected_date, Some(dates::today()));

        // mock values: today = 28°, oldest historical = 25°, last forecast = 31°
        let days: Vec<_> = app.weather_data.values().flatten().collect();
        assert_eq!(days[0].temperature, Some(25.0));
        assert_eq!(days[3].temperature, Some(28.0));
        assert_eq!(days[6].temperature, Some(31.0));
    }

    #[tokio::test]
    async fn test_free_tier_leaves_placeholders_outside_today() {
        let (mut app, _dir) = mock_app(false);

        app.submit_query("Pretoria");
        settle(&mut app).await;

        assert_eq!(app.weather_data.len(), 7);
        let today = dates::today();
        for (date, value) in &app.weather_data {
            if *date == today {
                assert!(value.is_some());
            } else {
                assert!(value.is_none(), "{date} should have no data on free tier");
            }
        }
    }

    #[tokio::test]
    async fn test_requery_replaces_data_and_stale_results_are_dropped() {
        let (mut app, _dir) = mock_app(true);

        // two submissions back to back; the first generation's results are
        // still in flight when the second supersedes it
        app.submit_query("Pretoria");
        app.submit_query("Cape Town");
        settle(&mut app).await;
        app.check_background_tasks();

        assert_eq!(app.location.name, "Cape Town");
        assert_eq!(app.error, None);
        assert!(app.weather_data.values().all(|v| v.is_some()));
    }

    #[tokio::test]
    async fn test_stale_generation_mutates_nothing() {
        let (mut app, _dir) = mock_app(true);
        app.generation = 2;

        app.process_fetch_result(FetchResult::Failed {
            generation: 1,
            message: "old failure".to_string(),
        });
        assert_eq!(app.error, None);

        app.is_loading = true;
        app.process_fetch_result(FetchResult::Settled { generation: 1 });
        assert!(app.is_loading);
    }

    #[tokio::test]
    async fn test_first_error_wins() {
        let (mut app, _dir) = mock_app(true);
        app.generation = 1;

        app.process_fetch_result(FetchResult::Failed {
            generation: 1,
            message: "first".to_string(),
        });
        app.process_fetch_result(FetchResult::Failed {
            generation: 1,
            message: "second".to_string(),
        });

        assert_eq!(app.error.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_blank_query_is_ignored() {
        let (mut app, _dir) = mock_app(true);

        app.submit_query("   ");

        assert!(!app.is_loading);
        assert_eq!(app.query, None);
    }

    #[tokio::test]
    async fn test_day_selection_clamps_to_window() {
        let (mut app, _dir) = mock_app(false);
        app.submit_query("Pretoria");
        settle(&mut app).await;

        for _ in 0..10 {
            app.select_prev_day();
        }
        let first = *app.weather_data.keys().next().unwrap();
        assert_eq!(app.selected_date, Some(first));

        for _ in 0..10 {
            app.select_next_day();
        }
        let last = *app.weather_data.keys().last().unwrap();
        assert_eq!(app.selected_date, Some(last));
    }
}
