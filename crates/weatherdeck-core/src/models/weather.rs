use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Location;

/// One weather snapshot for one calendar day.
///
/// Numeric fields are optional because the provider omits them for days it
/// has no data for; the UI renders missing values as "-".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
    pub precip: Option<f64>,
    pub description: String,
    pub icon: String,
}

/// Date-keyed weather window.
///
/// `None` marks a day inside the window that has no data (yet) - the timeline
/// renders a placeholder for it. BTreeMap keeps the days in calendar order.
pub type WeatherDataset = BTreeMap<NaiveDate, Option<WeatherData>>;

/// The result of a single provider call (current, historical or forecast):
/// the resolved location and the day snapshots the call produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub location: Location,
    pub weather_data: WeatherDataset,
}

/// Merge `incoming` day values into `target`.
///
/// A `Some` snapshot always replaces whatever is there; a `None` only fills a
/// date that is not present at all, so an absent historical/forecast day never
/// downgrades data another call already provided.
pub fn merge_dataset(target: &mut WeatherDataset, incoming: WeatherDataset) {
    for (date, value) in incoming {
        if value.is_some() {
            target.insert(date, value);
        } else {
            target.entry(date).or_insert(None);
        }
    }
}
