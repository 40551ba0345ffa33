//! Date-window helpers for the ±3-day timeline.

use chrono::{Datelike, Local, NaiveDate, Weekday};

use crate::models::WeatherDataset;

/// Days shown on each side of "today" in the timeline.
pub const WINDOW_DAYS: i64 = 3;

/// Today's date in the machine-local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The 7 consecutive dates centered on `center` (center-3 ..= center+3).
pub fn dates_around(center: NaiveDate) -> Vec<NaiveDate> {
    (-WINDOW_DAYS..=WINDOW_DAYS)
        .map(|offset| center + chrono::Duration::days(offset))
        .collect()
}

/// A full window around `center` with every date mapped to `None`,
/// used as the loading placeholder the timeline renders before data arrives.
pub fn null_window(center: NaiveDate) -> WeatherDataset {
    dates_around(center).into_iter().map(|d| (d, None)).collect()
}

/// Short weekday label for a timeline column ("Mon", "Tue", ...).
pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
