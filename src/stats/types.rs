//! Result types produced by the statistics passes.
//!
//! `None` on a single statistic means the filtered dataset had no value to
//! report. On the optional demographic sections it means the city's data
//! has no such column.

use chrono::{Month, Weekday};
use serde::{Serialize, Serializer};

use crate::query::day_name;

/// Most frequent month, weekday and start hour. Month and day serialize as
/// full English names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    #[serde(serialize_with = "serialize_month")]
    pub most_common_month: Option<Month>,
    #[serde(serialize_with = "serialize_day")]
    pub most_common_day: Option<Weekday>,
    pub most_common_hour: Option<u32>,
}

fn serialize_month<S: Serializer>(month: &Option<Month>, s: S) -> Result<S::Ok, S::Error> {
    month.map(|m| m.name()).serialize(s)
}

fn serialize_day<S: Serializer>(day: &Option<Weekday>, s: S) -> Result<S::Ok, S::Error> {
    day.map(day_name).serialize(s)
}

/// Ordered start/end station pair. Kept as two fields so station names
/// can never collide with a separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub most_common_start: Option<String>,
    pub most_common_end: Option<String>,
    pub most_common_trip: Option<StationPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trips: usize,
    /// Sum of all durations in days, one decimal place.
    pub total_days: f64,
    /// Mean duration in minutes, two decimal places.
    pub mean_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: Option<i32>,
    pub most_recent: Option<i32>,
    pub most_common: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<(String, usize)>,
    pub genders: Option<Vec<(String, usize)>>,
    pub birth_years: Option<BirthYearStats>,
}
