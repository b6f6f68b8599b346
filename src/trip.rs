//! In-memory trip table for a single query.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::query::City;

/// Which optional rider columns the city's source file carries.
///
/// Decided once from the file header; the statistics passes consult this
/// instead of probing individual records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    pub gender: bool,
    pub birth_year: bool,
}

/// Demographic extension of a trip. Each field is `None` when the cell was
/// blank or the column does not exist for the city.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rider {
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

/// One trip row with its calendar fields derived from the start time.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    end_time: Option<NaiveDateTime>,
    duration_secs: f64,
    start_station: String,
    end_station: String,
    user_type: Option<String>,
    rider: Rider,
    month: u32,
    weekday: Weekday,
    hour: u32,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        end_time: Option<NaiveDateTime>,
        duration_secs: f64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        user_type: Option<String>,
        rider: Rider,
    ) -> Self {
        Self {
            start_time,
            end_time,
            duration_secs,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type,
            rider,
            month: start_time.month(),
            weekday: start_time.weekday(),
            hour: start_time.hour(),
        }
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn start_station(&self) -> &str {
        &self.start_station
    }

    pub fn end_station(&self) -> &str {
        &self.end_station
    }

    pub fn user_type(&self) -> Option<&str> {
        self.user_type.as_deref()
    }

    pub fn rider(&self) -> &Rider {
        &self.rider
    }

    /// Calendar month of the start time, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }
}

/// Filtered trips for one city, in source order.
#[derive(Debug, Clone)]
pub struct Dataset {
    city: City,
    schema: Schema,
    trips: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(city: City, schema: Schema, trips: Vec<TripRecord>) -> Self {
        Self {
            city,
            schema,
            trips,
        }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn trips(&self) -> &[TripRecord] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Keeps only the trips for which `keep` returns true. Column layout and
    /// row order are unchanged.
    pub fn retain(mut self, keep: impl FnMut(&TripRecord) -> bool) -> Self {
        self.trips.retain(keep);
        self
    }
}
