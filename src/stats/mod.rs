//! Descriptive statistics over a loaded [`Dataset`].
//!
//! Four read-only passes (travel times, stations, trip durations, users),
//! each timed on its own. They share nothing but the dataset, so they can
//! run one after another or side by side on the blocking pool.

pub mod duration;
pub mod frequency;
pub mod station;
pub mod time;
pub mod types;
pub mod users;

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::error::StatsError;
use crate::query::City;
use crate::trip::Dataset;

pub use duration::duration_stats;
pub use station::station_stats;
pub use time::time_stats;
pub use types::{BirthYearStats, DurationStats, StationPair, StationStats, TimeStats, UserStats};
pub use users::user_stats;

/// A pass result with the wall-clock time it took to compute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timed<T> {
    pub value: T,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    pub fn measure(pass: &'static str, f: impl FnOnce() -> T) -> Self {
        let started = Instant::now();
        let value = f();
        let elapsed = started.elapsed();
        debug!(pass, elapsed_us = elapsed.as_micros() as u64, "Statistics pass finished");
        Self { value, elapsed }
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Everything reported for one query.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub city: City,
    pub rows: usize,
    pub time: Timed<TimeStats>,
    pub stations: Timed<StationStats>,
    pub duration: Timed<DurationStats>,
    pub users: Timed<UserStats>,
}

/// Runs the four passes one after another on the current thread.
#[tracing::instrument(skip_all, fields(city = %dataset.city(), rows = dataset.len()))]
pub fn run(dataset: &Dataset) -> Report {
    Report {
        city: dataset.city(),
        rows: dataset.len(),
        time: Timed::measure("time", || time_stats(dataset)),
        stations: Timed::measure("stations", || station_stats(dataset)),
        duration: Timed::measure("duration", || duration_stats(dataset)),
        users: Timed::measure("users", || user_stats(dataset)),
    }
}

/// Runs the four passes concurrently on tokio's blocking pool.
///
/// With a `timeout`, a pass that has not finished in time fails the run
/// with [`StatsError::Timeout`]. The pass itself is not interrupted.
#[tracing::instrument(skip_all, fields(city = %dataset.city(), rows = dataset.len()))]
pub async fn run_concurrent(
    dataset: Arc<Dataset>,
    timeout: Option<Duration>,
) -> Result<Report, StatsError> {
    let (time, stations, duration, users) = tokio::try_join!(
        spawn_pass("time", dataset.clone(), timeout, time_stats),
        spawn_pass("stations", dataset.clone(), timeout, station_stats),
        spawn_pass("duration", dataset.clone(), timeout, duration_stats),
        spawn_pass("users", dataset.clone(), timeout, user_stats),
    )?;

    Ok(Report {
        city: dataset.city(),
        rows: dataset.len(),
        time,
        stations,
        duration,
        users,
    })
}

async fn spawn_pass<T, F>(
    pass: &'static str,
    dataset: Arc<Dataset>,
    timeout: Option<Duration>,
    f: F,
) -> Result<Timed<T>, StatsError>
where
    T: Send + 'static,
    F: FnOnce(&Dataset) -> T + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(move || Timed::measure(pass, || f(&dataset)));

    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, handle)
            .await
            .map_err(|_| StatsError::Timeout { pass })?,
        None => handle.await,
    };

    joined.map_err(|source| StatsError::Task { pass, source })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_util::{dataset, trip_at, trip_between};

    fn sample() -> Dataset {
        dataset(vec![
            trip_between("A", "X"),
            trip_between("A", "Y"),
            trip_at("2017-04-05 12:00:00"),
        ])
    }

    #[test]
    fn test_run_empty_dataset_does_not_panic() {
        let report = run(&dataset(vec![]));

        assert_eq!(report.rows, 0);
        assert_eq!(report.time.value.most_common_month, None);
        assert_eq!(report.stations.value.most_common_trip, None);
        assert_eq!(report.duration.value.mean_minutes, None);
        assert!(report.users.value.user_types.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let dataset = Arc::new(sample());
        let sequential = run(&dataset);
        let concurrent = run_concurrent(dataset, Some(Duration::from_secs(30)))
            .await
            .unwrap();

        assert_eq!(concurrent.rows, sequential.rows);
        assert_eq!(concurrent.time.value, sequential.time.value);
        assert_eq!(concurrent.stations.value, sequential.stations.value);
        assert_eq!(concurrent.duration.value, sequential.duration.value);
        assert_eq!(concurrent.users.value, sequential.users.value);
    }

    #[test]
    fn test_report_serializes_elapsed_as_seconds() {
        let report = run(&sample());
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["time"]["elapsed_secs"].is_f64());
        assert_eq!(json["city"], "washington");
        assert_eq!(json["stations"]["value"]["most_common_start"], "A");
    }

    #[test]
    fn test_report_serializes_month_and_day_names() {
        let report = run(&dataset(vec![trip_at("2017-03-06 08:00:00")]));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["time"]["value"]["most_common_month"], "March");
        assert_eq!(json["time"]["value"]["most_common_day"], "Monday");
        assert_eq!(json["time"]["value"]["most_common_hour"], 8);

        let empty = serde_json::to_value(run(&dataset(vec![]))).unwrap();
        assert!(empty["time"]["value"]["most_common_month"].is_null());
        assert!(empty["time"]["value"]["most_common_day"].is_null());
    }
}
