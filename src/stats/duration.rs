use crate::stats::types::DurationStats;
use crate::trip::Dataset;

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Total travel time in days and mean trip time in minutes.
pub fn duration_stats(dataset: &Dataset) -> DurationStats {
    let trips = dataset.len();
    let total_secs: f64 = dataset.trips().iter().map(|t| t.duration_secs()).sum();

    let mean_minutes = if trips == 0 {
        None
    } else {
        Some(round_to(total_secs / trips as f64 / SECONDS_PER_MINUTE, 2))
    };

    DurationStats {
        trips,
        total_days: round_to(total_secs / SECONDS_PER_DAY, 1),
        mean_minutes,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
