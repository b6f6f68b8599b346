use crate::stats::frequency::FrequencyTable;
use crate::stats::types::{StationPair, StationStats};
use crate::trip::Dataset;

/// Most popular start station, end station and start/end combination.
pub fn station_stats(dataset: &Dataset) -> StationStats {
    let mut starts = FrequencyTable::new();
    let mut ends = FrequencyTable::new();
    let mut pairs = FrequencyTable::new();

    for trip in dataset.trips() {
        starts.add(trip.start_station());
        ends.add(trip.end_station());
        pairs.add((trip.start_station(), trip.end_station()));
    }

    StationStats {
        most_common_start: starts.mode().map(|s| s.to_string()),
        most_common_end: ends.mode().map(|s| s.to_string()),
        most_common_trip: pairs.mode().map(|(start, end)| StationPair {
            start: start.to_string(),
            end: end.to_string(),
        }),
    }
}
