use crate::query::month_from_number;
use crate::stats::frequency::FrequencyTable;
use crate::stats::types::TimeStats;
use crate::trip::Dataset;

/// Most frequent month, day of week and start hour.
pub fn time_stats(dataset: &Dataset) -> TimeStats {
    let trips = dataset.trips();

    let months: FrequencyTable<u32> = trips.iter().map(|t| t.month()).collect();
    let days: FrequencyTable<_> = trips.iter().map(|t| t.weekday()).collect();
    let hours: FrequencyTable<u32> = trips.iter().map(|t| t.hour()).collect();

    TimeStats {
        most_common_month: months.mode().and_then(|&m| month_from_number(m)),
        most_common_day: days.mode().copied(),
        most_common_hour: hours.mode().copied(),
    }
}
