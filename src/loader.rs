//! Loads a city's trip file into a filtered [`Dataset`].
//!
//! Columns are looked up by header name so the optional rider columns can be
//! absent for a city. Every start time must parse; a single bad row fails the
//! whole load.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::StringRecord;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::query::{City, DayFilter, MONTHS, MonthFilter};
use crate::trip::{Dataset, Rider, Schema, TripRecord};

const START_TIME: &str = "Start Time";
const END_TIME: &str = "End Time";
const TRIP_DURATION: &str = "Trip Duration";
const START_STATION: &str = "Start Station";
const END_STATION: &str = "End Station";
const USER_TYPE: &str = "User Type";
const GENDER: &str = "Gender";
const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Loads `city` from `data_dir` and applies the month and day filters.
///
/// # Errors
///
/// Returns [`LoadError::DataSource`] if the file cannot be opened and
/// [`LoadError::MalformedTimestamp`] if any start time does not parse.
#[tracing::instrument(skip_all, fields(city = %city, month = %month, day = %day))]
pub fn load(
    data_dir: &Path,
    city: City,
    month: MonthFilter,
    day: DayFilter,
) -> Result<Dataset, LoadError> {
    let path = data_dir.join(city.file_name());
    debug!(path = %path.display(), "Opening trip data");

    let file = File::open(&path).map_err(|source| LoadError::DataSource {
        path: path.clone(),
        source,
    })?;

    let dataset = load_from_reader(city, file)?;
    let rows_read = dataset.len();
    let dataset = apply_filters(dataset, month, day);

    info!(rows_read, rows_kept = dataset.len(), "Trip data loaded");
    Ok(dataset)
}

/// Parses CSV trip data from any reader, without filtering.
pub fn load_from_reader<R: Read>(city: City, reader: R) -> Result<Dataset, LoadError> {
    // Rows must have as many fields as the header; a short row fails the load.
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = Columns::resolve(&headers)?;

    let mut trips = Vec::new();
    for result in reader.records() {
        let record = result?;
        trips.push(columns.parse_row(&record)?);
    }

    Ok(Dataset::new(city, columns.schema(), trips))
}

/// Keeps the trips whose derived month and weekday match the filters.
///
/// # Panics
///
/// Panics if a month filter lies outside January..June. Selections are
/// validated before they reach the loader.
pub fn apply_filters(dataset: Dataset, month: MonthFilter, day: DayFilter) -> Dataset {
    if let MonthFilter::Month(m) = month {
        assert!(
            (1..=MONTHS.len() as u32).contains(&m),
            "month filter {m} is outside the months covered by the trip data"
        );
    }
    if month == MonthFilter::All && day == DayFilter::All {
        return dataset;
    }
    dataset.retain(|trip| month.matches(trip.month()) && day.matches(trip.weekday()))
}

/// Positions of the known columns within a file's header.
struct Columns {
    start_time: usize,
    end_time: usize,
    duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let header_map = build_header_map(headers);
        let required = |name: &'static str| {
            header_map
                .get(name)
                .copied()
                .ok_or(LoadError::MissingColumn(name))
        };

        Ok(Self {
            start_time: required(START_TIME)?,
            end_time: required(END_TIME)?,
            duration: required(TRIP_DURATION)?,
            start_station: required(START_STATION)?,
            end_station: required(END_STATION)?,
            user_type: required(USER_TYPE)?,
            gender: header_map.get(GENDER).copied(),
            birth_year: header_map.get(BIRTH_YEAR).copied(),
        })
    }

    fn schema(&self) -> Schema {
        Schema {
            gender: self.gender.is_some(),
            birth_year: self.birth_year.is_some(),
        }
    }

    fn parse_row(&self, record: &StringRecord) -> Result<TripRecord, LoadError> {
        let line = record.position().map_or(0, |p| p.line());

        let raw_start = record.get(self.start_time).unwrap_or("");
        let start_time =
            parse_timestamp(raw_start).ok_or_else(|| LoadError::MalformedTimestamp {
                line,
                value: raw_start.to_string(),
            })?;
        let end_time = get_optional(record, Some(self.end_time)).and_then(parse_timestamp);

        let raw_duration = record.get(self.duration).unwrap_or("");
        let duration_secs = raw_duration
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| LoadError::InvalidDuration {
                line,
                value: raw_duration.to_string(),
            })?;

        let rider = Rider {
            gender: get_optional(record, self.gender).map(str::to_string),
            birth_year: get_optional(record, self.birth_year).and_then(parse_year),
        };

        Ok(TripRecord::new(
            start_time,
            end_time,
            duration_secs,
            get_required(record, self.start_station, START_STATION, line)?,
            get_required(record, self.end_station, END_STATION, line)?,
            get_optional(record, Some(self.user_type)).map(str::to_string),
            rider,
        ))
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().trim_start_matches('\u{feff}').to_string(), idx))
        .collect()
}

fn get_required<'a>(
    record: &'a StringRecord,
    idx: usize,
    column: &'static str,
    line: u64,
) -> Result<&'a str, LoadError> {
    get_optional(record, Some(idx)).ok_or(LoadError::MissingValue { line, column })
}

fn get_optional(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    record.get(idx?).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
}

// Source files store birth years as decimals, e.g. "1989.0".
fn parse_year(s: &str) -> Option<i32> {
    let year = s.parse::<f64>().ok()?;
    year.is_finite().then_some(year.trunc() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Subscriber,Male,1981.0
304487,2017-03-06 13:49:38,2017-03-06 13:55:28,350,Christiana Ave & Lawrence Ave,St. Louis Ave & Balmoral Ave,Subscriber,,
";

    const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
482740,2017-03-11 10:40:00,2017-03-11 10:46:00,402.549,Yuma St & Tenley Circle NW,Connecticut Ave & Yuma St NW,
";

    fn chicago() -> Dataset {
        load_from_reader(City::Chicago, CHICAGO.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_full_schema() {
        let dataset = chicago();

        assert_eq!(dataset.len(), 4);
        assert_eq!(
            dataset.schema(),
            Schema {
                gender: true,
                birth_year: true
            }
        );

        let first = &dataset.trips()[0];
        assert_eq!(first.month(), 6);
        assert_eq!(first.weekday(), Weekday::Fri);
        assert_eq!(first.hour(), 15);
        assert_eq!(first.duration_secs(), 321.0);
        assert_eq!(first.start_station(), "Wood St & Hubbard St");
        assert_eq!(first.rider().birth_year, Some(1992));
        assert_eq!(first.rider().gender.as_deref(), Some("Male"));
    }

    #[test]
    fn test_blank_rider_cells_are_absent() {
        let dataset = chicago();
        let last = &dataset.trips()[3];

        assert_eq!(last.rider(), &Rider::default());
    }

    #[test]
    fn test_load_without_demographic_columns() {
        let dataset = load_from_reader(City::Washington, WASHINGTON.as_bytes()).unwrap();

        assert_eq!(dataset.schema(), Schema::default());
        assert_eq!(dataset.trips()[0].duration_secs(), 489.066);
        assert_eq!(dataset.trips()[1].user_type(), None);
    }

    #[test]
    fn test_malformed_start_time_fails_load() {
        let data = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:07:57,2017-01-01 00:20:53,776,A,B,Customer
not a time,2017-01-01 00:20:53,776,A,B,Customer
";
        let err = load_from_reader(City::Washington, data.as_bytes()).unwrap_err();

        match err {
            LoadError::MalformedTimestamp { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "not a time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_required_column() {
        let data = "Start Time,End Time,Trip Duration,Start Station,User Type\n";
        let err = load_from_reader(City::Washington, data.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::MissingColumn("End Station")));
    }

    #[test]
    fn test_short_row_fails_load() {
        let data = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-03-06 08:00:00,2017-03-06 08:10:00,600
";
        let err = load_from_reader(City::Washington, data.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn test_blank_station_fails_load() {
        let data = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-03-06 08:00:00,2017-03-06 08:10:00,600,A,B,Subscriber
2017-03-06 09:00:00,2017-03-06 09:10:00,600,,B,Subscriber
";
        let err = load_from_reader(City::Washington, data.as_bytes()).unwrap_err();

        match err {
            LoadError::MissingValue { line, column } => {
                assert_eq!(line, 3);
                assert_eq!(column, "Start Station");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_duration_rejected() {
        let data = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:07:57,2017-01-01 00:20:53,-5,A,B,Customer
";
        let err = load_from_reader(City::Washington, data.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::InvalidDuration { .. }));
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2017-01-01 00:07:57").is_some());
        assert!(parse_timestamp("2017-01-01 00:07:57.250").is_some());
        assert!(parse_timestamp("2017-01-01T00:07:57").is_some());
        assert!(parse_timestamp("2017-01-01 00:07").is_some());
        assert!(parse_timestamp("01/01/2017").is_none());
    }

    #[test]
    fn test_filter_by_month() {
        let dataset = apply_filters(chicago(), MonthFilter::Month(5), DayFilter::All);

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.trips()[0].start_station(), "Theater on the Lake");
    }

    #[test]
    fn test_filter_by_day_and_month_intersect() {
        let dataset = apply_filters(chicago(), MonthFilter::Month(1), DayFilter::Day(Weekday::Wed));
        assert_eq!(dataset.len(), 1);

        let dataset = apply_filters(chicago(), MonthFilter::Month(1), DayFilter::Day(Weekday::Thu));
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_filter_all_keeps_everything_in_order() {
        let full = chicago();
        let filtered = apply_filters(full.clone(), MonthFilter::All, DayFilter::All);

        assert_eq!(filtered.trips(), full.trips());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = apply_filters(chicago(), MonthFilter::Month(6), DayFilter::Day(Weekday::Fri));
        let twice = apply_filters(once.clone(), MonthFilter::Month(6), DayFilter::Day(Weekday::Fri));

        assert_eq!(once.trips(), twice.trips());
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_month_filter_panics() {
        apply_filters(chicago(), MonthFilter::Month(7), DayFilter::All);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = std::env::temp_dir().join("bikeshare_stats_missing_dir");
        let err = load(&dir, City::Chicago, MonthFilter::All, DayFilter::All).unwrap_err();

        assert!(matches!(err, LoadError::DataSource { .. }));
    }
}
