//! Output formatting and persistence for query reports.
//!
//! Supports the plain-text report, JSON serialization, and CSV append of a
//! one-line summary per query.

use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::query::{DayFilter, MonthFilter, day_name};
use crate::stats::{DurationStats, Report, StationStats, Timed, TimeStats, UserStats};

const SEPARATOR: &str = "----------------------------------------";
const NO_DATA: &str = "no data";

/// Renders the human-readable report for one query.
pub fn render_text(report: &Report) -> String {
    TextReport(report).to_string()
}

/// Plain-text view of a [`Report`], one section per statistics pass.
pub struct TextReport<'a>(pub &'a Report);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        write_time(f, &report.time)?;
        write_stations(f, &report.stations)?;
        write_duration(f, &report.duration)?;
        write_users(f, &report.users)
    }
}

/// Renders the report as pretty-printed JSON, tagged with the filters used.
pub fn render_json(report: &Report, month: MonthFilter, day: DayFilter) -> Result<String> {
    #[derive(Serialize)]
    struct Tagged<'a> {
        month: String,
        day: String,
        #[serde(flatten)]
        report: &'a Report,
    }

    Ok(serde_json::to_string_pretty(&Tagged {
        month: month.to_string(),
        day: day.to_string(),
        report,
    })?)
}

/// One CSV row per query.
#[derive(Debug, Serialize)]
pub struct SummaryRecord {
    pub city: String,
    pub month: String,
    pub day: String,
    pub rows: usize,
    pub total_days: f64,
    pub mean_minutes: Option<f64>,
}

impl SummaryRecord {
    pub fn new(report: &Report, month: MonthFilter, day: DayFilter) -> Self {
        Self {
            city: report.city.to_string(),
            month: month.to_string(),
            day: day.to_string(),
            rows: report.rows,
            total_days: report.duration.value.total_days,
            mean_minutes: report.duration.value.mean_minutes,
        }
    }
}

/// Appends a [`SummaryRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &Path, record: &SummaryRecord) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending summary record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

fn or_no_data<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| v.to_string())
}

fn footer<T>(f: &mut fmt::Formatter<'_>, timed: &Timed<T>) -> fmt::Result {
    writeln!(f, "\nThis took {} seconds.", timed.elapsed.as_secs_f64())?;
    writeln!(f, "{SEPARATOR}")
}

fn write_time(f: &mut fmt::Formatter<'_>, timed: &Timed<TimeStats>) -> fmt::Result {
    let stats = &timed.value;
    writeln!(f, "\nCalculating The Most Frequent Times of Travel...\n")?;
    writeln!(
        f,
        "The most common month is: {}",
        or_no_data(stats.most_common_month.map(|m| m.name()))
    )?;
    writeln!(
        f,
        "The most common day is: {}",
        or_no_data(stats.most_common_day.map(day_name))
    )?;
    writeln!(
        f,
        "The most common hour is: {}",
        or_no_data(stats.most_common_hour)
    )?;
    footer(f, timed)
}

fn write_stations(f: &mut fmt::Formatter<'_>, timed: &Timed<StationStats>) -> fmt::Result {
    let stats = &timed.value;
    writeln!(f, "\nCalculating The Most Popular Stations and Trip...\n")?;
    writeln!(
        f,
        "The most common station to start at is: {}",
        or_no_data(stats.most_common_start.as_deref())
    )?;
    writeln!(
        f,
        "The most common station to end at is: {}",
        or_no_data(stats.most_common_end.as_deref())
    )?;
    let trip = stats
        .most_common_trip
        .as_ref()
        .map(|pair| format!("{} -> {}", pair.start, pair.end));
    writeln!(
        f,
        "The most frequently used combination of start and end stations is: {}",
        or_no_data(trip)
    )?;
    footer(f, timed)
}

fn write_duration(f: &mut fmt::Formatter<'_>, timed: &Timed<DurationStats>) -> fmt::Result {
    let stats = &timed.value;
    writeln!(f, "\nCalculating Trip Duration...\n")?;
    writeln!(f, "The total travel time is: {:.1} days.", stats.total_days)?;
    match stats.mean_minutes {
        Some(mean) => writeln!(f, "The average travel time is: {mean:.2} minutes.")?,
        None => writeln!(f, "The average travel time is: {NO_DATA}")?,
    }
    footer(f, timed)
}

fn write_users(f: &mut fmt::Formatter<'_>, timed: &Timed<UserStats>) -> fmt::Result {
    let stats = &timed.value;
    writeln!(f, "\nCalculating User Stats...\n")?;

    writeln!(f, "Counts of user types:")?;
    write_counts(f, &stats.user_types)?;

    match &stats.genders {
        Some(genders) => {
            writeln!(f, "Counts of gender:")?;
            write_counts(f, genders)?;
        }
        None => writeln!(f, "Gender data is not available for this city.")?,
    }

    match &stats.birth_years {
        Some(years) => {
            writeln!(f, "The earliest year of birth is: {}", or_no_data(years.earliest))?;
            writeln!(
                f,
                "The most recent year of birth is: {}",
                or_no_data(years.most_recent)
            )?;
            writeln!(
                f,
                "The most common year of birth is: {}",
                or_no_data(years.most_common)
            )?;
        }
        None => writeln!(f, "Birth year data is not available for this city.")?,
    }
    footer(f, timed)
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &[(String, usize)]) -> fmt::Result {
    if counts.is_empty() {
        writeln!(f, "  {NO_DATA}")?;
    }
    for (value, count) in counts {
        writeln!(f, "  {value}: {count}")?;
    }
    Ok(())
}
