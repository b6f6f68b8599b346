//! Query selections: which city to load and which month/day to keep.
//!
//! All three types parse case-insensitively from user text. A failed parse
//! is the signal for the prompt loop to ask again.

use std::fmt;
use std::str::FromStr;

use chrono::{Month, Weekday};
use serde::Serialize;

use crate::error::ParseChoiceError;

const CITIES: &[&str] = &["chicago", "new york city", "washington"];

/// Months covered by the source data, in calendar order.
pub const MONTHS: &[&str] = &["january", "february", "march", "april", "may", "june"];

const DAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// One of the three cities with trip data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// File name of the city's trip data inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(ParseChoiceError::new(s, CITIES)),
        }
    }
}

/// Month restriction for a query. `Month` holds a 1-based month number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

impl MonthFilter {
    pub fn matches(&self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => *m == month,
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Month(m) => match MONTHS.get((*m as usize).wrapping_sub(1)) {
                Some(name) => f.write_str(name),
                None => write!(f, "month {m}"),
            },
        }
    }
}

impl FromStr for MonthFilter {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = normalize(s);
        if value == "all" {
            return Ok(MonthFilter::All);
        }
        MONTHS
            .iter()
            .position(|m| *m == value)
            .map(|idx| MonthFilter::Month(idx as u32 + 1))
            .ok_or_else(|| ParseChoiceError::new(s, &with_all(MONTHS)))
    }
}

/// Day-of-week restriction for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Day(Weekday),
}

impl DayFilter {
    pub fn matches(&self, day: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Day(d) => *d == day,
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Day(d) => f.write_str(DAYS[d.num_days_from_monday() as usize]),
        }
    }
}

impl FromStr for DayFilter {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = normalize(s);
        if value == "all" {
            return Ok(DayFilter::All);
        }
        // chrono's Weekday parser also takes abbreviations; only full names are valid here.
        if !DAYS.contains(&value.as_str()) {
            return Err(ParseChoiceError::new(s, &with_all(DAYS)));
        }
        value
            .parse::<Weekday>()
            .map(DayFilter::Day)
            .map_err(|_| ParseChoiceError::new(s, &with_all(DAYS)))
    }
}

/// Full English weekday name, e.g. `Monday`.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Calendar month for a 1-based month number.
pub fn month_from_number(month: u32) -> Option<Month> {
    u8::try_from(month).ok().and_then(|m| Month::try_from(m).ok())
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn with_all(values: &[&'static str]) -> Vec<&'static str> {
    std::iter::once("all").chain(values.iter().copied()).collect()
}
