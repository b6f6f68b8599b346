//! Interactive selection of a query.
//!
//! Each question is asked until the answer parses; EOF ends the session.

use std::future::Future;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use tracing::{debug, error};

use crate::error::ParseChoiceError;
use crate::query::{City, DayFilter, MonthFilter};

const SEPARATOR: &str = "----------------------------------------";

/// A full city/month/day selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

/// Asks `question` until the reply parses as `T`. Returns `None` on EOF.
pub fn ask<T, R, W>(input: &mut R, output: &mut W, question: &str) -> io::Result<Option<T>>
where
    T: FromStr<Err = ParseChoiceError>,
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{question} ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match line.parse::<T>() {
            Ok(value) => return Ok(Some(value)),
            Err(err) => {
                debug!(error = %err, "Rejected selection");
                writeln!(output, "Please try again.")?;
            }
        }
    }
}

/// Prompts for city, month and day. Returns `None` if input ends first.
pub fn ask_selection<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<Selection>> {
    writeln!(output, "Hello! Let's explore some US bikeshare data!")?;

    let Some(city) = ask(
        input,
        output,
        "Would you like to see data from Chicago, New York City, or Washington?",
    )?
    else {
        return Ok(None);
    };
    let Some(month) = ask(
        input,
        output,
        "What month would you like to filter by? Type all for no filter.",
    )?
    else {
        return Ok(None);
    };
    let Some(day) = ask(
        input,
        output,
        "What day would you like to filter by? Type all for no filter.",
    )?
    else {
        return Ok(None);
    };

    writeln!(output, "{SEPARATOR}")?;
    Ok(Some(Selection { city, month, day }))
}

/// True only when the user answers `yes`.
pub fn ask_restart<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    writeln!(output, "\nWould you like to restart? Enter yes or no.")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("yes"))
}

/// Runs queries until the user declines a restart or input ends.
///
/// A failed query is reported to the user and the session moves on to the
/// restart question; only I/O failures on the prompt streams end it early.
pub async fn run_session<R, W, F, Fut>(input: &mut R, output: &mut W, mut run: F) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(Selection) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    loop {
        let Some(selection) = ask_selection(input, output)? else {
            return Ok(());
        };

        if let Err(err) = run(selection).await {
            error!(city = %selection.city, error = %format!("{err:#}"), "Query failed");
            writeln!(output, "Could not complete the query: {err:#}")?;
        }

        if !ask_restart(input, output)? {
            return Ok(());
        }
    }
}
