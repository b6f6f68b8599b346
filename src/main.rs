//! CLI entry point for the bikeshare statistics tool.
//!
//! Runs a single query when `--city` is given, otherwise walks the user
//! through the interactive prompts and offers to restart after each report.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use bikeshare_stats::{
    config::Settings,
    loader::load,
    output::{SummaryRecord, append_summary, render_json, render_text},
    prompt::{Selection, run_session},
    query::{City, DayFilter, MonthFilter},
    stats::{self, Report},
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Descriptive statistics over US bikeshare trip data", long_about = None)]
struct Cli {
    /// City to analyze: chicago, "new york city" or washington. Prompts when omitted.
    #[arg(short, long)]
    city: Option<City>,

    /// Month to filter by (january..june), or all
    #[arg(short, long, default_value = "all")]
    month: MonthFilter,

    /// Day of week to filter by (monday..sunday), or all
    #[arg(short, long, default_value = "all")]
    day: DayFilter,

    /// Directory containing the city CSV files [env: BIKESHARE_DATA_DIR]
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// CSV file to append a one-line summary of each query to
    #[arg(long, value_name = "FILE")]
    summary_csv: Option<PathBuf>,

    /// Run the four statistics passes concurrently
    #[arg(long, default_value_t = false)]
    concurrent: bool,

    /// Per-pass time limit in seconds when running concurrently
    #[arg(long, value_name = "SECS")]
    pass_timeout_secs: Option<u64>,
}

impl Cli {
    fn pass_timeout(&self) -> Option<Duration> {
        self.pass_timeout_secs.map(Duration::from_secs)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let settings = Settings::from_env().with_data_dir(cli.data_dir.clone());

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    info!(data_dir = %settings.data_dir.display(), "Starting bikeshare_stats");

    match cli.city {
        Some(city) => {
            let selection = Selection {
                city,
                month: cli.month,
                day: cli.day,
            };
            run_query(&cli, &settings, selection).await?;
        }
        None => interactive(&cli, &settings).await?,
    }

    Ok(())
}

/// Prompt, report, and offer a restart until the user declines or input ends.
async fn interactive(cli: &Cli, settings: &Settings) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    run_session(&mut input, &mut output, |selection| {
        run_query(cli, settings, selection)
    })
    .await?;

    Ok(())
}

/// Loads the selected data, computes every statistic and prints the report.
#[tracing::instrument(skip(cli, settings), fields(city = %selection.city))]
async fn run_query(cli: &Cli, settings: &Settings, selection: Selection) -> Result<()> {
    let dataset = load(
        &settings.data_dir,
        selection.city,
        selection.month,
        selection.day,
    )?;

    let report: Report = if cli.concurrent {
        stats::run_concurrent(Arc::new(dataset), cli.pass_timeout()).await?
    } else {
        stats::run(&dataset)
    };

    let mut stdout = io::stdout();
    if cli.json {
        writeln!(stdout, "{}", render_json(&report, selection.month, selection.day)?)?;
    } else {
        write!(stdout, "{}", render_text(&report))?;
    }
    stdout.flush()?;

    if let Some(path) = &cli.summary_csv {
        append_summary(path, &SummaryRecord::new(&report, selection.month, selection.day))?;
        info!(path = %path.display(), "Summary appended");
    }

    Ok(())
}
