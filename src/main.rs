//! CLI entry point for the club analytics tool.
//!
//! Loads exported visit, booking and review rows for one club, aggregates
//! them for a dashboard period and prints the summary as JSON.

mod infra;

use crate::infra::{ClubDirectory, ClubProfile};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use club_analytics::{
    analytics::{
        DailyPoint, Period, TrendPoint, calculate_analytics_metrics, generate_daily_visit_data,
        generate_trend_data,
    },
    clock::{Clock, FixedClock, SystemClock},
    output::{SummaryRow, append_record, print_pretty, write_json},
    parser::{load_bookings, load_reviews, load_visits},
    records::{RevenueData, Visit, parse_timestamp},
};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "club_analytics")]
#[command(about = "Dashboard analytics for a single club", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full metrics summary for a period
    Summarize {
        /// CSV of visits (created_at,user_id)
        #[arg(long)]
        visits: String,

        /// CSV of bookings (created_at)
        #[arg(long)]
        bookings: String,

        /// Optional CSV of reviews (rating[,created_at])
        #[arg(long)]
        reviews: Option<String>,

        /// Defaults to CLUB_ANALYTICS_PERIOD, then month
        #[arg(short, long, value_enum)]
        period: Option<Period>,

        /// Club id to look up in the club directory
        #[arg(long)]
        club_id: Option<String>,

        /// JSON club directory with pricing and rating per club
        #[arg(long)]
        clubs: Option<String>,

        /// Overrides the directory's price per visit
        #[arg(long)]
        price_per_visit: Option<f64>,

        /// Overrides the directory's average rating
        #[arg(long)]
        avg_rating: Option<f64>,

        /// Freeze "now" (RFC 3339 or YYYY-MM-DD) for reproducible output
        #[arg(long)]
        now: Option<String>,

        /// CSV file to append the headline row to
        #[arg(short, long)]
        output: Option<String>,

        /// Log the summary with debug formatting instead of printing JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Print only the trend and daily chart series
    Series {
        /// CSV of visits (created_at,user_id)
        #[arg(long)]
        visits: String,

        /// Defaults to CLUB_ANALYTICS_PERIOD, then month
        #[arg(short, long, value_enum)]
        period: Option<Period>,

        #[arg(long)]
        price_per_visit: Option<f64>,

        /// Freeze "now" (RFC 3339 or YYYY-MM-DD) for reproducible output
        #[arg(long)]
        now: Option<String>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SeriesOutput {
    period: Period,
    generated_at: DateTime<Utc>,
    trend_data: Vec<TrendPoint>,
    daily_visit_data: Vec<DailyPoint>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/club_analytics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("club_analytics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

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

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            visits,
            bookings,
            reviews,
            period,
            club_id,
            clubs,
            price_per_visit,
            avg_rating,
            now,
            output,
            pretty,
        } => {
            let period = resolve_period(period, std::env::var("CLUB_ANALYTICS_PERIOD").ok())?;
            let clock = clock_for(now.as_deref())?;
            let profile = resolve_profile(clubs.as_deref(), club_id.as_deref())?;

            let price = price_per_visit.or(profile.as_ref().and_then(|p| p.price_per_visit));
            let rating = avg_rating.or(profile.as_ref().and_then(|p| p.avg_rating));

            let visits = load_visits(&visits)?;
            let bookings = load_bookings(&bookings)?;
            let reviews = match reviews {
                Some(path) => load_reviews(&path)?,
                None => Vec::new(),
            };
            info!(
                visits = visits.len(),
                bookings = bookings.len(),
                reviews = reviews.len(),
                %period,
                "Rows loaded"
            );

            let revenue_data = revenue_for(&visits, price);
            let summary = calculate_analytics_metrics(
                &visits,
                &bookings,
                &reviews,
                revenue_data.as_ref(),
                period,
                rating,
                clock.now(),
            );

            if pretty {
                print_pretty(&summary);
            } else {
                write_json(std::io::stdout().lock(), &summary)?;
            }

            if let Some(path) = output {
                let mut row = SummaryRow::from_summary(&summary);
                if let Some(id) = &club_id {
                    row = row.with_club_id(id);
                }
                append_record(&path, &row)?;
                info!(path = %path, "Headline row appended");
            }
        }
        Commands::Series {
            visits,
            period,
            price_per_visit,
            now,
        } => {
            let period = resolve_period(period, std::env::var("CLUB_ANALYTICS_PERIOD").ok())?;
            let clock = clock_for(now.as_deref())?;
            let visits = load_visits(&visits)?;
            let revenue_data = revenue_for(&visits, price_per_visit);

            let now = clock.now();
            let series = SeriesOutput {
                period,
                generated_at: now,
                trend_data: generate_trend_data(&visits, revenue_data.as_ref(), period, now),
                daily_visit_data: generate_daily_visit_data(
                    &visits,
                    period.window_start(now),
                    now,
                ),
            };
            write_json(std::io::stdout().lock(), &series)?;
        }
    }

    Ok(())
}

/// Uses a frozen clock when `--now` is given, the system clock otherwise.
fn clock_for(now: Option<&str>) -> Result<Box<dyn Clock>> {
    match now {
        Some(raw) => {
            let at = parse_timestamp(raw)
                .with_context(|| format!("--now '{raw}' is not a recognised timestamp"))?;
            info!(now = %at, "Using frozen clock");
            Ok(Box::new(FixedClock(at)))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

/// `--period` wins over the environment default, which wins over month.
fn resolve_period(flag: Option<Period>, env_default: Option<String>) -> Result<Period> {
    match (flag, env_default) {
        (Some(period), _) => Ok(period),
        (None, Some(raw)) => raw
            .parse::<Period>()
            .with_context(|| format!("CLUB_ANALYTICS_PERIOD '{raw}' is not a period")),
        (None, None) => Ok(Period::Month),
    }
}

fn resolve_profile(clubs: Option<&str>, club_id: Option<&str>) -> Result<Option<ClubProfile>> {
    let (Some(path), Some(id)) = (clubs, club_id) else {
        return Ok(None);
    };

    let directory = ClubDirectory::load(path)?;
    let profile = directory.get(id).cloned();
    if profile.is_none() {
        warn!(club_id = id, path, "Club not found in directory, using defaults");
    }
    Ok(profile)
}

/// Revenue is only estimated when the club's price per visit is known.
fn revenue_for(visits: &[Visit], price: Option<f64>) -> Option<RevenueData> {
    price.map(|price_per_visit| RevenueData {
        visits: visits.to_vec(),
        price_per_visit,
    })
}
