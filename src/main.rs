// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GeoLife-Tracker CLI
//!
//! `geolife-tracker [setup|query|all]`
//!
//! - `setup`: provision the schema, ingest the dataset and load it
//! - `query`: run every report and print each as one JSON line on stdout
//! - `all` (default): both

use anyhow::{bail, Context};
use geolife_tracker::{
    config::Config,
    db::{QueryEngine, SqliteDb},
    services::DatasetReader,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MODE_WITHOUT_USERS: &str = "taxi";
const DISTANCE_USER: &str = "112";
const DISTANCE_MODE: &str = "walk";
const DISTANCE_YEAR: i32 = 2008;
const TOP_USERS_LIMIT: usize = 10;
const ELEVATION_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Setup,
    Query,
    All,
}

impl Command {
    fn parse(arg: Option<&str>) -> anyhow::Result<Self> {
        match arg {
            None | Some("all") => Ok(Command::All),
            Some("setup") => Ok(Command::Setup),
            Some("query") => Ok(Command::Query),
            Some(other) => bail!("unknown command '{other}', expected setup, query or all"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let arg = std::env::args().nth(1);
    let command = Command::parse(arg.as_deref())?;

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        dataset = %config.dataset_dir.display(),
        database = %config.database_path.display(),
        ?command,
        "Starting GeoLife-Tracker"
    );

    let mut db = SqliteDb::open(&config.database_path)
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;

    if matches!(command, Command::Setup | Command::All) {
        setup(&config, &mut db)?;
    }
    if matches!(command, Command::Query | Command::All) {
        run_reports(&config, &db)?;
    }
    Ok(())
}

/// Provision the schema and load the dataset.
fn setup(config: &Config, db: &mut SqliteDb) -> anyhow::Result<()> {
    db.provision_schema().context("Failed to provision schema")?;

    let mut reader = DatasetReader::new(&config.dataset_dir, config.max_trackpoints);
    let dataset = reader
        .read()
        .with_context(|| format!("Failed to ingest {}", config.dataset_dir.display()))?;

    let stats = reader.stats();
    tracing::info!(
        files_read = stats.files_read,
        files_skipped = stats.files_skipped,
        labelled_activities = stats.labelled_activities,
        "Ingestion complete"
    );

    let report = db.load_dataset(&dataset);
    if !report.is_complete_success() {
        tracing::warn!(failed = ?report.failed_tables(), "Dataset loaded with failures");
    }
    Ok(())
}

/// Run every report in order and print it.
fn run_reports(config: &Config, db: &SqliteDb) -> anyhow::Result<()> {
    let engine = QueryEngine::new(db);

    emit("dataset_counts", &engine.dataset_counts()?)?;
    emit("activities_per_user", &engine.activities_per_user()?)?;
    emit(
        "top_users_by_activities",
        &engine.top_users_by_activities(TOP_USERS_LIMIT)?,
    )?;
    emit(
        "users_with_overnight_activities",
        &engine.users_with_overnight_activities()?,
    )?;
    emit("duplicate_activities", &engine.duplicate_activities()?)?;
    emit("close_users", &engine.close_users(&config.colocation)?)?;
    emit(
        "users_without_mode",
        &engine.users_without_mode(MODE_WITHOUT_USERS)?,
    )?;
    emit("transportation_modes", &engine.transportation_modes()?)?;
    emit("most_active_month", &engine.most_active_month()?)?;
    emit(
        "distance_by_mode",
        &engine.distance_by_mode(DISTANCE_USER, DISTANCE_MODE, DISTANCE_YEAR)?,
    )?;
    emit(
        "top_elevation_gain",
        &engine.top_elevation_gain(ELEVATION_LIMIT)?,
    )?;
    emit(
        "invalid_activities",
        &engine.invalid_activities(config.invalid_gap_secs)?,
    )?;
    Ok(())
}

/// One line of report output.
#[derive(Serialize)]
struct ReportLine<'a, T> {
    report: &'a str,
    result: &'a T,
}

/// Print one report as a JSON line.
fn emit<T: Serialize>(report: &str, result: &T) -> anyhow::Result<()> {
    let line = serde_json::to_string(&ReportLine { report, result })
        .with_context(|| format!("Failed to serialize {report}"))?;
    println!("{line}");
    Ok(())
}

/// Initialize structured JSON logging on stderr; stdout carries reports.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("geolife_tracker=debug,info")),
        )
        .with(format)
        .init();
}
