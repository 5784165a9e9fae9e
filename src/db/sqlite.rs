// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite client wrapper with typed operations.
//!
//! Provides:
//! - Schema provisioning (fatal on failure)
//! - Bulk loading of users, activities and trackpoints, one transaction per
//!   table, failures reported per table
//! - Typed reads used by the analytics

use std::path::Path;
use std::time::Instant;

use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::db::{tables, SCHEMA};
use crate::error::{AppError, Result};
use crate::models::{Activity, ColocationRecord, TrackPoint, User};
use crate::services::dataset::Dataset;
use crate::time_utils::{format_db_timestamp, parse_db_timestamp};

/// Outcome of loading one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLoad {
    pub table: &'static str,
    /// Rows written (0 on failure)
    pub rows: usize,
    pub elapsed_secs: f64,
    pub error: Option<String>,
}

/// Result of a full dataset load.
///
/// A failed table does not stop the others from being attempted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub tables: Vec<TableLoad>,
}

impl LoadReport {
    /// Returns true if every table loaded.
    pub fn is_complete_success(&self) -> bool {
        self.tables.iter().all(|t| t.error.is_none())
    }

    /// Tables that failed to load.
    pub fn failed_tables(&self) -> Vec<&'static str> {
        self.tables
            .iter()
            .filter(|t| t.error.is_some())
            .map(|t| t.table)
            .collect()
    }
}

/// SQLite database client.
pub struct SqliteDb {
    conn: Connection,
}

impl SqliteDb {
    /// Open (or create) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), "Opened SQLite database");
        Self::with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Drop and recreate all tables.
    pub fn provision_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .map_err(|e| AppError::Schema(e.to_string()))?;
        tracing::info!("Schema provisioned");
        Ok(())
    }

    // ─── Bulk Loading ────────────────────────────────────────────

    /// Load a whole dataset, table by table.
    pub fn load_dataset(&mut self, dataset: &Dataset) -> LoadReport {
        let mut report = LoadReport::default();
        report.tables.push(timed(tables::USER, || {
            self.insert_users(&dataset.users)
        }));
        report.tables.push(timed(tables::ACTIVITY, || {
            self.insert_activities(&dataset.activities)
        }));
        report.tables.push(timed(tables::TRACKPOINT, || {
            self.insert_trackpoints(&dataset.trackpoints)
        }));
        report
    }

    // Bulk inserts reuse one prepared statement per table inside a single
    // transaction, so rows are only parsed once and committed together.

    pub fn insert_users(&mut self, users: &[User]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO User (id, has_labels) VALUES (?1, ?2)")?;
            for user in users {
                stmt.execute(params![user.id, user.has_labels])?;
            }
        }
        tx.commit()?;
        Ok(users.len())
    }

    pub fn insert_activities(&mut self, activities: &[Activity]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO Activity (id, user_id, transportation_mode, start_date_time, end_date_time)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for activity in activities {
                stmt.execute(params![
                    activity.id as i64,
                    activity.user_id,
                    activity.transportation_mode,
                    format_db_timestamp(activity.start_date_time),
                    format_db_timestamp(activity.end_date_time),
                ])?;
            }
        }
        tx.commit()?;
        Ok(activities.len())
    }

    pub fn insert_trackpoints(&mut self, trackpoints: &[TrackPoint]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO TrackPoint (id, activity_id, lat, lon, altitude, date_days, date_time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for tp in trackpoints {
                stmt.execute(params![
                    tp.id as i64,
                    tp.activity_id as i64,
                    tp.lat,
                    tp.lon,
                    tp.altitude,
                    tp.date_days,
                    format_db_timestamp(tp.date_time),
                ])?;
            }
        }
        tx.commit()?;
        Ok(trackpoints.len())
    }

    // ─── Deletion ────────────────────────────────────────────────

    /// Delete a user; activities and trackpoints go with it.
    ///
    /// Returns false if the user did not exist.
    pub fn delete_user(&self, user_id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM User WHERE id = ?1", params![user_id])?;
        tracing::info!(user_id, deleted = deleted > 0, "User deletion complete");
        Ok(deleted > 0)
    }

    // ─── Reads ───────────────────────────────────────────────────

    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, has_labels FROM User WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![user_id], |row| {
            Ok(User {
                id: row.get(0)?,
                has_labels: row.get(1)?,
            })
        })?;
        Ok(rows.next().transpose()?)
    }

    /// Activities of a user, ordered by id.
    pub fn activities_for_user(&self, user_id: &str) -> Result<Vec<Activity>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, transportation_mode, start_date_time, end_date_time
             FROM Activity WHERE user_id = ?1 ORDER BY id",
        )?;
        let activities = stmt
            .query_map(params![user_id], activity_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(activities)
    }

    /// Trackpoints of an activity, ordered by id.
    pub fn trackpoints_for_activity(&self, activity_id: u64) -> Result<Vec<TrackPoint>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, activity_id, lat, lon, altitude, date_days, date_time
             FROM TrackPoint WHERE activity_id = ?1 ORDER BY id",
        )?;
        let trackpoints = stmt
            .query_map(params![activity_id as i64], |row| {
                Ok(TrackPoint {
                    id: row.get::<_, i64>(0)? as u64,
                    activity_id: row.get::<_, i64>(1)? as u64,
                    lat: row.get(2)?,
                    lon: row.get(3)?,
                    altitude: row.get(4)?,
                    date_days: row.get(5)?,
                    date_time: timestamp_column(row, 6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(trackpoints)
    }

    /// Joined user/activity/trackpoint rows for co-location detection.
    pub fn colocation_records(&self) -> Result<Vec<ColocationRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT Activity.user_id, TrackPoint.activity_id, TrackPoint.id,
                    TrackPoint.lat, TrackPoint.lon, TrackPoint.date_days
             FROM TrackPoint
             JOIN Activity ON TrackPoint.activity_id = Activity.id
             ORDER BY TrackPoint.id",
        )?;
        let records = stmt
            .query_map([], |row| {
                Ok(ColocationRecord {
                    user_id: row.get(0)?,
                    activity_id: row.get::<_, i64>(1)? as u64,
                    trackpoint_id: row.get::<_, i64>(2)? as u64,
                    lat: row.get(3)?,
                    lon: row.get(4)?,
                    date_days: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}

/// Run one table load, logging its outcome.
fn timed(table: &'static str, load: impl FnOnce() -> Result<usize>) -> TableLoad {
    let started = Instant::now();
    let result = load();
    let elapsed_secs = started.elapsed().as_secs_f64();

    match result {
        Ok(rows) => {
            tracing::info!(table, rows, elapsed_secs, "Table loaded");
            TableLoad {
                table,
                rows,
                elapsed_secs,
                error: None,
            }
        }
        Err(e) => {
            tracing::error!(table, error = %e, "Table load failed");
            TableLoad {
                table,
                rows: 0,
                elapsed_secs,
                error: Some(e.to_string()),
            }
        }
    }
}

pub(crate) fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get::<_, i64>(0)? as u64,
        user_id: row.get(1)?,
        transportation_mode: row.get(2)?,
        start_date_time: timestamp_column(row, 3)?,
        end_date_time: timestamp_column(row, 4)?,
    })
}

/// Read a stored `YYYY-MM-DD HH:MM:SS` text column.
pub(crate) fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let text: String = row.get(idx)?;
    parse_db_timestamp(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
