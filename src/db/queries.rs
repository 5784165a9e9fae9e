// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Analytical reports over the loaded dataset.
//!
//! Aggregations run in SQL. Ordered per-activity walks (distance, elevation
//! gain, time gaps) rely on trackpoint ids following file order.

use geo::{Distance, Haversine, Point};
use rusqlite::params;

use crate::db::sqlite::timestamp_column;
use crate::db::SqliteDb;
use crate::error::Result;
use crate::models::report::{
    ActivitiesPerUser, CloseUsersReport, DatasetCounts, DuplicateActivity, ElevationGain,
    InvalidActivities, ModeDistance, ModeUsage, MonthlyUserActivity, MostActiveMonth,
    UserActivityCount,
};
use crate::models::ColocationConfig;
use crate::services::colocation::CoLocationDetector;

/// Seconds since the Unix epoch of a stored timestamp column, as an integer.
macro_rules! epoch_secs {
    ($col:literal) => {
        concat!("CAST(strftime('%s', ", $col, ") AS INTEGER)")
    };
}

/// Read-only report runner borrowing an open database.
pub struct QueryEngine<'a> {
    db: &'a SqliteDb,
}

impl<'a> QueryEngine<'a> {
    pub fn new(db: &'a SqliteDb) -> Self {
        Self { db }
    }

    /// Row counts of the three tables.
    pub fn dataset_counts(&self) -> Result<DatasetCounts> {
        let counts = self.db.connection().query_row(
            "SELECT (SELECT COUNT(*) FROM User),
                    (SELECT COUNT(*) FROM Activity),
                    (SELECT COUNT(*) FROM TrackPoint)",
            [],
            |row| {
                Ok(DatasetCounts {
                    users: row.get::<_, i64>(0)? as u64,
                    activities: row.get::<_, i64>(1)? as u64,
                    trackpoints: row.get::<_, i64>(2)? as u64,
                })
            },
        )?;
        Ok(counts)
    }

    /// Average, minimum and maximum activities per user.
    pub fn activities_per_user(&self) -> Result<ActivitiesPerUser> {
        let stats = self.db.connection().query_row(
            "SELECT COALESCE(AVG(n), 0.0), COALESCE(MIN(n), 0), COALESCE(MAX(n), 0)
             FROM (
                 SELECT COUNT(Activity.id) AS n
                 FROM User LEFT JOIN Activity ON User.id = Activity.user_id
                 GROUP BY User.id
             )",
            [],
            |row| {
                Ok(ActivitiesPerUser {
                    average: row.get(0)?,
                    minimum: row.get::<_, i64>(1)? as u64,
                    maximum: row.get::<_, i64>(2)? as u64,
                })
            },
        )?;
        Ok(stats)
    }

    /// Users with the most activities. Ties break on user id.
    pub fn top_users_by_activities(&self, limit: usize) -> Result<Vec<UserActivityCount>> {
        let mut stmt = self.db.connection().prepare(
            "SELECT user_id, COUNT(*) AS n FROM Activity
             GROUP BY user_id
             ORDER BY n DESC, user_id ASC
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(UserActivityCount {
                    user_id: row.get(0)?,
                    activities: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Number of users with an activity ending on the calendar day after it
    /// started.
    pub fn users_with_overnight_activities(&self) -> Result<u64> {
        let count: i64 = self.db.connection().query_row(
            "SELECT COUNT(DISTINCT user_id) FROM Activity
             WHERE date(end_date_time) = date(start_date_time, '+1 day')",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Activities sharing user, start and end with at least one other.
    pub fn duplicate_activities(&self) -> Result<Vec<DuplicateActivity>> {
        let mut stmt = self.db.connection().prepare(
            "SELECT user_id, start_date_time, end_date_time, COUNT(*) AS n
             FROM Activity
             GROUP BY user_id, start_date_time, end_date_time
             HAVING n > 1
             ORDER BY user_id, start_date_time",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(DuplicateActivity {
                    user_id: row.get(0)?,
                    start_date_time: timestamp_column(row, 1)?,
                    end_date_time: timestamp_column(row, 2)?,
                    occurrences: row.get::<_, i64>(3)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Users that were close to each other in space and time.
    pub fn close_users(&self, config: &ColocationConfig) -> Result<CloseUsersReport> {
        let records = self.db.colocation_records()?;
        tracing::info!(records = records.len(), "Running co-location detection");

        let result = CoLocationDetector::new(*config).detect(&records);
        Ok(CloseUsersReport {
            close_users: result.appearance_count(),
            user_sets: result
                .user_sets
                .into_iter()
                .map(|set| set.into_iter().collect())
                .collect(),
        })
    }

    /// Users that never recorded an activity in `mode`.
    pub fn users_without_mode(&self, mode: &str) -> Result<Vec<String>> {
        let mut stmt = self.db.connection().prepare(
            "SELECT id FROM User
             WHERE id NOT IN (
                 SELECT user_id FROM Activity WHERE transportation_mode = ?1
             )
             ORDER BY id",
        )?;
        let ids = stmt
            .query_map(params![mode], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
    }

    /// Distinct users per labelled transportation mode.
    pub fn transportation_modes(&self) -> Result<Vec<ModeUsage>> {
        let mut stmt = self.db.connection().prepare(
            "SELECT transportation_mode, COUNT(DISTINCT user_id)
             FROM Activity
             WHERE transportation_mode IS NOT NULL
             GROUP BY transportation_mode
             ORDER BY transportation_mode",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ModeUsage {
                    transportation_mode: row.get(0)?,
                    users: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// The year-month with the most activity starts, with its two most
    /// active users and their recorded hours. None on an empty database.
    pub fn most_active_month(&self) -> Result<Option<MostActiveMonth>> {
        let conn = self.db.connection();

        let busiest = {
            let mut stmt = conn.prepare(
                "SELECT strftime('%Y-%m', start_date_time) AS ym, COUNT(*) AS n
                 FROM Activity
                 GROUP BY ym
                 ORDER BY n DESC, ym ASC
                 LIMIT 1",
            )?;
            let mut rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            rows.next().transpose()?
        };
        let Some((year_month, activities)) = busiest else {
            return Ok(None);
        };

        let sql = format!(
            "SELECT user_id, COUNT(*) AS n,
                    SUM({} - {}) / 3600.0 AS hours
             FROM Activity
             WHERE strftime('%Y-%m', start_date_time) = ?1
             GROUP BY user_id
             ORDER BY n DESC, user_id ASC
             LIMIT 2",
            epoch_secs!("end_date_time"),
            epoch_secs!("start_date_time"),
        );
        let mut stmt = conn.prepare(&sql)?;
        let top_users = stmt
            .query_map(params![year_month], |row| {
                Ok(MonthlyUserActivity {
                    user_id: row.get(0)?,
                    activities: row.get::<_, i64>(1)? as u64,
                    recorded_hours: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(MostActiveMonth {
            year_month,
            activities: activities as u64,
            top_users,
        }))
    }

    /// Great-circle distance a user covered in `mode` during `year`.
    ///
    /// Consecutive trackpoints of the same activity are summed; the
    /// distance between the last point of one activity and the first of the
    /// next is not.
    pub fn distance_by_mode(&self, user_id: &str, mode: &str, year: i32) -> Result<ModeDistance> {
        let mut stmt = self.db.connection().prepare(
            "SELECT TrackPoint.activity_id, TrackPoint.lat, TrackPoint.lon
             FROM TrackPoint
             JOIN Activity ON TrackPoint.activity_id = Activity.id
             WHERE Activity.user_id = ?1
               AND Activity.transportation_mode = ?2
               AND strftime('%Y', TrackPoint.date_time) = ?3
             ORDER BY TrackPoint.activity_id, TrackPoint.id",
        )?;
        let points = stmt
            .query_map(params![user_id, mode, format!("{year:04}")], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    Point::new(row.get::<_, f64>(2)?, row.get::<_, f64>(1)?),
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let meters: f64 = points
            .windows(2)
            .filter(|w| w[0].0 == w[1].0)
            .map(|w| Haversine.distance(w[0].1, w[1].1))
            .sum();

        Ok(ModeDistance {
            user_id: user_id.to_string(),
            transportation_mode: mode.to_string(),
            year,
            kilometers: meters / 1000.0,
        })
    }

    /// Users with the largest summed altitude gain. Unknown altitudes break
    /// the chain and contribute nothing.
    pub fn top_elevation_gain(&self, limit: usize) -> Result<Vec<ElevationGain>> {
        let mut stmt = self.db.connection().prepare(
            "SELECT user_id, SUM(diff) AS gain
             FROM (
                 SELECT Activity.user_id AS user_id,
                        TrackPoint.altitude - LAG(TrackPoint.altitude) OVER (
                            PARTITION BY TrackPoint.activity_id ORDER BY TrackPoint.id
                        ) AS diff
                 FROM TrackPoint
                 JOIN Activity ON TrackPoint.activity_id = Activity.id
             )
             WHERE diff > 0
             GROUP BY user_id
             ORDER BY gain DESC, user_id ASC
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(ElevationGain {
                    user_id: row.get(0)?,
                    total_elevation_gain: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Per user, the number of activities with at least one gap between
    /// consecutive trackpoints strictly longer than `gap_secs`.
    pub fn invalid_activities(&self, gap_secs: f64) -> Result<Vec<InvalidActivities>> {
        let sql = format!(
            "SELECT user_id, COUNT(DISTINCT activity_id) AS n
             FROM (
                 SELECT Activity.user_id AS user_id,
                        TrackPoint.activity_id AS activity_id,
                        {t} - LAG({t}) OVER (
                            PARTITION BY TrackPoint.activity_id ORDER BY TrackPoint.id
                        ) AS gap
                 FROM TrackPoint
                 JOIN Activity ON TrackPoint.activity_id = Activity.id
             )
             WHERE gap > ?1
             GROUP BY user_id
             ORDER BY n DESC, user_id ASC",
            t = epoch_secs!("TrackPoint.date_time"),
        );
        let mut stmt = self.db.connection().prepare(&sql)?;
        let rows = stmt
            .query_map(params![gap_secs], |row| {
                Ok(InvalidActivities {
                    user_id: row.get(0)?,
                    invalid_activities: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
