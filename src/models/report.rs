// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Row types returned by the query engine.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Number of rows in each table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetCounts {
    pub users: u64,
    pub activities: u64,
    pub trackpoints: u64,
}

/// Activities-per-user distribution (users without activities count as 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivitiesPerUser {
    pub average: f64,
    pub minimum: u64,
    pub maximum: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivityCount {
    pub user_id: String,
    pub activities: u64,
}

/// A (user, start, end) triple that occurs on more than one activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateActivity {
    pub user_id: String,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
    pub occurrences: u64,
}

/// Distinct users per transportation mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeUsage {
    pub transportation_mode: String,
    pub users: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyUserActivity {
    pub user_id: String,
    pub activities: u64,
    pub recorded_hours: f64,
}

/// The busiest year-month and its two most active users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostActiveMonth {
    /// "YYYY-MM"
    pub year_month: String,
    pub activities: u64,
    pub top_users: Vec<MonthlyUserActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationGain {
    pub user_id: String,
    /// Summed positive altitude differences, in the raw altitude unit (feet)
    pub total_elevation_gain: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidActivities {
    pub user_id: String,
    pub invalid_activities: u64,
}

/// Co-location report: per-set user appearance count plus the sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseUsersReport {
    pub close_users: usize,
    pub user_sets: Vec<Vec<String>>,
}

/// Distance covered by one user in one mode during one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeDistance {
    pub user_id: String,
    pub transportation_mode: String,
    pub year: i32,
    pub kilometers: f64,
}
