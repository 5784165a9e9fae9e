// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for timestamp parsing and formatting.
//!
//! Trajectory files carry both a fractional day-number (days since
//! 1899-12-30) and a separate date/time pair. Label files use slash-separated
//! dates. The database stores `YYYY-MM-DD HH:MM:SS` text so that SQLite's
//! date functions work on it directly.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, ParseResult};

pub const SECONDS_PER_DAY: f64 = 86_400.0;

const DB_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LABEL_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Parse the separate date (`2008-10-23`) and time (`02:53:04`) columns of a
/// trajectory row.
pub fn parse_trackpoint_timestamp(date: &str, time: &str) -> ParseResult<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M:%S")?;
    Ok(date.and_time(time))
}

/// Parse a label-file timestamp (`2008/04/02 11:24:21`).
pub fn parse_label_timestamp(value: &str) -> ParseResult<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, LABEL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, DB_FORMAT))
}

/// Format a timestamp the way it is stored in the database.
pub fn format_db_timestamp(value: NaiveDateTime) -> String {
    value.format(DB_FORMAT).to_string()
}

/// Parse a timestamp read back from the database.
pub fn parse_db_timestamp(value: &str) -> ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DB_FORMAT)
}

/// Convert a timestamp into the fractional day-number used by trajectory
/// files.
pub fn to_day_number(value: NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    (value - epoch).num_seconds() as f64 / SECONDS_PER_DAY
}
