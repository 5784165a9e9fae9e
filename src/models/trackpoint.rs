// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Raw trajectory samples and the stored trackpoints derived from them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Raw altitude value meaning "no altitude recorded".
pub const ALTITUDE_UNKNOWN_SENTINEL: f64 = -777.0;

/// One row of a trajectory file, as read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub lat: f64,
    pub lon: f64,
    /// Altitude in feet, possibly the -777 sentinel
    pub altitude: f64,
    /// Fractional days since 1899-12-30
    pub date_days: f64,
    pub date_time: NaiveDateTime,
}

/// Stored trackpoint record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Run-wide unique id, allocated in ingestion order
    pub id: u64,
    pub activity_id: u64,
    pub lat: f64,
    pub lon: f64,
    /// Altitude in feet, `None` when the raw value was the sentinel
    pub altitude: Option<f64>,
    pub date_days: f64,
    pub date_time: NaiveDateTime,
}

impl TrackPoint {
    /// Build a trackpoint from a raw sample, mapping the altitude sentinel to
    /// `None`.
    pub fn from_raw(id: u64, activity_id: u64, raw: &RawPoint) -> Self {
        Self {
            id,
            activity_id,
            lat: raw.lat,
            lon: raw.lon,
            altitude: normalize_altitude(raw.altitude),
            date_days: raw.date_days,
            date_time: raw.date_time,
        }
    }
}

/// Map the raw altitude sentinel to unknown.
pub fn normalize_altitude(raw: f64) -> Option<f64> {
    if raw == ALTITUDE_UNKNOWN_SENTINEL {
        None
    } else {
        Some(raw)
    }
}
