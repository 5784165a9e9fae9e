// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity model: one labelled (or unlabelled) recording session.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Stored activity record.
///
/// Start and end always equal the first and last timestamp of the point
/// sequence the activity was segmented from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Run-wide unique id, allocated in ingestion order
    pub id: u64,
    /// Owning user
    pub user_id: String,
    /// Mode from the matching label interval, `None` when unknown
    pub transportation_mode: Option<String>,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
}
