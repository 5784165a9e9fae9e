// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ground-truth label intervals.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of a user's `labels.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Transportation mode, e.g. "walk", "bus", "taxi"
    pub mode: String,
}
