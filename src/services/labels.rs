// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user label table (`labels.txt`) parsing and exact-span lookup.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{AppError, Result};
use crate::models::LabelInterval;
use crate::time_utils::parse_label_timestamp;

/// Label intervals of one user, indexed by their exact (start, end) span.
///
/// Duplicate intervals for the same span are kept, in file order.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    intervals: Vec<LabelInterval>,
    by_span: HashMap<(NaiveDateTime, NaiveDateTime), Vec<usize>>,
}

impl LabelIndex {
    /// Build an index from already-parsed intervals.
    pub fn from_intervals(intervals: Vec<LabelInterval>) -> Self {
        let mut by_span: HashMap<_, Vec<usize>> = HashMap::new();
        for (idx, interval) in intervals.iter().enumerate() {
            by_span
                .entry((interval.start, interval.end))
                .or_default()
                .push(idx);
        }
        Self { intervals, by_span }
    }

    /// Load a label file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        Self::parse(path, &contents)
    }

    /// Parse tab-separated label rows. The first line is the column header
    /// (`Start Time\tEnd Time\tTransportation Mode`).
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        let mut intervals = Vec::new();

        for (idx, line) in contents.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 3 {
                return Err(AppError::parse(
                    path,
                    idx + 1,
                    format!("expected 3 tab-separated fields, found {}", fields.len()),
                ));
            }

            let timestamp = |value: &str| {
                parse_label_timestamp(value).map_err(|e| {
                    AppError::parse(path, idx + 1, format!("invalid timestamp {:?}: {}", value, e))
                })
            };

            intervals.push(LabelInterval {
                start: timestamp(fields[0])?,
                end: timestamp(fields[1])?,
                mode: fields[2].trim().to_string(),
            });
        }

        Ok(Self::from_intervals(intervals))
    }

    /// All intervals whose start and end equal the given span exactly.
    pub fn matching(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<&LabelInterval> {
        self.by_span
            .get(&(start, end))
            .map(|indices| indices.iter().map(|&i| &self.intervals[i]).collect())
            .unwrap_or_default()
    }

    pub fn intervals(&self) -> &[LabelInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}
