// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trajectory (`.plt`) file reader.
//!
//! Each file starts with a fixed 6-line header followed by one row per
//! sample:
//!
//! ```text
//! 39.984702,116.318417,0,492,39744.1201851852,2008-10-23,02:53:04
//! lat       lon        -  alt day-number       date       time
//! ```

use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::RawPoint;
use crate::time_utils::parse_trackpoint_timestamp;

/// Number of header lines preceding the samples.
pub const HEADER_LINES: usize = 6;

/// Outcome of reading one trajectory file.
#[derive(Debug, Clone, PartialEq)]
pub enum Trajectory {
    /// Samples in file order
    Points(Vec<RawPoint>),
    /// File had more samples than the configured maximum and was skipped
    Oversized { point_count: usize },
}

/// Reads trajectory files, discarding the ones that are too long.
#[derive(Debug, Clone, Copy)]
pub struct PointStreamReader {
    max_points: usize,
}

impl PointStreamReader {
    pub fn new(max_points: usize) -> Self {
        Self { max_points }
    }

    /// Read and parse one trajectory file.
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Trajectory> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        self.parse(path, &contents)
    }

    /// Parse trajectory file contents. `path` is only used in error messages.
    ///
    /// The sample count is checked before any row is parsed, so malformed
    /// rows in an oversized file never surface as errors.
    pub fn parse(&self, path: &Path, contents: &str) -> Result<Trajectory> {
        let rows: Vec<(usize, &str)> = contents
            .lines()
            .enumerate()
            .skip(HEADER_LINES)
            .filter(|(_, line)| !line.trim().is_empty())
            .collect();

        if rows.len() > self.max_points {
            return Ok(Trajectory::Oversized {
                point_count: rows.len(),
            });
        }

        let points = rows
            .into_iter()
            .map(|(idx, line)| parse_row(line).map_err(|msg| AppError::parse(path, idx + 1, msg)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Trajectory::Points(points))
    }
}

impl Default for PointStreamReader {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_TRACKPOINTS)
    }
}

/// Parse a single sample row.
fn parse_row(line: &str) -> std::result::Result<RawPoint, String> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != 7 {
        return Err(format!("expected 7 fields, found {}", fields.len()));
    }

    let number = |idx: usize, name: &str| -> std::result::Result<f64, String> {
        fields[idx]
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid {} {:?}: {}", name, fields[idx], e))
    };

    let date_time = parse_trackpoint_timestamp(fields[5], fields[6])
        .map_err(|e| format!("invalid timestamp {:?} {:?}: {}", fields[5], fields[6], e))?;

    Ok(RawPoint {
        lat: number(0, "latitude")?,
        lon: number(1, "longitude")?,
        altitude: number(3, "altitude")?,
        date_days: number(4, "day-number")?,
        date_time,
    })
}
