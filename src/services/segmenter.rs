// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trajectory-to-activity segmentation.
//!
//! A point sequence becomes one activity, unless its exact (first, last)
//! timestamp span matches label intervals of its user. Then it becomes one
//! activity per matching interval, each carrying that interval's mode and
//! its own copy of the points.

use crate::error::{AppError, Result};
use crate::models::{Activity, RawPoint, TrackPoint};
use crate::services::labels::LabelIndex;

/// Run-wide id counters for activities and trackpoints.
///
/// One allocator is shared by every user and every file of an ingestion run,
/// so ids are unique and strictly increasing in ingestion order.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next_activity: u64,
    next_trackpoint: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_activity_id(&mut self) -> u64 {
        let id = self.next_activity;
        self.next_activity += 1;
        id
    }

    pub fn next_trackpoint_id(&mut self) -> u64 {
        let id = self.next_trackpoint;
        self.next_trackpoint += 1;
        id
    }

    /// Number of activity ids handed out so far.
    pub fn activities_allocated(&self) -> u64 {
        self.next_activity
    }

    /// Number of trackpoint ids handed out so far.
    pub fn trackpoints_allocated(&self) -> u64 {
        self.next_trackpoint
    }
}

/// An activity together with the trackpoints attributed to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub activity: Activity,
    pub trackpoints: Vec<TrackPoint>,
}

/// Splits point sequences into activities.
#[derive(Debug, Clone, Copy)]
pub struct ActivitySegmenter {
    max_points: usize,
}

impl Default for ActivitySegmenter {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_TRACKPOINTS)
    }
}

impl ActivitySegmenter {
    pub fn new(max_points: usize) -> Self {
        Self { max_points }
    }

    /// Segment one point sequence of `user_id`.
    ///
    /// `labels` is `None` when the user has no label table. Sequences longer
    /// than the maximum produce no segments. An empty sequence is an error.
    pub fn segment(
        &self,
        user_id: &str,
        points: &[RawPoint],
        labels: Option<&LabelIndex>,
        ids: &mut IdAllocator,
    ) -> Result<Vec<Segment>> {
        if points.len() > self.max_points {
            tracing::debug!(
                user_id,
                point_count = points.len(),
                max = self.max_points,
                "Rejecting oversized point sequence"
            );
            return Ok(Vec::new());
        }

        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AppError::EmptyTrajectory(user_id.to_string())),
        };
        let start = first.date_time;
        let end = last.date_time;

        let modes: Vec<Option<String>> = match labels {
            Some(index) => {
                let matches = index.matching(start, end);
                if matches.is_empty() {
                    vec![None]
                } else {
                    matches.into_iter().map(|l| Some(l.mode.clone())).collect()
                }
            }
            None => vec![None],
        };

        let segments = modes
            .into_iter()
            .map(|transportation_mode| {
                let activity = Activity {
                    id: ids.next_activity_id(),
                    user_id: user_id.to_string(),
                    transportation_mode,
                    start_date_time: start,
                    end_date_time: end,
                };
                let trackpoints = points
                    .iter()
                    .map(|raw| TrackPoint::from_raw(ids.next_trackpoint_id(), activity.id, raw))
                    .collect();
                Segment {
                    activity,
                    trackpoints,
                }
            })
            .collect();

        Ok(segments)
    }
}
