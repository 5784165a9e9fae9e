// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Co-location detection inputs, parameters and results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Mean Earth radius in meters, used to express spatial radii as angles.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Joined user/activity/trackpoint row consumed by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColocationRecord {
    pub user_id: String,
    pub activity_id: u64,
    pub trackpoint_id: u64,
    pub lat: f64,
    pub lon: f64,
    pub date_days: f64,
}

/// Clustering parameters for both stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColocationConfig {
    /// Temporal neighborhood radius in seconds
    pub temporal_eps_secs: f64,
    /// Spatial neighborhood radius in meters
    pub spatial_eps_meters: f64,
    /// Minimum neighborhood size (point itself included) of a core point
    pub min_cluster_size: usize,
}

impl Default for ColocationConfig {
    fn default() -> Self {
        Self {
            temporal_eps_secs: 60.0,
            spatial_eps_meters: 100.0,
            min_cluster_size: 2,
        }
    }
}

/// Sets of users that were near each other in both time and space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColocationResult {
    /// Distinct user-id sets, each with at least two users
    pub user_sets: BTreeSet<BTreeSet<String>>,
}

impl ColocationResult {
    pub fn is_empty(&self) -> bool {
        self.user_sets.is_empty()
    }

    /// Every user that appears in at least one set.
    pub fn users(&self) -> BTreeSet<&str> {
        self.user_sets
            .iter()
            .flat_map(|set| set.iter().map(String::as_str))
            .collect()
    }

    /// Number of user appearances summed over all sets. A user present in
    /// two sets counts twice.
    pub fn appearance_count(&self) -> usize {
        self.user_sets.iter().map(BTreeSet::len).sum()
    }
}
