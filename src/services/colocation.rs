// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Co-location detection: which users were near each other in both time
//! and space.
//!
//! Two chained density-clustering passes:
//! 1. Temporal: elapsed seconds since the earliest record, 1-D DBSCAN.
//! 2. Spatial: within each temporal cluster, DBSCAN over lat/lon with the
//!    haversine metric.
//!
//! Every spatial cluster holding two or more distinct users contributes its
//! user-id set. Sets are deduplicated within and across temporal clusters.
//! A single spatial pass over the whole dataset would pair users who passed
//! the same spot at different times, hence the chaining.

use std::collections::BTreeSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::models::{ColocationConfig, ColocationRecord, ColocationResult};
use crate::services::clustering::{dbscan, group_by_label, HaversineIndex, TimelineIndex};
use crate::time_utils::SECONDS_PER_DAY;

type UserSet = BTreeSet<String>;

/// Detects groups of users that were close in space and time.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoLocationDetector {
    config: ColocationConfig,
}

impl CoLocationDetector {
    pub fn new(config: ColocationConfig) -> Self {
        Self { config }
    }

    /// Run both clustering stages over the joined records.
    ///
    /// Empty and single-user inputs give an empty result.
    pub fn detect(&self, records: &[ColocationRecord]) -> ColocationResult {
        let windows = self.temporal_clusters(records);
        tracing::debug!(
            records = records.len(),
            temporal_clusters = windows.len(),
            "Temporal clustering complete"
        );

        #[cfg(feature = "parallel")]
        let per_window: Vec<BTreeSet<UserSet>> = windows
            .par_iter()
            .map(|members| self.close_user_sets(records, members))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let per_window: Vec<BTreeSet<UserSet>> = windows
            .iter()
            .map(|members| self.close_user_sets(records, members))
            .collect();

        let user_sets: BTreeSet<UserSet> = per_window.into_iter().flatten().collect();

        tracing::debug!(sets = user_sets.len(), "Spatial clustering complete");
        ColocationResult { user_sets }
    }

    /// Partition record indices into temporal clusters, dropping noise.
    fn temporal_clusters(&self, records: &[ColocationRecord]) -> Vec<Vec<usize>> {
        let Some(min_days) = records
            .iter()
            .map(|r| r.date_days)
            .min_by(|a, b| a.total_cmp(b))
        else {
            return Vec::new();
        };

        let elapsed: Vec<f64> = records
            .iter()
            .map(|r| (r.date_days - min_days) * SECONDS_PER_DAY)
            .collect();

        let index = TimelineIndex::new(elapsed, self.config.temporal_eps_secs);
        group_by_label(&dbscan(&index, self.config.min_cluster_size))
    }

    /// Spatially cluster one temporal cluster and return the distinct
    /// user-id sets of its multi-user spatial clusters.
    fn close_user_sets(&self, records: &[ColocationRecord], members: &[usize]) -> BTreeSet<UserSet> {
        let distinct_users: BTreeSet<&str> = members
            .iter()
            .map(|&i| records[i].user_id.as_str())
            .collect();
        if distinct_users.len() < 2 {
            return BTreeSet::new();
        }

        let points: Vec<(f64, f64)> = members
            .iter()
            .map(|&i| (records[i].lat, records[i].lon))
            .collect();
        let index = HaversineIndex::new(points, self.config.spatial_eps_meters);
        let labels = dbscan(&index, self.config.min_cluster_size);

        group_by_label(&labels)
            .into_iter()
            .map(|cluster| {
                cluster
                    .into_iter()
                    .map(|k| records[members[k]].user_id.clone())
                    .collect::<UserSet>()
            })
            .filter(|users| users.len() >= 2)
            .collect()
    }
}
