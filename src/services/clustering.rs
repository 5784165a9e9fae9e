// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Density-based clustering (DBSCAN) with pluggable neighborhood queries.
//!
//! The clustering routine only needs to know, for each point, which points
//! lie within the neighborhood radius. That is supplied by a [`RegionQuery`]
//! implementation:
//!
//! - [`TimelineIndex`]: 1-D values (elapsed seconds), sorted + binary search
//! - [`HaversineIndex`]: lat/lon in degrees, R-tree prefilter + great-circle
//!   distance in meters
//!
//! Labels are opaque cluster keys; only the grouping they induce is
//! meaningful.

use geo::{Distance, Haversine, Point};
use rstar::{RTree, RTreeObject, AABB};

use crate::models::EARTH_MEAN_RADIUS_M;

/// Per-point clustering outcome: `Some(cluster)` or `None` for noise.
pub type Labels = Vec<Option<usize>>;

/// Neighborhood lookup over a fixed set of points.
pub trait RegionQuery {
    /// Number of points.
    fn len(&self) -> usize;

    /// Indices of all points within the radius of point `idx`, including
    /// `idx` itself.
    fn neighbors(&self, idx: usize) -> Vec<usize>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run DBSCAN over the points of `index`.
///
/// A point is a core point when its neighborhood (itself included) holds at
/// least `min_size` points. Clusters are core points connected through
/// neighborhoods, plus the non-core points reachable from them.
pub fn dbscan<Q: RegionQuery + ?Sized>(index: &Q, min_size: usize) -> Labels {
    let n = index.len();
    let mut labels: Labels = vec![None; n];
    let mut visited = vec![false; n];
    let mut next_cluster = 0;

    for seed in 0..n {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;

        let seed_neighbors = index.neighbors(seed);
        if seed_neighbors.len() < min_size {
            // Noise for now; may still become a border point of a later cluster
            continue;
        }

        let cluster = next_cluster;
        next_cluster += 1;
        labels[seed] = Some(cluster);

        let mut frontier = seed_neighbors;
        while let Some(idx) = frontier.pop() {
            if labels[idx].is_none() {
                labels[idx] = Some(cluster);
            }
            if visited[idx] {
                continue;
            }
            visited[idx] = true;

            let neighbors = index.neighbors(idx);
            if neighbors.len() >= min_size {
                frontier.extend(neighbors.into_iter().filter(|&j| !visited[j]));
            }
        }
    }

    labels
}

/// Group point indices by cluster label, dropping noise. Groups are ordered
/// by label, indices ascending within a group.
pub fn group_by_label(labels: &[Option<usize>]) -> Vec<Vec<usize>> {
    let cluster_count = labels.iter().flatten().map(|&c| c + 1).max().unwrap_or(0);
    let mut groups = vec![Vec::new(); cluster_count];
    for (idx, label) in labels.iter().enumerate() {
        if let Some(cluster) = label {
            groups[*cluster].push(idx);
        }
    }
    groups.retain(|g| !g.is_empty());
    groups
}

// ============================================================================
// 1-D timeline
// ============================================================================

/// Neighborhood index over scalar values (e.g. elapsed seconds).
pub struct TimelineIndex {
    values: Vec<f64>,
    /// (value, original index), sorted by value
    sorted: Vec<(f64, usize)>,
    eps: f64,
}

impl TimelineIndex {
    pub fn new(values: Vec<f64>, eps: f64) -> Self {
        let mut sorted: Vec<(f64, usize)> =
            values.iter().copied().enumerate().map(|(i, v)| (v, i)).collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            values,
            sorted,
            eps,
        }
    }
}

impl RegionQuery for TimelineIndex {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn neighbors(&self, idx: usize) -> Vec<usize> {
        let value = self.values[idx];
        let lo = self.sorted.partition_point(|(v, _)| *v < value - self.eps);
        let hi = self
            .sorted
            .partition_point(|(v, _)| *v <= value + self.eps)
            .max(lo);
        self.sorted[lo..hi].iter().map(|&(_, i)| i).collect()
    }
}

// ============================================================================
// Great-circle (haversine) space
// ============================================================================

/// A lat/lon point with its index for R-tree queries
#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    idx: usize,
    lat: f64,
    lon: f64,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lat, self.lon])
    }
}

/// Neighborhood index over lat/lon points (degrees) with a radius in meters.
pub struct HaversineIndex {
    points: Vec<(f64, f64)>,
    tree: RTree<IndexedPoint>,
    eps_meters: f64,
}

impl HaversineIndex {
    pub fn new(points: Vec<(f64, f64)>, eps_meters: f64) -> Self {
        let indexed: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(idx, &(lat, lon))| IndexedPoint { idx, lat, lon })
            .collect();
        Self {
            points,
            tree: RTree::bulk_load(indexed),
            eps_meters,
        }
    }

    /// Lat/lon boxes (degrees) that together contain every point within the
    /// radius of (lat, lon). A box crossing the antimeridian is repeated
    /// shifted by 360 degrees.
    fn search_envelopes(&self, lat: f64, lon: f64) -> Vec<AABB<[f64; 2]>> {
        // Slightly widened so float error never drops a point on the radius
        let d_lat = (self.eps_meters / EARTH_MEAN_RADIUS_M).to_degrees() * 1.01;
        let min_lat = (lat - d_lat).max(-90.0);
        let max_lat = (lat + d_lat).min(90.0);

        // Longitude degrees shrink with latitude; use the widest row of the box
        let widest = min_lat.abs().max(max_lat.abs()).to_radians().cos();
        let d_lon = if widest > 1e-9 {
            (d_lat / widest).min(180.0)
        } else {
            180.0
        };

        let (min_lon, max_lon) = (lon - d_lon, lon + d_lon);
        let mut envelopes = vec![AABB::from_corners([min_lat, min_lon], [max_lat, max_lon])];
        if min_lon < -180.0 {
            envelopes.push(AABB::from_corners(
                [min_lat, min_lon + 360.0],
                [max_lat, max_lon + 360.0],
            ));
        }
        if max_lon > 180.0 {
            envelopes.push(AABB::from_corners(
                [min_lat, min_lon - 360.0],
                [max_lat, max_lon - 360.0],
            ));
        }
        envelopes
    }
}

impl RegionQuery for HaversineIndex {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn neighbors(&self, idx: usize) -> Vec<usize> {
        let (lat, lon) = self.points[idx];
        let origin = Point::new(lon, lat);

        let mut found: Vec<usize> = self
            .search_envelopes(lat, lon)
            .iter()
            .flat_map(|envelope| self.tree.locate_in_envelope_intersecting(envelope))
            .filter(|p| Haversine.distance(origin, Point::new(p.lon, p.lat)) <= self.eps_meters)
            .map(|p| p.idx)
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }
}
