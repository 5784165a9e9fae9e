// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dataset ingestion: walks the input directory layout and turns it into
//! users, activities and trackpoints.
//!
//! Layout:
//!
//! ```text
//! <root>/labeled_ids.txt          optional, one user id per line
//! <root>/Data/<user>/labels.txt   optional label table
//! <root>/Data/<user>/Trajectory/*.plt
//! ```
//!
//! Users and trajectory files are processed in sorted order so that ids
//! are reproducible between runs.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{Activity, TrackPoint, User};
use crate::services::labels::LabelIndex;
use crate::services::segmenter::{ActivitySegmenter, IdAllocator};
use crate::services::trajectory::{PointStreamReader, Trajectory};

pub const DATA_DIR: &str = "Data";
pub const TRAJECTORY_DIR: &str = "Trajectory";
pub const LABELS_FILE: &str = "labels.txt";
pub const LABELED_IDS_FILE: &str = "labeled_ids.txt";

/// Normalized dataset ready for loading.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub users: Vec<User>,
    pub activities: Vec<Activity>,
    pub trackpoints: Vec<TrackPoint>,
}

/// Counters describing one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub files_read: usize,
    pub files_skipped: usize,
    pub labelled_activities: usize,
}

/// Reads a dataset directory.
pub struct DatasetReader {
    root: PathBuf,
    reader: PointStreamReader,
    segmenter: ActivitySegmenter,
    ids: IdAllocator,
    stats: IngestStats,
}

impl DatasetReader {
    pub fn new(root: impl Into<PathBuf>, max_trackpoints: usize) -> Self {
        Self {
            root: root.into(),
            reader: PointStreamReader::new(max_trackpoints),
            segmenter: ActivitySegmenter::new(max_trackpoints),
            ids: IdAllocator::new(),
            stats: IngestStats::default(),
        }
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Read every user of the dataset.
    pub fn read(&mut self) -> Result<Dataset> {
        let data_dir = self.root.join(DATA_DIR);
        let user_ids = sorted_entries(&data_dir, |p| p.is_dir())?;
        let labeled_ids = self.labeled_ids()?;

        tracing::info!(
            root = %self.root.display(),
            users = user_ids.len(),
            "Reading dataset"
        );

        let mut dataset = Dataset::default();
        for user_id in user_ids {
            let user_dir = data_dir.join(&user_id);
            let labels_path = user_dir.join(LABELS_FILE);

            let labels = if labels_path.is_file() {
                Some(LabelIndex::load_from_file(&labels_path)?)
            } else {
                None
            };

            let has_labels = match &labeled_ids {
                Some(ids) => ids.contains(&user_id),
                None => labels.is_some(),
            };

            self.read_user(&user_id, &user_dir, labels.as_ref(), &mut dataset)?;
            dataset.users.push(User::new(user_id, has_labels));
        }

        tracing::info!(
            users = dataset.users.len(),
            activities = dataset.activities.len(),
            trackpoints = dataset.trackpoints.len(),
            files_read = self.stats.files_read,
            files_skipped = self.stats.files_skipped,
            "Dataset parsed"
        );
        Ok(dataset)
    }

    /// Segment every trajectory file of one user into `dataset`.
    fn read_user(
        &mut self,
        user_id: &str,
        user_dir: &Path,
        labels: Option<&LabelIndex>,
        dataset: &mut Dataset,
    ) -> Result<()> {
        let trajectory_dir = user_dir.join(TRAJECTORY_DIR);
        let files = if trajectory_dir.is_dir() {
            sorted_entries(&trajectory_dir, |p| p.is_file())?
        } else {
            Vec::new()
        };

        let before = dataset.activities.len();
        for file in files {
            let path = trajectory_dir.join(&file);
            let points = match self.reader.read_file(&path)? {
                Trajectory::Points(points) => points,
                Trajectory::Oversized { point_count } => {
                    tracing::debug!(user_id, file = %file, point_count, "Skipping oversized trajectory");
                    self.stats.files_skipped += 1;
                    continue;
                }
            };
            self.stats.files_read += 1;

            let segments = self
                .segmenter
                .segment(user_id, &points, labels, &mut self.ids)
                .map_err(|e| match e {
                    AppError::EmptyTrajectory(_) => {
                        AppError::EmptyTrajectory(path.display().to_string())
                    }
                    other => other,
                })?;

            for segment in segments {
                if segment.activity.transportation_mode.is_some() {
                    self.stats.labelled_activities += 1;
                }
                dataset.activities.push(segment.activity);
                dataset.trackpoints.extend(segment.trackpoints);
            }
        }

        tracing::info!(
            user_id,
            activities = dataset.activities.len() - before,
            has_label_table = labels.is_some(),
            "User ingested"
        );
        Ok(())
    }

    /// Parse `labeled_ids.txt` if present.
    fn labeled_ids(&self) -> Result<Option<HashSet<String>>> {
        let path = self.root.join(LABELED_IDS_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).map_err(|e| AppError::io(&path, e))?;
        Ok(Some(
            contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
        ))
    }
}

/// File names in `dir` matching `keep`, sorted.
fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| AppError::io(dir, e))? {
        let entry = entry.map_err(|e| AppError::io(dir, e))?;
        let path = entry.path();
        if keep(&path) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
