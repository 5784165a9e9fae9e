// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::fs;
use std::path::Path;

use geolife_tracker::db::SqliteDb;
use geolife_tracker::services::DatasetReader;
use geolife_tracker::time_utils::{parse_db_timestamp, to_day_number};
use tempfile::TempDir;

pub const TRAJECTORY_HEADER: &str = "Geolife trajectory\nWGS 84\nAltitude is in Feet\nReserved 3\n0,2,255,My Track,0,0,2,8421376\n0\n";

pub const LABELS_HEADER: &str = "Start Time\tEnd Time\tTransportation Mode\n";

/// One sample row for a synthetic trajectory file.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub lat: f64,
    pub lon: f64,
    pub altitude: f64,
    /// "YYYY-MM-DD HH:MM:SS"
    pub at: &'static str,
}

/// Shorthand for a sample at the given place and time.
#[allow(dead_code)]
pub fn sample(lat: f64, lon: f64, altitude: f64, at: &'static str) -> Sample {
    Sample {
        lat,
        lon,
        altitude,
        at,
    }
}

/// Synthetic dataset laid out on disk in a temporary directory.
pub struct DatasetFixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl DatasetFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("Data")).expect("Failed to create Data dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `Data/<user>/Trajectory/<file_name>` from samples.
    pub fn add_trajectory(&self, user: &str, file_name: &str, samples: &[Sample]) -> &Self {
        let mut contents = TRAJECTORY_HEADER.to_string();
        for s in samples {
            contents.push_str(&plt_row(s));
            contents.push('\n');
        }
        self.add_raw_trajectory(user, file_name, &contents)
    }

    /// Write a trajectory file verbatim.
    pub fn add_raw_trajectory(&self, user: &str, file_name: &str, contents: &str) -> &Self {
        let dir = self.dir.path().join("Data").join(user).join("Trajectory");
        fs::create_dir_all(&dir).expect("Failed to create trajectory dir");
        fs::write(dir.join(file_name), contents).expect("Failed to write trajectory");
        self
    }

    /// Write `Data/<user>/labels.txt`; times use the label file format
    /// ("YYYY/MM/DD HH:MM:SS").
    pub fn add_labels(&self, user: &str, rows: &[(&str, &str, &str)]) -> &Self {
        let dir = self.dir.path().join("Data").join(user);
        fs::create_dir_all(&dir).expect("Failed to create user dir");
        let mut contents = LABELS_HEADER.to_string();
        for (start, end, mode) in rows {
            contents.push_str(&format!("{start}\t{end}\t{mode}\n"));
        }
        fs::write(dir.join("labels.txt"), contents).expect("Failed to write labels");
        self
    }

    pub fn set_labeled_ids(&self, ids: &[&str]) -> &Self {
        let contents: String = ids.iter().map(|id| format!("{id}\n")).collect();
        fs::write(self.dir.path().join("labeled_ids.txt"), contents)
            .expect("Failed to write labeled_ids.txt");
        self
    }

    /// Ingest the fixture and load it into a fresh in-memory database.
    pub fn load(&self, max_trackpoints: usize) -> SqliteDb {
        let dataset = DatasetReader::new(self.root(), max_trackpoints)
            .read()
            .expect("Failed to read fixture dataset");
        let mut db = SqliteDb::in_memory().expect("Failed to open in-memory db");
        db.provision_schema().expect("Failed to provision schema");
        let report = db.load_dataset(&dataset);
        assert!(report.is_complete_success(), "load failed: {:?}", report);
        db
    }
}

/// Format a sample as a trajectory row.
#[allow(dead_code)]
pub fn plt_row(s: &Sample) -> String {
    let at = parse_db_timestamp(s.at).expect("Bad fixture timestamp");
    format!(
        "{},{},0,{},{},{},{}",
        s.lat,
        s.lon,
        s.altitude,
        to_day_number(at),
        at.format("%Y-%m-%d"),
        at.format("%H:%M:%S"),
    )
}
