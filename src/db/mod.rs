// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (SQLite).

pub mod queries;
pub mod sqlite;

pub use queries::QueryEngine;
pub use sqlite::{LoadReport, SqliteDb, TableLoad};

/// Table names as constants.
pub mod tables {
    pub const USER: &str = "User";
    pub const ACTIVITY: &str = "Activity";
    pub const TRACKPOINT: &str = "TrackPoint";
}

/// Schema statements. Tables are dropped child-first and recreated
/// parent-first on every provisioning run.
pub(crate) const SCHEMA: &str = r#"
    DROP TABLE IF EXISTS TrackPoint;
    DROP TABLE IF EXISTS Activity;
    DROP TABLE IF EXISTS User;

    CREATE TABLE User (
        id TEXT NOT NULL,
        has_labels INTEGER NOT NULL,
        CONSTRAINT User_PK PRIMARY KEY (id)
    );

    CREATE TABLE Activity (
        id INTEGER NOT NULL,
        user_id TEXT NOT NULL,
        transportation_mode TEXT,
        start_date_time TEXT NOT NULL,
        end_date_time TEXT NOT NULL,
        CONSTRAINT Activity_PK PRIMARY KEY (id),
        CONSTRAINT Activity_FK FOREIGN KEY (user_id) REFERENCES User (id)
            ON UPDATE CASCADE ON DELETE CASCADE
    );

    CREATE TABLE TrackPoint (
        id INTEGER NOT NULL,
        activity_id INTEGER NOT NULL,
        lat REAL NOT NULL,
        lon REAL NOT NULL,
        altitude REAL,
        date_days REAL NOT NULL,
        date_time TEXT NOT NULL,
        CONSTRAINT TrackPoint_PK PRIMARY KEY (id),
        CONSTRAINT TrackPoint_FK FOREIGN KEY (activity_id) REFERENCES Activity (id)
            ON UPDATE CASCADE ON DELETE CASCADE
    );

    CREATE INDEX idx_activity_user ON Activity(user_id);
    CREATE INDEX idx_trackpoint_activity ON TrackPoint(activity_id);
"#;
