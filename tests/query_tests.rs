// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Report queries over a small hand-built dataset.
//!
//! Layout:
//! - 000: a walk with two long gaps, an overnight taxi ride
//! - 001: the same walk labelled twice (duplicate), a short bus ride in
//!   November
//! - 002: no activities

use geolife_tracker::db::{QueryEngine, SqliteDb};
use geolife_tracker::models::report::{
    DuplicateActivity, InvalidActivities, ModeUsage, UserActivityCount,
};
use geolife_tracker::models::{Activity, TrackPoint, User};
use geolife_tracker::services::Dataset;
use geolife_tracker::time_utils::{parse_db_timestamp, to_day_number};

type Sample = (f64, f64, Option<f64>, &'static str);

#[derive(Default)]
struct DatasetBuilder {
    dataset: Dataset,
}

impl DatasetBuilder {
    fn user(mut self, id: &str) -> Self {
        self.dataset.users.push(User::new(id, true));
        self
    }

    fn activity(mut self, user_id: &str, mode: &str, samples: &[Sample]) -> Self {
        let id = self.dataset.activities.len() as u64;
        let times: Vec<_> = samples
            .iter()
            .map(|s| parse_db_timestamp(s.3).unwrap())
            .collect();

        self.dataset.activities.push(Activity {
            id,
            user_id: user_id.to_string(),
            transportation_mode: Some(mode.to_string()),
            start_date_time: times[0],
            end_date_time: times[times.len() - 1],
        });
        for (s, at) in samples.iter().zip(times) {
            let tp_id = self.dataset.trackpoints.len() as u64;
            self.dataset.trackpoints.push(TrackPoint {
                id: tp_id,
                activity_id: id,
                lat: s.0,
                lon: s.1,
                altitude: s.2,
                date_days: to_day_number(at),
                date_time: at,
            });
        }
        self
    }

    fn load(self) -> SqliteDb {
        let mut db = SqliteDb::in_memory().unwrap();
        db.provision_schema().unwrap();
        assert!(db.load_dataset(&self.dataset).is_complete_success());
        db
    }
}

const WALK_001: [Sample; 2] = [
    (39.90, 116.30, Some(5.0), "2008-10-25 10:00:00"),
    (39.90, 116.30, Some(25.0), "2008-10-25 10:05:00"),
];

fn fixture_db() -> SqliteDb {
    DatasetBuilder::default()
        .user("000")
        .user("001")
        .user("002")
        .activity(
            "000",
            "walk",
            &[
                (39.90, 116.30, Some(100.0), "2008-10-23 02:00:00"),
                (39.91, 116.30, Some(150.0), "2008-10-23 02:10:00"),
                (39.91, 116.30, Some(120.0), "2008-10-23 02:30:00"),
            ],
        )
        .activity(
            "000",
            "taxi",
            &[
                (39.95, 116.35, None, "2008-10-23 23:50:00"),
                (39.95, 116.35, Some(10.0), "2008-10-23 23:52:00"),
                (39.95, 116.35, Some(40.0), "2008-10-24 00:10:00"),
            ],
        )
        .activity("001", "walk", &WALK_001)
        .activity("001", "walk", &WALK_001)
        .activity(
            "001",
            "bus",
            &[
                (39.80, 116.20, Some(1.0), "2008-11-02 08:00:00"),
                (39.80, 116.21, Some(2.0), "2008-11-02 08:00:30"),
            ],
        )
        .load()
}

#[test]
fn test_dataset_counts() {
    let db = fixture_db();
    let counts = QueryEngine::new(&db).dataset_counts().unwrap();
    assert_eq!(counts.users, 3);
    assert_eq!(counts.activities, 5);
    assert_eq!(counts.trackpoints, 12);
}

#[test]
fn test_activities_per_user_includes_idle_users() {
    let db = fixture_db();
    let stats = QueryEngine::new(&db).activities_per_user().unwrap();
    assert!((stats.average - 5.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.minimum, 0);
    assert_eq!(stats.maximum, 3);
}

#[test]
fn test_activities_per_user_empty_database() {
    let db = DatasetBuilder::default().load();
    let stats = QueryEngine::new(&db).activities_per_user().unwrap();
    assert_eq!(stats.average, 0.0);
    assert_eq!(stats.maximum, 0);
}

#[test]
fn test_top_users_by_activities() {
    let db = fixture_db();
    let engine = QueryEngine::new(&db);

    let top = engine.top_users_by_activities(10).unwrap();
    assert_eq!(
        top,
        vec![
            UserActivityCount {
                user_id: "001".to_string(),
                activities: 3
            },
            UserActivityCount {
                user_id: "000".to_string(),
                activities: 2
            },
        ]
    );
    assert_eq!(engine.top_users_by_activities(1).unwrap().len(), 1);
}

#[test]
fn test_users_with_overnight_activities() {
    let db = fixture_db();
    assert_eq!(
        QueryEngine::new(&db)
            .users_with_overnight_activities()
            .unwrap(),
        1
    );
}

#[test]
fn test_duplicate_activities() {
    let db = fixture_db();
    let duplicates = QueryEngine::new(&db).duplicate_activities().unwrap();
    assert_eq!(
        duplicates,
        vec![DuplicateActivity {
            user_id: "001".to_string(),
            start_date_time: parse_db_timestamp("2008-10-25 10:00:00").unwrap(),
            end_date_time: parse_db_timestamp("2008-10-25 10:05:00").unwrap(),
            occurrences: 2,
        }]
    );
}

#[test]
fn test_users_without_mode() {
    let db = fixture_db();
    let engine = QueryEngine::new(&db);
    assert_eq!(engine.users_without_mode("taxi").unwrap(), vec!["001", "002"]);
    assert_eq!(
        engine.users_without_mode("boat").unwrap(),
        vec!["000", "001", "002"]
    );
}

#[test]
fn test_transportation_modes() {
    let db = fixture_db();
    let modes = QueryEngine::new(&db).transportation_modes().unwrap();
    let expected: Vec<ModeUsage> = [("bus", 1), ("taxi", 1), ("walk", 2)]
        .into_iter()
        .map(|(mode, users)| ModeUsage {
            transportation_mode: mode.to_string(),
            users,
        })
        .collect();
    assert_eq!(modes, expected);
}

#[test]
fn test_most_active_month() {
    let db = fixture_db();
    let month = QueryEngine::new(&db).most_active_month().unwrap().unwrap();

    assert_eq!(month.year_month, "2008-10");
    assert_eq!(month.activities, 4);
    assert_eq!(month.top_users.len(), 2);

    // Tied on two activities each; user id breaks the tie
    let first = &month.top_users[0];
    assert_eq!(first.user_id, "000");
    assert_eq!(first.activities, 2);
    assert!((first.recorded_hours - (0.5 + 20.0 / 60.0)).abs() < 1e-9);

    let second = &month.top_users[1];
    assert_eq!(second.user_id, "001");
    assert!((second.recorded_hours - 10.0 / 60.0).abs() < 1e-9);
}

#[test]
fn test_most_active_month_empty_database() {
    let db = DatasetBuilder::default().user("000").load();
    assert_eq!(QueryEngine::new(&db).most_active_month().unwrap(), None);
}

#[test]
fn test_distance_by_mode() {
    let db = fixture_db();
    let engine = QueryEngine::new(&db);

    // 0.01 degrees of latitude, then no movement
    let walk = engine.distance_by_mode("000", "walk", 2008).unwrap();
    assert!((walk.kilometers - 1.112).abs() < 0.01, "got {}", walk.kilometers);

    assert_eq!(engine.distance_by_mode("001", "walk", 2008).unwrap().kilometers, 0.0);
    assert_eq!(engine.distance_by_mode("000", "walk", 2009).unwrap().kilometers, 0.0);
}

#[test]
fn test_distance_not_summed_across_activities() {
    let db = DatasetBuilder::default()
        .user("000")
        .activity(
            "000",
            "walk",
            &[
                (39.90, 116.30, None, "2008-05-01 10:00:00"),
                (39.90, 116.30, None, "2008-05-01 10:01:00"),
            ],
        )
        .activity(
            "000",
            "walk",
            &[
                (40.90, 116.30, None, "2008-05-02 10:00:00"),
                (40.90, 116.30, None, "2008-05-02 10:01:00"),
            ],
        )
        .load();

    let walk = QueryEngine::new(&db)
        .distance_by_mode("000", "walk", 2008)
        .unwrap();
    assert_eq!(walk.kilometers, 0.0);
}

#[test]
fn test_top_elevation_gain() {
    let db = fixture_db();
    let engine = QueryEngine::new(&db);

    let gains = engine.top_elevation_gain(20).unwrap();
    let summary: Vec<(&str, f64)> = gains
        .iter()
        .map(|g| (g.user_id.as_str(), g.total_elevation_gain))
        .collect();
    // 000: +50 on the walk, +30 on the taxi ride (unknown first altitude)
    // 001: +20 twice, +1 on the bus
    assert_eq!(summary, vec![("000", 80.0), ("001", 41.0)]);

    assert_eq!(engine.top_elevation_gain(1).unwrap().len(), 1);
}

#[test]
fn test_invalid_activities_threshold_is_strict() {
    let db = fixture_db();
    let engine = QueryEngine::new(&db);

    // 001's walk has a gap of exactly 300 seconds and is not counted
    assert_eq!(
        engine.invalid_activities(300.0).unwrap(),
        vec![InvalidActivities {
            user_id: "000".to_string(),
            invalid_activities: 2,
        }]
    );

    // Only the 1200 s gap of the walk exceeds this
    assert_eq!(engine.invalid_activities(1100.0).unwrap()[0].invalid_activities, 1);
    assert!(engine.invalid_activities(5000.0).unwrap().is_empty());
}

#[test]
fn test_delete_user_cascades_to_reports() {
    let db = fixture_db();
    assert!(db.delete_user("000").unwrap());

    let counts = QueryEngine::new(&db).dataset_counts().unwrap();
    assert_eq!(counts.users, 2);
    assert_eq!(counts.activities, 3);
    assert_eq!(counts.trackpoints, 6);
}
