use criterion::{criterion_group, criterion_main, Criterion};
use geolife_tracker::models::{ColocationRecord, EARTH_MEAN_RADIUS_M};
use geolife_tracker::services::CoLocationDetector;
use geolife_tracker::time_utils::SECONDS_PER_DAY;
use std::hint::black_box;

const BASE_DAYS: f64 = 39744.0;

/// Synthetic day of `users` walkers, one sample every 5 seconds for an hour,
/// drifting north from a shared start so that neighbours overlap.
fn synthetic_records(users: usize) -> Vec<ColocationRecord> {
    let mut records = Vec::new();
    for user in 0..users {
        let start_secs = (user % 4) as f64 * 900.0;
        let offset_m = user as f64 * 30.0;
        for step in 0..720 {
            let north_m = offset_m + step as f64 * 1.5;
            records.push(ColocationRecord {
                user_id: format!("{user:03}"),
                activity_id: user as u64,
                trackpoint_id: records.len() as u64,
                lat: 39.9 + (north_m / EARTH_MEAN_RADIUS_M).to_degrees(),
                lon: 116.3,
                date_days: BASE_DAYS + (start_secs + step as f64 * 5.0) / SECONDS_PER_DAY,
            });
        }
    }
    records
}

fn benchmark_detect(c: &mut Criterion) {
    let detector = CoLocationDetector::default();
    let small = synthetic_records(8);
    let large = synthetic_records(40);

    let mut group = c.benchmark_group("colocation");
    group.sample_size(10);

    group.bench_function("8_users", |b| {
        b.iter(|| detector.detect(black_box(&small)))
    });

    group.bench_function("40_users", |b| {
        b.iter(|| detector.detect(black_box(&large)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_detect);
criterion_main!(benches);
