//! Detector throughput benchmark.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use roadcheck_analysis::{RoadRules, SpeedZone, ViolationDetector};
use roadcheck_core::types::{Event, EventKind, LaneDirection, Timestamp};

fn synthetic_events(count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| {
            let kind = match i % 6 {
                0 => EventKind::Speed(25.0 + (i % 20) as f64),
                1 => EventKind::FollowDistance(1.0 + (i % 4) as f64),
                2 => EventKind::LaneChange(LaneDirection::Left),
                3 => EventKind::StopSignDetected,
                4 => EventKind::StopSignClear,
                _ => EventKind::Odometer((i as f64) * 0.001),
            };
            Event::new(Timestamp::from_secs(i as f64 * 0.1), kind)
        })
        .collect()
}

fn bench_detect(c: &mut Criterion) {
    let detector = ViolationDetector::from_parts(
        RoadRules {
            max_speed: 35.0,
            min_follow_distance: 2.0,
            stop_sign_wait: 3.0,
        },
        vec![
            SpeedZone {
                start_mile: 0.0,
                end_mile: 1.5,
                speed_limit: 30.0,
            },
            SpeedZone {
                start_mile: 1.5,
                end_mile: 3.0,
                speed_limit: 25.0,
            },
        ],
    );
    let events = synthetic_events(10_000);

    c.bench_function("detect_10k_events", |b| {
        b.iter(|| detector.detect(black_box(&events)).unwrap());
    });
}

criterion_group!(benches, bench_detect);
criterion_main!(benches);
