//! Performance benchmarks for per-frame gesture processing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gesture_spotify::{
    constants::HAND_LANDMARK_COUNT,
    face_motion::FaceMotionDetector,
    hand_classifier::HandGestureClassifier,
    landmarks::{hand, LandmarkPoint},
};
use std::time::{Duration, Instant};

/// Hand with the given fingers extended; folded otherwise
fn hand_pose(extended: [bool; 4]) -> Vec<LandmarkPoint> {
    let mut lm = vec![LandmarkPoint::new(0.5, 0.8); HAND_LANDMARK_COUNT];
    for ((pip, tip), up) in [
        (hand::INDEX_PIP, hand::INDEX_TIP),
        (hand::MIDDLE_PIP, hand::MIDDLE_TIP),
        (hand::RING_PIP, hand::RING_TIP),
        (hand::PINKY_PIP, hand::PINKY_TIP),
    ]
    .into_iter()
    .zip(extended)
    {
        lm[pip].y = 0.5;
        lm[tip].y = if up { 0.3 } else { 0.6 };
    }
    lm[hand::THUMB_IP] = LandmarkPoint::new(0.3, 0.6);
    lm[hand::THUMB_TIP] = LandmarkPoint::new(0.25, 0.5);
    lm
}

fn bench_classifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("hand_classifier");
    let classifier = HandGestureClassifier::default();

    let poses = [
        ("pause", hand_pose([true, true, true, true])),
        ("play", hand_pose([true, true, false, false])),
        ("volume_up", hand_pose([false, false, false, false])),
    ];

    for (name, points) in &poses {
        group.bench_with_input(BenchmarkId::new("classify", name), points, |b, points| {
            b.iter(|| black_box(classifier.classify(black_box(points))));
        });
    }

    group.finish();
}

fn bench_face_motion(c: &mut Criterion) {
    let mut group = c.benchmark_group("face_motion");

    // Slow drift that never crosses the threshold
    let positions: Vec<f32> = (0..1000)
        .map(|i| 0.5 + (i as f32 * 0.01).sin() * 0.02)
        .collect();

    group.bench_function("update_1000_frames", |b| {
        b.iter(|| {
            let mut detector = FaceMotionDetector::default();
            let start = Instant::now();
            for (i, &x) in positions.iter().enumerate() {
                let now = start + Duration::from_millis(33 * i as u64);
                black_box(detector.update(Some(x), now));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_classifier, bench_face_motion);
criterion_main!(benches);
