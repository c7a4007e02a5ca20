use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pr_tracker::engine::distance::{canonical_distances, TargetDistance};
use pr_tracker::engine::segment::{
    find_best_segments, ActivitySampleStream, MalformedSamplePolicy,
};

/// Synthetic three-hour run at one sample per second, pace oscillating
/// between 3.0 and 4.0 m/s.
fn three_hour_stream() -> ActivitySampleStream {
    let n = 10_800;
    let mut time = Vec::with_capacity(n);
    let mut distance = Vec::with_capacity(n);
    let mut d = 0.0;

    for i in 0..n {
        time.push(i as f64);
        d += 3.0 + ((i % 600) as f64 / 600.0);
        distance.push(d);
    }

    let positions = vec![None; n];
    ActivitySampleStream::new(time, distance, positions, MalformedSamplePolicy::Reject)
        .expect("valid stream")
}

fn benchmark_find_best_segments(c: &mut Criterion) {
    let stream = three_hour_stream();
    let targets = canonical_distances();
    let unreachable = vec![TargetDistance {
        label: "100K".to_string(),
        meters: 100_000.0,
    }];

    let mut group = c.benchmark_group("segment_finder");

    group.bench_function("canonical_targets_three_hour_run", |b| {
        b.iter(|| find_best_segments(black_box(&stream), black_box(&targets)))
    });

    group.bench_function("unreachable_target_terminates_early", |b| {
        b.iter(|| find_best_segments(black_box(&stream), black_box(&unreachable)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_find_best_segments);
criterion_main!(benches);
