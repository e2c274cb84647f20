use std::f64::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pitch_tracking::config::TrackerConfig;
use pitch_tracking::estimator::autocorrelation::AutocorrelationEstimator;
use pitch_tracking::estimator::PitchEstimator;
use pitch_tracking::tracker::PitchTracker;

pub fn pitch_tracking_benchmark(c: &mut Criterion) {
    const SAMPLE_RATE: usize = 48000;
    const SIZE: usize = 2048;

    // Signal coming from some source (microphone, generated, etc...)
    let dt = 1.0 / SAMPLE_RATE as f64;
    let freq = 440.0;
    let signal: Vec<f64> = (0..SIZE)
        .map(|x| 0.5 * (2.0 * PI * x as f64 * dt * freq).sin())
        .collect();

    let mut estimator = AutocorrelationEstimator::new(&TrackerConfig::default());
    c.bench_function("Autocorrelation estimate", |b| {
        b.iter(|| estimator.estimate(black_box(&signal), SAMPLE_RATE))
    });

    let mut tracker = PitchTracker::new(TrackerConfig::default()).unwrap();
    c.bench_function("Tracker process_frame", |b| {
        b.iter(|| tracker.process_frame(black_box(&signal), SAMPLE_RATE))
    });
}

criterion_group!(benches, pitch_tracking_benchmark);
criterion_main!(benches);
