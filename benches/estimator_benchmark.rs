use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pitch_estimator::{
    detector::internals::{square_difference, square_difference_direct, DetectorInternals},
    DifferenceMethod, EstimatorConfig, PitchEstimator,
};

pub fn difference_benchmark(c: &mut Criterion) {
    const SIZE: usize = 4096;

    let signal: Vec<f64> = (0..SIZE)
        .map(|x| (2.0 * std::f64::consts::PI * x as f64 * 110.0 / 44100.0).sin())
        .collect();
    let mut internals = DetectorInternals::<f64>::new(SIZE, SIZE);
    let DetectorInternals {
        buffers,
        autocorrelator,
        ..
    } = &mut internals;
    let mut buffer = buffers.get_complex_buffer();
    let mut result = vec![0.0; SIZE / 2];

    c.bench_function("square_difference fft", |b| {
        b.iter(|| {
            square_difference(
                black_box(&signal),
                autocorrelator,
                &mut buffer[..],
                &mut result,
            )
        })
    });

    c.bench_function("square_difference direct", |b| {
        b.iter(|| square_difference_direct(black_box(&signal), &mut result))
    });
}

pub fn estimator_benchmark(c: &mut Criterion) {
    let config = EstimatorConfig::default();

    // Signal coming from some source (microphone, generated, etc...)
    let dt = 1.0 / config.sample_rate as f32;
    let freq = 82.41;
    let signal: Vec<f32> = (0..config.buffer_size)
        .map(|x| 0.5 * (2.0 * std::f32::consts::PI * x as f32 * dt * freq).sin())
        .collect();

    let mut fft_estimator = PitchEstimator::new(&config).unwrap();
    let mut direct_estimator =
        PitchEstimator::new(&config.clone().with_difference(DifferenceMethod::Direct)).unwrap();

    c.bench_function("PitchEstimator process fft", |b| {
        b.iter(|| fft_estimator.process(black_box(&signal)).unwrap())
    });

    c.bench_function("PitchEstimator process direct", |b| {
        b.iter(|| direct_estimator.process(black_box(&signal)).unwrap())
    });
}

criterion_group!(benches, difference_benchmark, estimator_benchmark);
criterion_main!(benches);
