use crate::float::Float;

/// Peak amplitude below which [normalize_peak] leaves the signal alone.
const NORMALIZE_FLOOR: f64 = 1e-3;

/// Multiply `signal` in place by a Hann window, `0.5 * (1 - cos(2πi / (N - 1)))`.
pub fn apply_hann<T: Float>(signal: &mut [T]) {
    if signal.len() < 2 {
        return;
    }
    let half = T::constant(0.5);
    let step = T::constant(2.0 * std::f64::consts::PI) / T::from_index(signal.len() - 1);
    signal.iter_mut().enumerate().for_each(|(i, s)| {
        let w = half * (T::one() - (step * T::from_index(i)).cos());
        *s = *s * w;
    });
}

/// Scale `signal` so its largest magnitude is one. Returns the peak found.
/// Signals whose peak is below 1e-3 are not scaled, to avoid amplifying noise.
pub fn normalize_peak<T: Float>(signal: &mut [T]) -> T {
    let peak = signal.iter().fold(T::zero(), |max, &s| {
        let m = s.magnitude();
        if m > max {
            m
        } else {
            max
        }
    });
    if peak > T::constant(NORMALIZE_FLOOR) {
        signal.iter_mut().for_each(|s| *s = *s / peak);
    }
    peak
}
