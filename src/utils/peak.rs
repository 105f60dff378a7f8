//! Period selection on a YIN curve. Low curve values mean strong periodicity,
//! so "peaks" here are dips.

use crate::float::Float;

/// Curvature below which parabolic refinement is skipped.
const CURVATURE_EPSILON: f64 = 1e-4;

/// First lag in `min_lag..max_lag` whose value is below `threshold` and lower
/// than both neighbours. A neighbour outside the curve counts as higher, so the
/// last point of the curve can qualify on one comparison alone.
pub fn first_local_minimum<T: Float>(
    curve: &[T],
    min_lag: usize,
    max_lag: usize,
    threshold: T,
) -> Option<usize> {
    let stop = max_lag.min(curve.len());
    (min_lag.max(1)..stop).find(|&i| {
        curve[i] < threshold
            && curve[i] < curve[i - 1]
            && (i + 1 >= curve.len() || curve[i] < curve[i + 1])
    })
}

/// Lowest point in `min_lag..max_lag`; the earliest lag wins ties.
pub fn global_minimum<T: Float>(
    curve: &[T],
    min_lag: usize,
    max_lag: usize,
) -> Option<(usize, T)> {
    let stop = max_lag.min(curve.len());
    (min_lag..stop).fold(None, |best: Option<(usize, T)>, i| match best {
        Some((_, value)) if value <= curve[i] => best,
        _ => Some((i, curve[i])),
    })
}

/// Pick the period lag: the first qualifying local minimum, otherwise the
/// global minimum of the range if it is still below `threshold`. `max_lag`
/// itself is not searched.
///
/// A curve that is still falling at the end of the range has no local minimum
/// in it, and the fallback then lands on `max_lag - 1`, a lag that is not a
/// true minimum. This happens when the real period lies beyond the search range.
pub fn choose_lag<T: Float>(
    curve: &[T],
    min_lag: usize,
    max_lag: usize,
    threshold: T,
) -> Option<usize> {
    first_local_minimum(curve, min_lag, max_lag, threshold).or_else(|| {
        global_minimum(curve, min_lag, max_lag)
            .filter(|&(lag, value)| lag > 0 && value < threshold)
            .map(|(lag, _)| lag)
    })
}

/// Vertex offset of the parabola through `(-1, left)`, `(0, center)`, `(1, right)`,
/// or `None` when the points are (nearly) collinear.
fn quadratic_offset<T: Float>(left: T, center: T, right: T) -> Option<T> {
    let two = T::constant(2.0);
    let a = (right - two * center + left) / two;
    if a.magnitude() < T::constant(CURVATURE_EPSILON) {
        return None;
    }
    let b = (right - left) / two;
    Some(-b / (two * a))
}

/// Sub-sample estimate of the dip at `lag`. The correction is limited to half a
/// sample either way; lags without two neighbours are returned unchanged.
pub fn refine_lag<T: Float>(curve: &[T], lag: usize) -> T {
    let position = T::from_index(lag);
    if lag < 1 || lag + 1 >= curve.len() {
        return position;
    }
    let half = T::constant(0.5);
    match quadratic_offset(curve[lag - 1], curve[lag], curve[lag + 1]) {
        Some(offset) => position + offset.clamp_to(-half, half),
        None => position,
    }
}
