use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::float::Float;
use crate::utils::buffer::{copy_complex_to_real, copy_real_to_complex, modulus_squared};
use crate::utils::buffer::{new_complex_buffer, new_real_buffer, square_sum, BufferPool};

/// Cumulative difference below which the normalized curve is pinned to one.
const CUMULATIVE_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch<T>
where
    T: Float,
{
    pub frequency: T,
    pub clarity: T,
}

/// Forward/inverse FFT plans of a fixed length, planned once and reused for
/// every window.
pub struct Autocorrelator<T>
where
    T: Float,
{
    fft: Arc<dyn Fft<T>>,
    inv_fft: Arc<dyn Fft<T>>,
    scratch: Vec<Complex<T>>,
    len: usize,
}

impl<T> Autocorrelator<T>
where
    T: Float,
{
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(len);
        let inv_fft = planner.plan_fft_inverse(len);
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(inv_fft.get_inplace_scratch_len());

        Autocorrelator {
            fft,
            inv_fft,
            scratch: new_complex_buffer(scratch_len),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Compute the linear autocorrelation `r(t) = sum_i x_i * x_{i+t}` of
    /// `signal` for `t < result.len()`. `buffer` must have the planned length
    /// and is used as scratch.
    ///
    /// The signal is zero-padded to the planned length, so the circular
    /// correlation equals the linear one as long as
    /// `signal.len() + result.len() <= len`.
    pub fn autocorrelation(&mut self, signal: &[T], buffer: &mut [Complex<T>], result: &mut [T]) {
        assert_eq!(buffer.len(), self.len);
        assert!(
            signal.len() + result.len() <= self.len,
            "Zero padding is too short for a linear autocorrelation"
        );

        copy_real_to_complex(signal, buffer);
        self.fft.process_with_scratch(buffer, &mut self.scratch);
        modulus_squared(buffer);
        self.inv_fft.process_with_scratch(buffer, &mut self.scratch);
        copy_complex_to_real(buffer, result);

        // rustfft does not normalize; forward followed by inverse scales by `len`.
        let normalization_const = T::one() / T::from_index(self.len);
        result
            .iter_mut()
            .for_each(|r| *r = *r * normalization_const);
    }
}

/// Data structure to hold any buffers needed for pitch computation.
/// Everything is allocated once here rather than once per window: the
/// working copy of the window and the complex FFT buffer come from a
/// `BufferPool`, and the YIN curve lives alongside so it can be inspected
/// after each call.
pub struct DetectorInternals<T>
where
    T: Float,
{
    pub size: usize,
    pub padding: usize,
    pub buffers: BufferPool<T>,
    pub autocorrelator: Autocorrelator<T>,
    pub curve: Vec<T>,
}

impl<T> DetectorInternals<T>
where
    T: Float,
{
    pub fn new(size: usize, padding: usize) -> Self {
        let buffers = BufferPool::new(size, size + padding);
        let autocorrelator = Autocorrelator::new(size + padding);

        DetectorInternals {
            size,
            padding,
            buffers,
            autocorrelator,
            curve: new_real_buffer(size / 2),
        }
    }
}

/// Compute the square difference function of `signal` for every lag
/// `t < result.len()`:
///
///  > d(t) = sum_{i=0}^{N-t-1} (x_i - x_{i+t})^2
///
/// This is the reference O(N * result.len()) evaluation.
pub fn square_difference_direct<T>(signal: &[T], result: &mut [T])
where
    T: Float,
{
    assert!(result.len() <= signal.len());

    result.iter_mut().enumerate().for_each(|(t, r)| {
        *r = signal
            .iter()
            .zip(signal[t..].iter())
            .map(|(&a, &b)| (a - b) * (a - b))
            .sum();
    });
}

/// Same function as [square_difference_direct], computed through an FFT.
///
/// Expanding the square gives `d(t) = head(t) + tail(t) - 2 r(t)` where
/// `head(t)` is the power of `x_0..x_{N-t}`, `tail(t)` the power of
/// `x_t..x_N` and `r` the autocorrelation. Both power terms are updated
/// incrementally as `t` grows. FFT rounding can leave tiny negative values,
/// which are clamped to zero.
pub fn square_difference<T>(
    signal: &[T],
    autocorrelator: &mut Autocorrelator<T>,
    buffer: &mut [Complex<T>],
    result: &mut [T],
) where
    T: Float,
{
    assert!(result.len() <= signal.len());

    autocorrelator.autocorrelation(signal, buffer, result);

    let two = T::constant(2.0);
    let n = signal.len();
    let power = square_sum(signal);
    let mut head = power;
    let mut tail = power;

    result.iter_mut().enumerate().for_each(|(t, r)| {
        if t > 0 {
            head = head - signal[n - t] * signal[n - t];
            tail = tail - signal[t - 1] * signal[t - 1];
        }
        let d = head + tail - two * *r;
        *r = if d > T::zero() { d } else { T::zero() };
    });
}

/// Calculate the "cumulative mean normalized difference function" as
/// specified in the YIN paper. If _d(t)_ is the square error function,
/// compute _d'(0) = 1_ and for _t > 0_
///
///  > d'(t) = d(t) * t / sum_{i=1}^t d(i)
///
/// While that sum is still below 1e-4, _d'(t)_ is pinned to 1.
pub fn yin_normalize_square_error<T: Float>(square_error: &mut [T]) {
    if square_error.is_empty() {
        return;
    }
    let epsilon = T::constant(CUMULATIVE_EPSILON);
    let mut sum = T::zero();
    square_error[0] = T::one();
    square_error
        .iter_mut()
        .enumerate()
        .skip(1)
        .for_each(|(t, a)| {
            sum = sum + *a;
            *a = if sum > epsilon {
                *a * T::from_index(t) / sum
            } else {
                T::one()
            };
        });
}
