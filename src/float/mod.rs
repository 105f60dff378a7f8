//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use rustfft::num_traits::Float as NumFloat;
use rustfft::FftNum;
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Signals are processed as arrays of [Float]s. A [Float] is normally `f32` or `f64`.
pub trait Float: Display + Debug + NumFloat + FftNum + Sum {
    /// Convert an `f64` constant. Exact or correctly rounded for `f32` and `f64`.
    fn constant(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(Self::nan)
    }

    /// Convert a sample index or lag.
    fn from_index(index: usize) -> Self {
        Self::from_usize(index).unwrap_or_else(Self::nan)
    }

    /// Absolute value. Both `Signed` and `num_traits::Float` provide `abs`,
    /// so generic code calls this instead.
    fn magnitude(self) -> Self {
        NumFloat::abs(self)
    }

    /// Clamp into `[low, high]`. NaN is mapped to `low`.
    fn clamp_to(self, low: Self, high: Self) -> Self {
        if self.is_nan() {
            low
        } else {
            NumFloat::min(NumFloat::max(self, low), high)
        }
    }
}

impl Float for f64 {}
impl Float for f32 {}
