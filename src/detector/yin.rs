//! The YIN pitch detection algorithm is based on the algorithm from the paper
//! *[YIN, a fundamental frequency estimator for speech and music](http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf)*.
//!
//! Let $S=(s_0,s_1,\ldots,s_{N-1})$ be a discrete signal. The *square difference function* at lag $t$
//! is defined by
//! $$ d(t) = \sum_{i=0}^{N-t-1} (s_i-s_{i+t})^2. $$
//! This function is close to zero when the signal "lines up" with itself. Its scale depends on
//! volume, so YIN computes the *cumulative mean normalized difference function*
//! $$ d\'(t) = \begin{cases}1&\text{if }t=0\\\\ d(t) / \left[ \tfrac{1}{t}\sum_{i=1}^t d(i) \right] & \text{otherwise}\end{cases} $$
//! and searches it for the first local minimum below a threshold.
//!
//! ## Implementation
//! Before the difference function is computed, a working copy of the window is
//! tapered with a Hann window and scaled to a unit peak. The difference function is
//! evaluated through a zero-padded [FFT](https://en.wikipedia.org/wiki/Fast_Fourier_transform)
//! by default, or literally with [DifferenceMethod::Direct].
//!
//! The search only covers lags matching the configured frequency range. When no
//! local minimum qualifies, the deepest point of that range is used if it is
//! still below the threshold. The chosen lag is refined by fitting a parabola
//! through it and its two neighbours.

use crate::config::{DifferenceMethod, EstimatorConfig, LagBounds};
use crate::detector::internals::{
    square_difference, square_difference_direct, yin_normalize_square_error, DetectorInternals,
    Pitch,
};
use crate::detector::PitchDetector;
use crate::error::Result;
use crate::float::Float;
use crate::utils::buffer::rms;
use crate::utils::peak::{choose_lag, refine_lag};
use crate::utils::window::{apply_hann, normalize_peak};

pub struct YINDetector<T>
where
    T: Float,
{
    internals: DetectorInternals<T>,
    bounds: LagBounds,
    sample_rate: T,
    threshold: T,
    min_energy: T,
    method: DifferenceMethod,
}

impl<T> YINDetector<T>
where
    T: Float,
{
    pub fn new(config: &EstimatorConfig) -> Result<Self> {
        let bounds = config.validate()?;
        // Padding the FFT to twice the window keeps the circular correlation
        // linear over the whole curve.
        let internals = DetectorInternals::new(config.buffer_size, config.buffer_size);

        Ok(YINDetector {
            internals,
            bounds,
            sample_rate: T::from_index(config.sample_rate),
            threshold: T::constant(config.yin_threshold),
            min_energy: T::constant(config.min_energy),
            method: config.difference,
        })
    }

    /// Samples per window.
    pub fn size(&self) -> usize {
        self.internals.size
    }

    pub fn lag_bounds(&self) -> LagBounds {
        self.bounds
    }

    /// The YIN curve of the last window that passed the energy gate. It has
    /// `size() / 2` points and is all zeros before the first such window.
    pub fn curve(&self) -> &[T] {
        &self.internals.curve
    }
}

/// Pitch detection based on the YIN algorithm. See <http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf>
impl<T> PitchDetector<T> for YINDetector<T>
where
    T: Float,
{
    fn get_pitch(&mut self, signal: &[T]) -> Option<Pitch<T>> {
        assert_eq!(signal.len(), self.internals.size);

        // STEP 1: Energy gate. NaN input fails the comparison and is gated too.
        let energy = rms(signal);
        if !(energy >= self.min_energy) {
            return None;
        }

        let DetectorInternals {
            buffers,
            autocorrelator,
            curve,
            ..
        } = &mut self.internals;

        // STEP 2: Taper and normalize a working copy; the caller's window is untouched.
        let mut work = buffers.get_real_buffer();
        let work = &mut work[..];
        work.copy_from_slice(signal);
        apply_hann(work);
        normalize_peak(work);

        // STEP 3: Calculate the difference function, d_t.
        match self.method {
            DifferenceMethod::Fft => {
                let mut buffer = buffers.get_complex_buffer();
                square_difference(work, autocorrelator, &mut buffer[..], curve);
            }
            DifferenceMethod::Direct => square_difference_direct(work, curve),
        }

        // STEP 4: Calculate the cumulative mean normalized difference function, d_t'.
        yin_normalize_square_error(curve);

        // STEP 5: The absolute threshold, restricted to the configured lag range.
        let lag = choose_lag(curve, self.bounds.min_lag, self.bounds.max_lag, self.threshold)?;

        // STEP 6: Parabolic interpolation around the chosen lag.
        let refined = refine_lag(curve, lag);
        if !(refined > T::zero()) {
            return None;
        }
        let frequency = self.sample_rate / refined;
        if !frequency.is_finite() {
            return None;
        }

        // YIN has no clarity measure of its own; a lower normalized difference
        // means a cleaner period, so report 1 - d'(lag).
        let clarity = (T::one() - curve[lag]).clamp_to(T::zero(), T::one());

        Some(Pitch { frequency, clarity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, size: usize, sample_rate: usize) -> Vec<f32> {
        let dx = 2.0 * std::f64::consts::PI * freq / sample_rate as f64;
        (0..size)
            .map(|i| (0.5 * (i as f64 * dx).sin()) as f32)
            .collect()
    }

    #[test]
    fn curve_shape() {
        let config = EstimatorConfig::default();
        let mut detector = YINDetector::<f32>::new(&config).unwrap();
        let signal = sine(440.0, config.buffer_size, config.sample_rate);
        detector.get_pitch(&signal).unwrap();

        let curve = detector.curve();
        assert_eq!(curve.len(), config.buffer_size / 2);
        assert_eq!(curve[0], 1.0);
        assert!(curve.iter().all(|&v| v >= 0.0 && v.is_finite()));
        // The period of 440 Hz at 44.1 kHz is just over 100 samples.
        assert!(curve[100] < 0.15);
        assert!(curve[50] > 0.5);
    }

    #[test]
    fn sine_a4() {
        let config = EstimatorConfig::default();
        let mut detector = YINDetector::<f32>::new(&config).unwrap();
        let pitch = detector
            .get_pitch(&sine(440.0, config.buffer_size, config.sample_rate))
            .unwrap();
        assert!((pitch.frequency - 440.0).abs() < 1.0);
        assert!(pitch.clarity > 0.95);
    }

    #[test]
    fn direct_and_fft_agree() {
        let fft_config = EstimatorConfig::default();
        let direct_config = fft_config.clone().with_difference(DifferenceMethod::Direct);
        let mut fft = YINDetector::<f64>::new(&fft_config).unwrap();
        let mut direct = YINDetector::<f64>::new(&direct_config).unwrap();

        let signal: Vec<f64> = sine(196.0, 4096, 44100).iter().map(|&s| s as f64).collect();
        let a = fft.get_pitch(&signal).unwrap();
        let b = direct.get_pitch(&signal).unwrap();
        assert!((a.frequency - b.frequency).abs() < 1e-6);
        assert!((a.clarity - b.clarity).abs() < 1e-6);

        for (x, y) in fft.curve().iter().zip(direct.curve()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn silence_is_gated() {
        let config = EstimatorConfig::default();
        let mut detector = YINDetector::<f32>::new(&config).unwrap();
        assert!(detector.get_pitch(&vec![0.0; 4096]).is_none());
        assert!(detector.get_pitch(&vec![5e-5; 4096]).is_none());
        assert!(detector.get_pitch(&vec![f32::NAN; 4096]).is_none());
    }

    #[test]
    fn input_is_not_modified() {
        let config = EstimatorConfig::default();
        let mut detector = YINDetector::<f32>::new(&config).unwrap();
        let signal = sine(330.0, 4096, 44100);
        let copy = signal.clone();
        detector.get_pitch(&signal);
        assert_eq!(signal, copy);
    }

    #[test]
    fn lag_bounds_follow_config() {
        let config = EstimatorConfig::default().with_frequency_range(80.0, 1000.0);
        let detector = YINDetector::<f64>::new(&config).unwrap();
        assert_eq!(detector.size(), 4096);
        assert_eq!(
            detector.lag_bounds(),
            LagBounds {
                min_lag: 44,
                max_lag: 551
            }
        );
    }
}
