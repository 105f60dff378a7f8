//! Construction-time parameters of a [PitchEstimator][crate::estimator::PitchEstimator].
//!
//! The defaults target a guitar played into a laptop microphone: 4096-sample
//! windows at 44.1 kHz, detectable range 50–1500 Hz.

use log::debug;

use crate::error::{Error, Result};
use crate::float::Float;

/// How the YIN difference function is evaluated. Both give the same curve up to
/// rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DifferenceMethod {
    /// Autocorrelation through a zero-padded FFT, O(N log N).
    #[default]
    Fft,
    /// The literal double sum, O(N²).
    Direct,
}

/// Octave-error heuristic: a smoothed estimate below `floor` is assumed to be a
/// subharmonic and doubled while the doubled value stays below `ceiling`.
///
/// There is no confidence check after doubling, so a genuinely low pitch
/// (an in-tune low B on a five-string bass, say) is reported an octave up.
/// Disable it with `EstimatorConfig::with_octave_correction(None)` when such
/// pitches are expected.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OctaveCorrection {
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for OctaveCorrection {
    fn default() -> Self {
        OctaveCorrection {
            floor: 60.0,
            ceiling: 2000.0,
        }
    }
}

impl OctaveCorrection {
    /// Apply the heuristic. Zero, negative and non-finite frequencies pass through.
    pub fn apply<T: Float>(&self, frequency: T) -> T {
        let floor = T::constant(self.floor);
        let ceiling = T::constant(self.ceiling);
        let two = T::constant(2.0);

        let mut corrected = frequency;
        if !(corrected > T::zero()) || !corrected.is_finite() {
            return corrected;
        }
        while corrected < floor && corrected * two < ceiling {
            corrected = corrected * two;
        }
        corrected
    }

    fn validate(&self) -> Result<()> {
        let valid = |f: f64| f.is_finite() && f > 0.0;
        if valid(self.floor) && valid(self.ceiling) {
            Ok(())
        } else {
            Err(Error::OctaveCorrection {
                floor: self.floor,
                ceiling: self.ceiling,
            })
        }
    }
}

/// Lag search range derived from the detectable frequency range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LagBounds {
    pub min_lag: usize,
    pub max_lag: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EstimatorConfig {
    /// Samples per second of the incoming windows.
    pub sample_rate: usize,
    /// Samples per window. The YIN curve has half as many points.
    pub buffer_size: usize,
    pub min_frequency: f64,
    pub max_frequency: f64,
    /// Upper bound on the YIN dissimilarity of an accepted period.
    pub yin_threshold: f64,
    /// RMS below which a window counts as silence.
    pub min_energy: f64,
    /// Number of raw estimates averaged into the reported frequency.
    pub history_depth: usize,
    /// Consecutive ticks a new note must persist before it is reported.
    pub debounce_frames: usize,
    pub octave_correction: Option<OctaveCorrection>,
    /// Frequency of A4 used for note mapping.
    pub reference_pitch: f64,
    pub difference: DifferenceMethod,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        EstimatorConfig {
            sample_rate: 44100,
            buffer_size: 4096,
            min_frequency: 50.0,
            max_frequency: 1500.0,
            yin_threshold: 0.15,
            min_energy: 1e-4,
            history_depth: 5,
            debounce_frames: 1,
            octave_correction: Some(OctaveCorrection::default()),
            reference_pitch: 440.0,
            difference: DifferenceMethod::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn with_sample_rate(mut self, sample_rate: usize) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_frequency_range(mut self, min_frequency: f64, max_frequency: f64) -> Self {
        self.min_frequency = min_frequency;
        self.max_frequency = max_frequency;
        self
    }

    pub fn with_threshold(mut self, yin_threshold: f64) -> Self {
        self.yin_threshold = yin_threshold;
        self
    }

    pub fn with_min_energy(mut self, min_energy: f64) -> Self {
        self.min_energy = min_energy;
        self
    }

    pub fn with_history_depth(mut self, history_depth: usize) -> Self {
        self.history_depth = history_depth;
        self
    }

    pub fn with_debounce_frames(mut self, debounce_frames: usize) -> Self {
        self.debounce_frames = debounce_frames;
        self
    }

    pub fn with_octave_correction(mut self, correction: Option<OctaveCorrection>) -> Self {
        self.octave_correction = correction;
        self
    }

    pub fn with_reference_pitch(mut self, reference_pitch: f64) -> Self {
        self.reference_pitch = reference_pitch;
        self
    }

    pub fn with_difference(mut self, difference: DifferenceMethod) -> Self {
        self.difference = difference;
        self
    }

    /// Length of the YIN curve computed from one window.
    pub fn curve_len(&self) -> usize {
        self.buffer_size / 2
    }

    /// Check every parameter and derive the lag search range.
    ///
    /// `min_lag = floor(sample_rate / max_frequency)` and
    /// `max_lag = floor(sample_rate / min_frequency)` must satisfy
    /// `1 <= min_lag < max_lag < buffer_size / 2`. The period search covers
    /// `min_lag..max_lag`.
    pub fn validate(&self) -> Result<LagBounds> {
        if self.sample_rate == 0 {
            return Err(Error::SampleRate);
        }
        if self.buffer_size < 4 {
            return Err(Error::BufferSize(self.buffer_size));
        }
        let (min, max) = (self.min_frequency, self.max_frequency);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
            return Err(Error::FrequencyRange { min, max });
        }
        if !(self.yin_threshold > 0.0 && self.yin_threshold <= 1.0) {
            return Err(Error::Threshold(self.yin_threshold));
        }
        if self.history_depth == 0 {
            return Err(Error::HistoryDepth);
        }
        if !(self.reference_pitch.is_finite() && self.reference_pitch > 0.0) {
            return Err(Error::ReferencePitch(self.reference_pitch));
        }
        if let Some(correction) = &self.octave_correction {
            correction.validate()?;
        }

        let sample_rate = self.sample_rate as f64;
        let min_lag = (sample_rate / max).floor() as usize;
        let max_lag = (sample_rate / min).floor() as usize;
        let curve_len = self.curve_len();
        if min_lag < 1 || max_lag <= min_lag || max_lag >= curve_len {
            return Err(Error::LagRange {
                min_lag,
                max_lag,
                curve_len,
            });
        }

        debug!(
            "Lag search range {}..{} for {} Hz..{} Hz at {} Hz",
            min_lag, max_lag, min, max, self.sample_rate
        );
        Ok(LagBounds { min_lag, max_lag })
    }
}
