//! The tick-driven estimator: one window in, one [PitchEstimate] out.
//!
//! Each call to [PitchEstimator::process] runs the [YIN detector][crate::detector::yin]
//! on the window, then smooths the result over the last few ticks, applies
//! the octave-error heuristic, maps the frequency to a note and debounces note
//! changes. Windows that are silent or have no clear period produce
//! [PitchEstimate::none] and reset the debounce state.
//!
//! The estimator holds mutable per-tick state and `process` takes `&mut self`;
//! share one between threads behind a lock or give it a single owner.

use std::fmt;

use log::{debug, trace};

use crate::config::{EstimatorConfig, OctaveCorrection};
use crate::detector::internals::Pitch;
use crate::detector::yin::YINDetector;
use crate::detector::PitchDetector;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::note::{Note, NO_NOTE};

pub mod history;
pub mod stabilizer;

use history::FrequencyHistory;
use stabilizer::NoteStabilizer;

/// What the estimator reports for one tick.
///
/// `frequency` is zero exactly when `note` is `None`; `confidence` lies in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchEstimate<T> {
    /// Smoothed fundamental frequency in Hz, after octave correction.
    pub frequency: T,
    pub note: Option<Note>,
    pub confidence: T,
}

impl<T: Float> PitchEstimate<T> {
    /// The "no pitch" estimate.
    pub fn none() -> Self {
        PitchEstimate {
            frequency: T::zero(),
            note: None,
            confidence: T::zero(),
        }
    }

    pub fn is_pitched(&self) -> bool {
        self.note.is_some()
    }

    /// The note as text, e.g. `"E2"`, or `"none"`.
    pub fn note_name(&self) -> String {
        match self.note {
            Some(note) => note.to_string(),
            None => NO_NOTE.to_string(),
        }
    }
}

impl<T: Float> Default for PitchEstimate<T> {
    fn default() -> Self {
        PitchEstimate::none()
    }
}

impl<T: Float> fmt::Display for PitchEstimate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.1} Hz (confidence {:.2})",
            self.note_name(),
            self.frequency,
            self.confidence
        )
    }
}

pub struct PitchEstimator<T>
where
    T: Float,
{
    detector: YINDetector<T>,
    history: FrequencyHistory<T>,
    stabilizer: NoteStabilizer,
    octave_correction: Option<OctaveCorrection>,
    reference_pitch: T,
    latest: PitchEstimate<T>,
}

impl<T> PitchEstimator<T>
where
    T: Float,
{
    pub fn new(config: &EstimatorConfig) -> Result<Self> {
        let detector = YINDetector::new(config)?;

        Ok(PitchEstimator {
            detector,
            history: FrequencyHistory::new(config.history_depth),
            stabilizer: NoteStabilizer::new(config.debounce_frames),
            octave_correction: config.octave_correction,
            reference_pitch: T::constant(config.reference_pitch),
            latest: PitchEstimate::none(),
        })
    }

    /// Samples expected per window.
    pub fn buffer_size(&self) -> usize {
        self.detector.size()
    }

    /// The estimate produced by the last call to [process][Self::process].
    pub fn latest(&self) -> &PitchEstimate<T> {
        &self.latest
    }

    pub fn detector(&self) -> &YINDetector<T> {
        &self.detector
    }

    pub fn history(&self) -> &FrequencyHistory<T> {
        &self.history
    }

    /// Forget the smoothing history and the accepted note, e.g. after
    /// switching input devices.
    pub fn reset(&mut self) {
        self.history.clear();
        self.stabilizer.reset();
        self.latest = PitchEstimate::none();
    }

    /// Estimate the pitch of one window of `buffer_size()` samples.
    ///
    /// The only error is a window of the wrong length; silence and noise give
    /// [PitchEstimate::none].
    pub fn process(&mut self, window: &[T]) -> Result<PitchEstimate<T>> {
        if window.len() != self.buffer_size() {
            return Err(Error::WindowLength {
                expected: self.buffer_size(),
                actual: window.len(),
            });
        }

        let estimate = match self.detector.get_pitch(window) {
            Some(pitch) => self.track(pitch),
            None => self.silence(),
        };

        trace!("{}", estimate);
        self.latest = estimate;
        Ok(estimate)
    }

    fn silence(&mut self) -> PitchEstimate<T> {
        self.stabilizer.reset();
        PitchEstimate::none()
    }

    fn track(&mut self, pitch: Pitch<T>) -> PitchEstimate<T> {
        self.history.push(pitch.frequency);
        let smoothed = self.history.mean();

        let frequency = match &self.octave_correction {
            Some(correction) => {
                let corrected = correction.apply(smoothed);
                if corrected != smoothed {
                    debug!(
                        "Octave correction: {:.1} Hz -> {:.1} Hz",
                        smoothed, corrected
                    );
                }
                corrected
            }
            None => smoothed,
        };

        if !(frequency > T::zero() && frequency.is_finite()) {
            return self.silence();
        }
        let candidate = match Note::from_frequency(frequency, self.reference_pitch) {
            Some(note) => note,
            None => return self.silence(),
        };

        PitchEstimate {
            frequency,
            note: Some(self.stabilizer.observe(candidate)),
            confidence: pitch.clarity.clamp_to(T::zero(), T::one()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, size: usize) -> Vec<f32> {
        let dx = 2.0 * std::f64::consts::PI * freq / 44100.0;
        (0..size).map(|i| (0.5 * (i as f64 * dx).sin()) as f32).collect()
    }

    #[test]
    fn none_estimate() {
        let none = PitchEstimate::<f32>::none();
        assert_eq!(none.frequency, 0.0);
        assert_eq!(none.confidence, 0.0);
        assert_eq!(none.note_name(), "none");
        assert!(!none.is_pitched());
        assert_eq!(PitchEstimate::<f64>::default(), PitchEstimate::none());
    }

    #[test]
    fn display_matches_tuner_readout() {
        let estimate = PitchEstimate {
            frequency: 82.4f32,
            note: Some(Note::from_midi(40)),
            confidence: 0.93,
        };
        assert_eq!(estimate.to_string(), "E2 82.4 Hz (confidence 0.93)");
    }

    #[test]
    fn wrong_window_length() {
        let mut estimator = PitchEstimator::<f32>::new(&EstimatorConfig::default()).unwrap();
        assert_eq!(
            estimator.process(&[0.0; 1024]),
            Err(Error::WindowLength {
                expected: 4096,
                actual: 1024
            })
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EstimatorConfig::default().with_history_depth(0);
        assert!(matches!(
            PitchEstimator::<f32>::new(&config),
            Err(Error::HistoryDepth)
        ));
    }

    #[test]
    fn latest_tracks_last_tick() {
        let mut estimator = PitchEstimator::<f32>::new(&EstimatorConfig::default()).unwrap();
        let estimate = estimator.process(&sine(440.0, 4096)).unwrap();
        assert_eq!(*estimator.latest(), estimate);
        assert_eq!(estimate.note_name(), "A4");

        estimator.process(&vec![0.0; 4096]).unwrap();
        assert_eq!(*estimator.latest(), PitchEstimate::none());
    }

    #[test]
    fn reset_clears_history() {
        let mut estimator = PitchEstimator::<f32>::new(&EstimatorConfig::default()).unwrap();
        estimator.process(&sine(440.0, 4096)).unwrap();
        assert!(estimator.history().mean() > 0.0);

        estimator.reset();
        assert_eq!(estimator.history().mean(), 0.0);
        assert_eq!(*estimator.latest(), PitchEstimate::none());

        let estimate = estimator.process(&sine(220.0, 4096)).unwrap();
        assert_eq!(estimate.note_name(), "A3");
    }
}
