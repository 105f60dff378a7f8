//! # Pitch Estimator
//! *pitch_estimator* estimates the fundamental frequency of a monophonic
//! instrument (a guitar, typically) from a live stream of audio windows and turns it
//! into a steady note readout for a tuner or a fretboard display.
//!
//! Each window goes through
//!
//!   * an energy gate that reports silence as "no pitch",
//!   * the [YIN detector][detector::yin] (Hann window, peak normalization,
//!     cumulative mean normalized difference, parabolic refinement),
//!   * a short moving average over the last few estimates,
//!   * an optional octave-error correction for very low estimates,
//!   * [note mapping][note] and note-change debouncing.
//!
//! # Examples
//! ```
//! use pitch_estimator::{EstimatorConfig, PitchEstimator};
//!
//! fn main() -> Result<(), pitch_estimator::Error> {
//!     let config = EstimatorConfig::default();
//!     let mut estimator = PitchEstimator::<f32>::new(&config)?;
//!
//!     // Signal coming from some source (microphone, generated, etc...)
//!     let dt = 1.0 / config.sample_rate as f32;
//!     let freq = 110.0;
//!     let window: Vec<f32> = (0..config.buffer_size)
//!         .map(|x| 0.5 * (2.0 * std::f32::consts::PI * x as f32 * dt * freq).sin())
//!         .collect();
//!
//!     let estimate = estimator.process(&window)?;
//!     assert_eq!(estimate.note_name(), "A2");
//!     println!("{}", estimate);
//!     Ok(())
//! }
//! ```

pub use config::{DifferenceMethod, EstimatorConfig, LagBounds, OctaveCorrection};
pub use detector::internals::Pitch;
pub use error::{Error, Result};
pub use estimator::{PitchEstimate, PitchEstimator};
pub use note::{Note, PitchClass};
pub use utils::ring::SampleRing;

#[cfg(feature = "capture")]
pub mod capture;
pub mod config;
pub mod detector;
pub mod error;
pub mod estimator;
pub mod float;
pub mod note;
pub mod utils;
