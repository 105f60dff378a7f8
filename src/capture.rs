//! Microphone capture into a [SampleRing] (feature `capture`).
//!
//! The default input device records continuously; the audio callback
//! downmixes each frame to mono and appends it to a shared ring. The tick loop
//! calls [Microphone::latest_window] to copy out the newest window and hands
//! it to a [PitchEstimator][crate::PitchEstimator]:
//!
//! ```no_run
//! use pitch_estimator::capture::Microphone;
//! use pitch_estimator::{EstimatorConfig, PitchEstimator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let microphone = Microphone::open_default(4096)?;
//! let config = EstimatorConfig::default().with_sample_rate(microphone.sample_rate());
//! let mut estimator = PitchEstimator::<f32>::new(&config)?;
//! let mut window = vec![0.0; config.buffer_size];
//! loop {
//!     if microphone.latest_window(&mut window) {
//!         println!("{}", estimator.process(&window)?);
//!     }
//!     std::thread::sleep(std::time::Duration::from_millis(16));
//! }
//! # }
//! ```

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use log::{info, warn};
use parking_lot::Mutex;
use thiserror::Error;

use crate::utils::ring::SampleRing;

/// Audio capture errors
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("No input device found")]
    NoInputDevice,

    #[error("Failed to get device config: {0}")]
    ConfigError(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to build audio stream: {0}")]
    StreamError(String),

    #[error("Failed to start stream: {0}")]
    PlayError(String),
}

/// A running input stream feeding a ring of recent mono samples.
pub struct Microphone {
    // Dropping the stream stops capture.
    _stream: Stream,
    ring: Arc<Mutex<SampleRing<f32>>>,
    sample_rate: usize,
    device_name: String,
}

impl Microphone {
    /// Start recording from the default input device. The ring keeps
    /// `capacity` samples, which must cover the largest window requested.
    pub fn open_default(capacity: usize) -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(CaptureError::NoInputDevice)?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let supported = device
            .default_input_config()
            .map_err(|e| CaptureError::ConfigError(e.to_string()))?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let channels = usize::from(config.channels.max(1));
        let sample_rate = config.sample_rate.0 as usize;

        let ring = Arc::new(Mutex::new(SampleRing::new(capacity)));
        let on_error = |e: cpal::StreamError| warn!("Input stream error: {}", e);

        let stream = match sample_format {
            SampleFormat::F32 => {
                let ring = Arc::clone(&ring);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        push_mono(&ring, data, channels, |s| s)
                    },
                    on_error,
                    None,
                )
            }
            SampleFormat::I16 => {
                let ring = Arc::clone(&ring);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        push_mono(&ring, data, channels, |s| s as f32 / 32768.0)
                    },
                    on_error,
                    None,
                )
            }
            other => return Err(CaptureError::UnsupportedFormat(format!("{:?}", other))),
        }
        .map_err(|e| CaptureError::StreamError(e.to_string()))?;

        stream
            .play()
            .map_err(|e| CaptureError::PlayError(e.to_string()))?;

        info!(
            "Recording from {} at {} Hz ({} channel(s))",
            device_name, sample_rate, channels
        );

        Ok(Microphone {
            _stream: stream,
            ring,
            sample_rate,
            device_name,
        })
    }

    pub fn sample_rate(&self) -> usize {
        self.sample_rate
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Copy the newest `window.len()` samples into `window`. Returns `false`
    /// until enough audio has been recorded.
    pub fn latest_window(&self, window: &mut [f32]) -> bool {
        self.ring.lock().snapshot(window)
    }
}

/// Average interleaved frames down to one channel and append them to the ring.
fn push_mono<S: Copy>(
    ring: &Mutex<SampleRing<f32>>,
    data: &[S],
    channels: usize,
    to_f32: impl Fn(S) -> f32,
) {
    let scale = 1.0 / channels as f32;
    let mut ring = ring.lock();
    for frame in data.chunks(channels) {
        let mono = frame.iter().map(|&s| to_f32(s)).sum::<f32>() * scale;
        ring.push(&[mono]);
    }
}
