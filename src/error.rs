use thiserror::Error;

/// Errors raised for API misuse. Degenerate audio (silence, noise, clipping)
/// is never an error: it produces a "no pitch" estimate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("window has {actual} samples, estimator expects {expected}")]
    WindowLength { expected: usize, actual: usize },

    #[error("sample rate must be non-zero")]
    SampleRate,

    #[error("buffer size {0} is too small, need at least 4 samples")]
    BufferSize(usize),

    #[error("invalid detectable frequency range {min} Hz..{max} Hz")]
    FrequencyRange { min: f64, max: f64 },

    #[error("lag range {min_lag}..{max_lag} is empty or exceeds a YIN curve of {curve_len}")]
    LagRange {
        min_lag: usize,
        max_lag: usize,
        curve_len: usize,
    },

    #[error("YIN threshold {0} must lie in (0, 1]")]
    Threshold(f64),

    #[error("frequency history needs at least one slot")]
    HistoryDepth,

    #[error("invalid octave correction: floor {floor} Hz, ceiling {ceiling} Hz")]
    OctaveCorrection { floor: f64, ceiling: f64 },

    #[error("reference pitch must be a positive frequency, got {0} Hz")]
    ReferencePitch(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
