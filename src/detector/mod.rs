use crate::detector::internals::Pitch;
use crate::float::Float;

pub mod internals;
pub mod yin;

/// A per-window pitch detector. Detectors keep scratch buffers between calls
/// but no musical state: the same window always gives the same answer.
pub trait PitchDetector<T>
where
    T: Float,
{
    /// `None` when the window is too quiet or has no clear period in the
    /// configured range.
    fn get_pitch(&mut self, signal: &[T]) -> Option<Pitch<T>>;
}
