/// Fixed-capacity circular buffer of the most recent samples of a stream.
///
/// A capture callback appends with [push][SampleRing::push]; once per tick the
/// consumer copies out the newest window with [snapshot][SampleRing::snapshot].
/// Nothing is allocated after construction.
///
/// ```rust
/// use pitch_estimator::utils::ring::SampleRing;
///
/// let mut ring = SampleRing::new(4);
/// ring.push(&[1.0f32, 2.0, 3.0]);
/// ring.push(&[4.0, 5.0]);
///
/// let mut window = [0.0; 3];
/// assert!(ring.snapshot(&mut window));
/// assert_eq!(window, [3.0, 4.0, 5.0]);
/// ```
#[derive(Debug, Clone)]
pub struct SampleRing<T> {
    data: Vec<T>,
    /// Index the next sample is written to.
    write: usize,
    filled: usize,
}

impl<T: Copy + Default> SampleRing<T> {
    pub fn new(capacity: usize) -> Self {
        SampleRing {
            data: vec![T::default(); capacity],
            write: 0,
            filled: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of valid samples, at most the capacity.
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.data.len()
    }

    pub fn clear(&mut self) {
        self.write = 0;
        self.filled = 0;
    }

    /// Append `samples`, overwriting the oldest ones once the ring is full.
    pub fn push(&mut self, samples: &[T]) {
        let capacity = self.data.len();
        if capacity == 0 || samples.is_empty() {
            return;
        }
        // Only the newest `capacity` samples can survive.
        let samples = &samples[samples.len().saturating_sub(capacity)..];

        let first = (capacity - self.write).min(samples.len());
        self.data[self.write..self.write + first].copy_from_slice(&samples[..first]);
        let rest = samples.len() - first;
        self.data[..rest].copy_from_slice(&samples[first..]);

        self.write = (self.write + samples.len()) % capacity;
        self.filled = (self.filled + samples.len()).min(capacity);
    }

    /// Copy the newest `out.len()` samples into `out`, oldest first. Returns
    /// `false`, leaving `out` untouched, when fewer samples have been recorded.
    pub fn snapshot(&self, out: &mut [T]) -> bool {
        let wanted = out.len();
        if wanted == 0 {
            return true;
        }
        if wanted > self.filled {
            return false;
        }
        let capacity = self.data.len();
        let start = (self.write + capacity - wanted) % capacity;
        let first = (capacity - start).min(wanted);
        out[..first].copy_from_slice(&self.data[start..start + first]);
        out[first..].copy_from_slice(&self.data[..wanted - first]);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_enough_samples_yet() {
        let mut ring = SampleRing::new(8);
        ring.push(&[1, 2, 3]);
        let mut out = [0; 4];
        assert!(!ring.snapshot(&mut out));
        assert_eq!(out, [0; 4]);
        assert_eq!(ring.len(), 3);
        assert!(!ring.is_full());
    }

    #[test]
    fn wraps_around() {
        let mut ring = SampleRing::new(5);
        ring.push(&[1, 2, 3, 4]);
        ring.push(&[5, 6, 7]);
        assert!(ring.is_full());

        let mut out = [0; 5];
        assert!(ring.snapshot(&mut out));
        assert_eq!(out, [3, 4, 5, 6, 7]);

        let mut last_two = [0; 2];
        assert!(ring.snapshot(&mut last_two));
        assert_eq!(last_two, [6, 7]);
    }

    #[test]
    fn oversized_push_keeps_the_tail() {
        let mut ring = SampleRing::new(3);
        ring.push(&[1, 2]);
        ring.push(&[3, 4, 5, 6, 7]);
        let mut out = [0; 3];
        assert!(ring.snapshot(&mut out));
        assert_eq!(out, [5, 6, 7]);
    }

    #[test]
    fn clear_forgets_samples() {
        let mut ring = SampleRing::new(3);
        ring.push(&[1.0f32, 2.0, 3.0]);
        ring.clear();
        assert!(ring.is_empty());
        let mut out = [0.0; 1];
        assert!(!ring.snapshot(&mut out));
    }

    #[test]
    fn zero_capacity_ring_stays_empty() {
        let mut ring = SampleRing::<f32>::new(0);
        ring.push(&[1.0]);
        assert!(ring.is_empty());
        assert!(ring.snapshot(&mut []));
        assert!(!ring.snapshot(&mut [0.0]));
    }
}
