use crate::float::Float;

/// The last few raw frequency estimates, newest first.
///
/// Slots start at zero and zero slots are left out of the mean, so the first
/// estimates after construction are averaged over fewer values.
#[derive(Debug, Clone)]
pub struct FrequencyHistory<T> {
    slots: Vec<T>,
}

impl<T: Float> FrequencyHistory<T> {
    pub fn new(depth: usize) -> Self {
        FrequencyHistory {
            slots: vec![T::zero(); depth],
        }
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Insert `frequency` as the newest entry and drop the oldest.
    pub fn push(&mut self, frequency: T) {
        if self.slots.is_empty() {
            return;
        }
        self.slots.rotate_right(1);
        self.slots[0] = frequency;
    }

    /// Mean of the positive entries, or zero when there are none.
    pub fn mean(&self) -> T {
        let (sum, count) = self
            .slots
            .iter()
            .filter(|&&f| f > T::zero())
            .fold((T::zero(), 0usize), |(sum, count), &f| (sum + f, count + 1));
        if count == 0 {
            T::zero()
        } else {
            sum / T::from_index(count)
        }
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|f| *f = T::zero());
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_has_zero_mean() {
        let history = FrequencyHistory::<f32>::new(5);
        assert_eq!(history.mean(), 0.0);
        assert_eq!(history.depth(), 5);
    }

    #[test]
    fn unfilled_slots_are_ignored() {
        let mut history = FrequencyHistory::new(5);
        history.push(100.0f64);
        history.push(110.0);
        assert_eq!(history.mean(), 105.0);
    }

    #[test]
    fn oldest_entry_is_dropped() {
        let mut history = FrequencyHistory::new(3);
        for f in [100.0f64, 200.0, 300.0, 400.0] {
            history.push(f);
        }
        let entries: Vec<f64> = history.iter().copied().collect();
        assert_eq!(entries, vec![400.0, 300.0, 200.0]);
        assert_eq!(history.mean(), 300.0);
    }

    #[test]
    fn clear_resets_every_slot() {
        let mut history = FrequencyHistory::new(2);
        history.push(82.0f32);
        history.clear();
        assert_eq!(history.mean(), 0.0);
    }
}
