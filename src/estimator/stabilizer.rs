use log::debug;

use crate::note::Note;

/// Note-change hysteresis.
///
/// A note that differs from the accepted one has to be observed on
/// `debounce_frames` consecutive ticks before it replaces it; until then the
/// accepted note keeps being reported. A debounce of 0 or 1 accepts changes
/// immediately. When nothing has been accepted yet (start-up, or after
/// [reset][NoteStabilizer::reset]) the first note is taken as is.
#[derive(Debug, Clone)]
pub struct NoteStabilizer {
    debounce_frames: usize,
    accepted: Option<Note>,
    pending: Option<Note>,
    frames_since_change: usize,
}

impl NoteStabilizer {
    pub fn new(debounce_frames: usize) -> Self {
        NoteStabilizer {
            debounce_frames,
            accepted: None,
            pending: None,
            frames_since_change: 0,
        }
    }

    pub fn accepted(&self) -> Option<Note> {
        self.accepted
    }

    /// Feed this tick's note and get the note to report.
    pub fn observe(&mut self, candidate: Note) -> Note {
        let current = match self.accepted {
            Some(current) if current == candidate => {
                self.pending = None;
                self.frames_since_change = 0;
                return current;
            }
            Some(current) => current,
            None => return self.accept(candidate),
        };

        if self.pending != Some(candidate) {
            self.pending = Some(candidate);
            self.frames_since_change = 0;
        }
        self.frames_since_change += 1;

        if self.frames_since_change >= self.debounce_frames {
            self.accept(candidate)
        } else {
            current
        }
    }

    /// Forget the accepted note; called when the input goes silent.
    pub fn reset(&mut self) {
        self.accepted = None;
        self.pending = None;
        self.frames_since_change = 0;
    }

    fn accept(&mut self, note: Note) -> Note {
        debug!("Accepted note {}", note);
        self.accepted = Some(note);
        self.pending = None;
        self.frames_since_change = 0;
        note
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Note = Note::from_midi(69);
    const B: Note = Note::from_midi(71);
    const C: Note = Note::from_midi(72);

    fn run(debounce: usize, notes: &[Note]) -> Vec<Note> {
        let mut stabilizer = NoteStabilizer::new(debounce);
        notes.iter().map(|&n| stabilizer.observe(n)).collect()
    }

    #[test]
    fn single_frame_debounce_follows_input() {
        assert_eq!(run(1, &[A, A, B, A, A, A]), vec![A, A, B, A, A, A]);
        assert_eq!(run(0, &[A, B, A]), vec![A, B, A]);
    }

    #[test]
    fn short_blip_is_suppressed() {
        assert_eq!(run(2, &[A, A, B, A, A, A]), vec![A; 6]);
    }

    #[test]
    fn persistent_change_is_accepted_after_debounce() {
        assert_eq!(run(2, &[A, B, B, A]), vec![A, A, B, B]);
        assert_eq!(run(3, &[A, B, B, B, B]), vec![A, A, A, B, B]);
    }

    #[test]
    fn alternating_candidates_restart_the_count() {
        assert_eq!(run(2, &[A, B, C, B, B]), vec![A, A, A, A, B]);
    }

    #[test]
    fn reset_accepts_next_note_immediately() {
        let mut stabilizer = NoteStabilizer::new(4);
        assert_eq!(stabilizer.observe(A), A);
        assert_eq!(stabilizer.observe(B), A);
        stabilizer.reset();
        assert_eq!(stabilizer.accepted(), None);
        assert_eq!(stabilizer.observe(B), B);
    }
}
