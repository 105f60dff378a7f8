//! Equal-tempered note names.
//!
//! A frequency `f` maps to the MIDI note `round(69 + 12·log2(f / reference))`,
//! where `reference` is the frequency of A4 (normally 440 Hz). The octave
//! number follows scientific pitch notation: MIDI 60 is C4, MIDI 40 is E2
//! (the low string of a guitar in standard tuning).

use std::fmt;

use crate::float::Float;

/// The text reported when no pitch is detected.
pub const NO_NOTE: &str = "none";

const MIDI_A4: i32 = 69;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

const PITCH_CLASSES: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::CSharp,
    PitchClass::D,
    PitchClass::DSharp,
    PitchClass::E,
    PitchClass::F,
    PitchClass::FSharp,
    PitchClass::G,
    PitchClass::GSharp,
    PitchClass::A,
    PitchClass::ASharp,
    PitchClass::B,
];

const NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const SOLFEGE: [&str; 12] = [
    "Do", "Do#", "Ré", "Ré#", "Mi", "Fa", "Fa#", "Sol", "Sol#", "La", "La#", "Si",
];

impl PitchClass {
    /// Pitch class of a semitone index, wrapping modulo 12.
    pub fn from_index(index: usize) -> Self {
        PITCH_CLASSES[index % 12]
    }

    /// Semitones above C.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        NAMES[self.index()]
    }

    pub fn solfege(self) -> &'static str {
        SOLFEGE[self.index()]
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A note of the chromatic scale, identified by its MIDI number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    midi: i32,
}

impl Note {
    pub const fn from_midi(midi: i32) -> Self {
        Note { midi }
    }

    /// Nearest note to `frequency`. `None` for zero, negative or non-finite input.
    pub fn from_frequency<T: Float>(frequency: T, reference: T) -> Option<Self> {
        if !(frequency > T::zero() && reference > T::zero()) {
            return None;
        }
        let semitones = T::constant(12.0) * (frequency / reference).log2();
        let midi = (semitones + T::from_index(MIDI_A4 as usize)).round();
        if !midi.is_finite() {
            return None;
        }
        midi.to_i32().map(Note::from_midi)
    }

    pub fn midi(self) -> i32 {
        self.midi
    }

    pub fn pitch_class(self) -> PitchClass {
        PitchClass::from_index(self.midi.rem_euclid(12) as usize)
    }

    pub fn octave(self) -> i32 {
        self.midi.div_euclid(12) - 1
    }

    /// Equal-tempered frequency of this note.
    pub fn frequency<T: Float>(self, reference: T) -> T {
        let semitones = T::constant(f64::from(self.midi - MIDI_A4));
        reference * T::constant(2.0).powf(semitones / T::constant(12.0))
    }

    /// Distance from this note to `frequency` in cents; positive when sharp.
    pub fn cents_offset<T: Float>(self, frequency: T, reference: T) -> T {
        T::constant(1200.0) * (frequency / self.frequency(reference)).log2()
    }

    /// Name in fixed-do solfège, e.g. `"Mi2"`.
    pub fn solfege(self) -> String {
        format!("{}{}", self.pitch_class().solfege(), self.octave())
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class(), self.octave())
    }
}
