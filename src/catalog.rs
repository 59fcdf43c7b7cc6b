/*
Note Catalog
============

The fixed table of playable notes: every semitone from middle C (C4) up to
C6, 25 entries in pitch order. Each entry carries the letter name, whether it
is sharpened, the octave and the equal-tempered frequency (A4 = 440 Hz),
rounded to hundredths of a hertz.

  index  0  1   2  3   4  5  6   7  8   9  10  11 12 ... 24
  note   C4 C#4 D4 D#4 E4 F4 F#4 G4 G#4 A4 A#4 B4 C5 ... C6

Only sharps appear; the staff draws a sharp sign next to the natural head
with the same letter, so C#4 sits on the C4 slot.

Example usage:
  let a4 = catalog::find("A4").unwrap();
  engine.play_tone(a4.frequency_hz);
*/

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The seven letter names, in scale order starting from C.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position within C D E F G A B (C = 0, B = 6).
    pub const fn scale_index(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Letter::ALL
            .into_iter()
            .find(|letter| letter.as_char() == c.to_ascii_uppercase())
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Natural,
    Sharp,
}

/// One playable note. Catalog entries are `'static` and never mutated.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteDescriptor {
    pub letter: Letter,
    pub accidental: Accidental,
    pub octave: i32,
    pub frequency_hz: f32,
}

impl NoteDescriptor {
    pub const fn natural(letter: Letter, octave: i32, frequency_hz: f32) -> Self {
        Self {
            letter,
            accidental: Accidental::Natural,
            octave,
            frequency_hz,
        }
    }

    pub const fn sharp(letter: Letter, octave: i32, frequency_hz: f32) -> Self {
        Self {
            letter,
            accidental: Accidental::Sharp,
            octave,
            frequency_hz,
        }
    }

    pub fn is_sharp(&self) -> bool {
        self.accidental == Accidental::Sharp
    }

    /// Black piano key (any sharpened note).
    pub fn is_black_key(&self) -> bool {
        self.is_sharp()
    }
}

impl fmt::Display for NoteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sharp = if self.is_sharp() { "#" } else { "" };
        write!(f, "{}{}{}", self.letter.as_char(), sharp, self.octave)
    }
}

use Letter::*;

/// Every semitone from C4 to C6 inclusive, in ascending pitch order.
pub const NOTES: [NoteDescriptor; 25] = [
    NoteDescriptor::natural(C, 4, 261.63),
    NoteDescriptor::sharp(C, 4, 277.18),
    NoteDescriptor::natural(D, 4, 293.66),
    NoteDescriptor::sharp(D, 4, 311.13),
    NoteDescriptor::natural(E, 4, 329.63),
    NoteDescriptor::natural(F, 4, 349.23),
    NoteDescriptor::sharp(F, 4, 369.99),
    NoteDescriptor::natural(G, 4, 392.00),
    NoteDescriptor::sharp(G, 4, 415.30),
    NoteDescriptor::natural(A, 4, 440.00),
    NoteDescriptor::sharp(A, 4, 466.16),
    NoteDescriptor::natural(B, 4, 493.88),
    NoteDescriptor::natural(C, 5, 523.25),
    NoteDescriptor::sharp(C, 5, 554.37),
    NoteDescriptor::natural(D, 5, 587.33),
    NoteDescriptor::sharp(D, 5, 622.25),
    NoteDescriptor::natural(E, 5, 659.25),
    NoteDescriptor::natural(F, 5, 698.46),
    NoteDescriptor::sharp(F, 5, 739.99),
    NoteDescriptor::natural(G, 5, 783.99),
    NoteDescriptor::sharp(G, 5, 830.61),
    NoteDescriptor::natural(A, 5, 880.00),
    NoteDescriptor::sharp(A, 5, 932.33),
    NoteDescriptor::natural(B, 5, 987.77),
    NoteDescriptor::natural(C, 6, 1046.50),
];

/// Look up a catalog note by name, e.g. `"C4"`, `"F#5"`.
pub fn find(name: &str) -> Option<&'static NoteDescriptor> {
    let mut chars = name.chars();
    let letter = Letter::from_char(chars.next()?)?;
    let rest = chars.as_str();
    let (accidental, octave) = match rest.strip_prefix('#') {
        Some(octave) => (Accidental::Sharp, octave),
        None => (Accidental::Natural, rest),
    };
    let octave: i32 = octave.parse().ok()?;

    NOTES
        .iter()
        .find(|n| n.letter == letter && n.accidental == accidental && n.octave == octave)
}

/// Catalog index of the note sounding at exactly `frequency_hz`.
pub fn index_of_frequency(frequency_hz: f32) -> Option<usize> {
    NOTES
        .iter()
        .position(|n| n.frequency_hz.to_bits() == frequency_hz.to_bits())
}
