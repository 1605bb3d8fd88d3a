//! Pitch names and MIDI note numbers
//!
//! Chord voicings are written as scientific pitch names ("C4", "G3", "Bb2"),
//! while generated melody notes arrive as MIDI numbers. [`Pitch`] bridges both.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JamError;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A single pitch, stored as a MIDI note number (C4 = 60).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pitch(u8);

impl Pitch {
    /// C2, struck by the kick drum.
    pub const C2: Pitch = Pitch(36);

    /// Create a pitch from a MIDI note number (0-127).
    pub fn from_midi(midi: u8) -> Option<Self> {
        (midi <= 127).then_some(Self(midi))
    }

    pub fn midi(self) -> u8 {
        self.0
    }

    /// Octave in scientific pitch notation (C4 = middle C).
    pub fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }

    /// Pitch class (0-11): C=0, C#=1, D=2, etc.
    pub fn pitch_class(self) -> u8 {
        self.0 % 12
    }

    /// Parse a pitch name like `C4`, `F#3` or `Bb2`.
    ///
    /// # Examples
    /// ```
    /// use chordjam::Pitch;
    ///
    /// assert_eq!(Pitch::parse("C4").unwrap().midi(), 60);
    /// assert_eq!(Pitch::parse("A3").unwrap().midi(), 57);
    /// assert_eq!(Pitch::parse("Bb2").unwrap().midi(), 46);
    /// assert!(Pitch::parse("H4").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self, JamError> {
        let invalid = || JamError::Pitch(name.to_string());
        let trimmed = name.trim();
        let mut chars = trimmed.chars();

        let letter = chars.next().ok_or_else(invalid)?;
        let base: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };

        let rest = chars.as_str();
        let (accidental, octave_str) = match rest.chars().next() {
            Some('#') => (1, &rest[1..]),
            Some('b') => (-1, &rest[1..]),
            _ => (0, rest),
        };

        let octave: i32 = octave_str.parse().map_err(|_| invalid())?;
        if !(-1..=9).contains(&octave) {
            return Err(invalid());
        }
        let midi = (octave + 1) * 12 + base + accidental;
        if !(0..=127).contains(&midi) {
            return Err(invalid());
        }
        Ok(Self(midi as u8))
    }

    /// Transpose by a number of semitones, if the result stays in MIDI range.
    pub fn transposed(self, semitones: i8) -> Option<Self> {
        let midi = self.0 as i16 + semitones as i16;
        u8::try_from(midi).ok().and_then(Self::from_midi)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            NOTE_NAMES[self.pitch_class() as usize],
            self.octave()
        )
    }
}

impl FromStr for Pitch {
    type Err = JamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pitch_names() {
        assert_eq!(Pitch::parse("C4").unwrap().midi(), 60);
        assert_eq!(Pitch::parse("E4").unwrap().midi(), 64);
        assert_eq!(Pitch::parse("G3").unwrap().midi(), 55);
        assert_eq!(Pitch::parse("F#3").unwrap().midi(), 54);
        assert_eq!(Pitch::parse("C2").unwrap().midi(), 36);
        assert_eq!(Pitch::parse("C-1").unwrap().midi(), 0);
    }

    #[test]
    fn test_invalid_pitch_names() {
        assert!(Pitch::parse("").is_err());
        assert!(Pitch::parse("X4").is_err());
        assert!(Pitch::parse("C").is_err());
        assert!(Pitch::parse("G#9").is_err()); // MIDI 128
        assert_eq!(Pitch::parse("G9").unwrap().midi(), 127);
    }

    #[test]
    fn test_out_of_range_octaves_are_rejected() {
        assert!(Pitch::parse("C10").is_err());
        assert!(Pitch::parse("C-2").is_err());
        assert!(Pitch::parse("C2000000000").is_err());
        assert!(Pitch::parse("Bb-2000000000").is_err());
        assert_eq!(
            Pitch::parse("C2000000000"),
            Err(JamError::Pitch("C2000000000".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_sharps() {
        let pitch = Pitch::parse("Bb3").unwrap();
        assert_eq!(pitch.to_string(), "A#3");
        assert_eq!(Pitch::from_midi(69).unwrap().to_string(), "A4");
    }

    #[test]
    fn test_transposed_stays_in_range() {
        let c4 = Pitch::parse("C4").unwrap();
        assert_eq!(c4.transposed(7).unwrap().midi(), 67);
        assert!(Pitch::from_midi(125).unwrap().transposed(5).is_none());
        assert!(Pitch::from_midi(2).unwrap().transposed(-5).is_none());
    }
}
