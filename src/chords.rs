//! Chord symbols, triad voicings and the fixed chord progression
//!
//! The progression conditions the generative model and drives the pad and
//! bass voices. Every symbol is resolved to a three-note voicing (root, third,
//! fifth) when the [`Progression`] is built, so lookups while scheduling can
//! never fail.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::JamError;
use crate::pitch::Pitch;

/// A named harmonic label such as `C`, `Am` or `F#dim`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChordSymbol(String);

impl ChordSymbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChordSymbol {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

/// A chord symbol with its resolved voicing, lowest voice first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub symbol: ChordSymbol,
    pub pitches: [Pitch; 3],
}

impl Chord {
    pub fn root(&self) -> Pitch {
        self.pitches[0]
    }
}

/// The explicit voicings of the default progression.
pub const DEFAULT_VOICINGS: [(&str, [&str; 3]); 4] = [
    ("C", ["C4", "E4", "G4"]),
    ("G", ["G3", "B3", "D4"]),
    ("Am", ["A3", "C4", "E4"]),
    ("F", ["F3", "A3", "C4"]),
];

pub const DEFAULT_PROGRESSION: [&str; 4] = ["C", "G", "Am", "F"];

/// Parse a chord symbol into a root-position triad in octave 4.
///
/// Only triad qualities are supported since every voice in the arrangement
/// plays at most root, third and fifth.
///
/// # Supported Qualities
/// - **Major**: `C`, `maj`, `M` → root, major 3rd, perfect 5th
/// - **Minor**: `m`, `min`, `-` → root, minor 3rd, perfect 5th
/// - **Diminished**: `dim`, `°` → root, minor 3rd, diminished 5th
/// - **Augmented**: `aug`, `+` → root, major 3rd, augmented 5th
/// - **Sus4** / **Sus2**: `sus4`, `sus2`
///
/// # Examples
/// ```
/// use chordjam::chords::triad_for_symbol;
///
/// let midi = |s| triad_for_symbol(s).unwrap().map(|p| p.midi());
///
/// assert_eq!(midi("C"), [60, 64, 67]);
/// assert_eq!(midi("Dm"), [62, 65, 69]);
/// assert_eq!(midi("F#"), [66, 70, 73]);
/// assert!(triad_for_symbol("H7").is_none());
/// ```
pub fn triad_for_symbol(symbol: &str) -> Option<[Pitch; 3]> {
    let mut chars = symbol.chars();
    let base_midi: i16 = match chars.next()? {
        'C' => 60,
        'D' => 62,
        'E' => 64,
        'F' => 65,
        'G' => 67,
        'A' => 69,
        'B' => 71,
        _ => return None,
    };

    let rest = chars.as_str();
    let (accidental, quality) = match rest.chars().next() {
        Some('#') => (1, &rest[1..]),
        Some('b') => (-1, &rest[1..]),
        _ => (0, rest),
    };

    let (third, fifth) = match quality {
        "" | "maj" | "M" => (4, 7),
        "m" | "min" | "-" => (3, 7),
        "dim" | "°" => (3, 6),
        "aug" | "+" => (4, 8),
        "sus4" => (5, 7),
        "sus2" => (2, 7),
        _ => return None,
    };

    let root = Pitch::from_midi((base_midi + accidental) as u8)?;
    Some([root, root.transposed(third)?, root.transposed(fifth)?])
}

/// Parse three pitch names into a voicing.
pub fn parse_voicing(names: &[String]) -> Result<[Pitch; 3], JamError> {
    match names {
        [root, third, fifth] => Ok([
            Pitch::parse(root)?,
            Pitch::parse(third)?,
            Pitch::parse(fifth)?,
        ]),
        _ => Err(JamError::Config(format!(
            "a voicing needs exactly 3 pitches (root, third, fifth), got {}",
            names.len()
        ))),
    }
}

/// The built-in voicing table.
pub fn default_voicings() -> HashMap<ChordSymbol, [Pitch; 3]> {
    DEFAULT_VOICINGS
        .iter()
        .map(|&(symbol, names)| {
            let pitches = names.map(|name| {
                Pitch::parse(name).unwrap_or_else(|_| unreachable!("built-in voicing {}", name))
            });
            (ChordSymbol::new(symbol), pitches)
        })
        .collect()
}

/// A fixed, non-empty, fully voiced chord progression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progression {
    chords: Vec<Chord>,
}

impl Progression {
    /// Resolve every symbol against `voicings`, falling back to a parsed
    /// triad when the table has no entry for it.
    pub fn new(
        symbols: &[ChordSymbol],
        voicings: &HashMap<ChordSymbol, [Pitch; 3]>,
    ) -> Result<Self, JamError> {
        if symbols.is_empty() {
            return Err(JamError::Config("progression must contain at least one chord".to_string()));
        }

        let chords = symbols
            .iter()
            .map(|symbol| {
                let pitches = voicings
                    .get(symbol)
                    .copied()
                    .or_else(|| triad_for_symbol(symbol.as_str()))
                    .ok_or_else(|| {
                        JamError::Config(format!("no voicing for chord symbol '{}'", symbol))
                    })?;
                Ok(Chord {
                    symbol: symbol.clone(),
                    pitches,
                })
            })
            .collect::<Result<Vec<_>, JamError>>()?;

        Ok(Self { chords })
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    /// Always false for a constructed progression.
    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// The chord for bar `index`, wrapping around the progression.
    pub fn chord_at(&self, index: usize) -> &Chord {
        &self.chords[index % self.chords.len()]
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    pub fn symbols(&self) -> Vec<ChordSymbol> {
        self.chords.iter().map(|chord| chord.symbol.clone()).collect()
    }
}

impl Default for Progression {
    fn default() -> Self {
        let voicings = default_voicings();
        let chords = DEFAULT_PROGRESSION
            .iter()
            .map(|symbol| {
                let symbol = ChordSymbol::new(*symbol);
                let pitches = voicings[&symbol];
                Chord { symbol, pitches }
            })
            .collect();
        Self { chords }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(chord: &Chord) -> Vec<String> {
        chord.pitches.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_default_progression_voicings() {
        let progression = Progression::default();
        assert_eq!(progression.len(), 4);
        assert_eq!(names(progression.chord_at(0)), vec!["C4", "E4", "G4"]);
        assert_eq!(names(progression.chord_at(1)), vec!["G3", "B3", "D4"]);
        assert_eq!(names(progression.chord_at(2)), vec!["A3", "C4", "E4"]);
        assert_eq!(names(progression.chord_at(3)), vec!["F3", "A3", "C4"]);
    }

    #[test]
    fn test_chord_at_wraps() {
        let progression = Progression::default();
        assert_eq!(progression.chord_at(4).symbol.as_str(), "C");
        assert_eq!(progression.chord_at(7).symbol.as_str(), "F");
        assert_eq!(progression.chord_at(15).symbol.as_str(), "F");
    }

    #[test]
    fn test_triad_qualities() {
        let midi = |s: &str| triad_for_symbol(s).unwrap().map(|p| p.midi());
        assert_eq!(midi("Bbm"), [70, 73, 77]);
        assert_eq!(midi("Bdim"), [71, 74, 77]);
        assert_eq!(midi("Caug"), [60, 64, 68]);
        assert_eq!(midi("Dsus4"), [62, 67, 69]);
        assert_eq!(midi("Dsus2"), [62, 64, 69]);
        assert!(triad_for_symbol("G7").is_none());
        assert!(triad_for_symbol("").is_none());
    }

    #[test]
    fn test_progression_falls_back_to_parsed_triads() {
        let symbols = vec![ChordSymbol::new("Am"), ChordSymbol::new("Dm")];
        let progression = Progression::new(&symbols, &default_voicings()).unwrap();

        // Am comes from the table, Dm is parsed
        assert_eq!(names(progression.chord_at(0)), vec!["A3", "C4", "E4"]);
        assert_eq!(names(progression.chord_at(1)), vec!["D4", "F4", "A4"]);
    }

    #[test]
    fn test_progression_rejects_unknown_and_empty() {
        let unknown = vec![ChordSymbol::new("C"), ChordSymbol::new("Xyz")];
        assert!(matches!(
            Progression::new(&unknown, &default_voicings()),
            Err(JamError::Config(_))
        ));
        assert!(Progression::new(&[], &default_voicings()).is_err());
    }

    #[test]
    fn test_parse_voicing_length() {
        let ok = vec!["C4".to_string(), "E4".to_string(), "G4".to_string()];
        assert_eq!(parse_voicing(&ok).unwrap()[0].midi(), 60);

        let short = vec!["C4".to_string(), "E4".to_string()];
        assert!(matches!(parse_voicing(&short), Err(JamError::Config(_))));
    }
}
