//! Seed sequence construction
//!
//! The seed is an empty, chord-annotated sequence the model continues from.
//! It carries one tempo marker, one 4/4 time-signature marker and one chord
//! marker per progression entry, placed at `index × bar_duration`.

use crate::chords::Progression;
use crate::sequence::{
    ChordMarker, NoteSequence, QuantizationInfo, TempoMarker, TimeSignatureMarker, TEMPO_QPM,
};

/// Build the generation seed for `progression`.
///
/// `steps_per_quarter` is recorded on the seed for the model; no times are
/// snapped here.
///
/// # Example
/// ```rust
/// use chordjam::{build_seed, Progression};
///
/// let seed = build_seed(&Progression::default(), 2.0, 4);
///
/// assert!(seed.notes.is_empty());
/// assert_eq!(seed.total_time, 8.0);
/// assert_eq!(seed.chord_markers[3].time, 6.0);
/// ```
pub fn build_seed(
    progression: &Progression,
    bar_duration: f64,
    steps_per_quarter: u32,
) -> NoteSequence {
    let chord_markers = progression
        .chords()
        .iter()
        .enumerate()
        .map(|(index, chord)| ChordMarker {
            time: index as f64 * bar_duration,
            symbol: chord.symbol.clone(),
        })
        .collect();

    NoteSequence {
        notes: Vec::new(),
        total_time: progression.len() as f64 * bar_duration,
        tempos: vec![TempoMarker {
            time: 0.0,
            qpm: TEMPO_QPM,
        }],
        time_signatures: vec![TimeSignatureMarker::default()],
        chord_markers,
        quantization: Some(QuantizationInfo { steps_per_quarter }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chords::{default_voicings, ChordSymbol};

    #[test]
    fn test_seed_shape() {
        let progression = Progression::default();
        let seed = build_seed(&progression, 2.0, 4);

        assert_eq!(seed.notes.len(), 0);
        assert_eq!(seed.total_time, progression.len() as f64 * 2.0);
        assert_eq!(seed.chord_markers.len(), progression.len());
        assert_eq!(seed.tempos.len(), 1);
        assert_eq!(seed.tempos[0].qpm, 90.0);
        assert_eq!(seed.time_signatures.len(), 1);
        assert_eq!(seed.time_signatures[0].numerator, 4);
        assert_eq!(seed.time_signatures[0].denominator, 4);
        assert_eq!(seed.quantization.unwrap().steps_per_quarter, 4);
    }

    #[test]
    fn test_chord_markers_follow_progression() {
        let seed = build_seed(&Progression::default(), 2.0, 4);

        let times: Vec<f64> = seed.chord_markers.iter().map(|m| m.time).collect();
        assert_eq!(times, vec![0.0, 2.0, 4.0, 6.0]);

        let symbols: Vec<&str> = seed.chord_markers.iter().map(|m| m.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["C", "G", "Am", "F"]);
    }

    #[test]
    fn test_seed_for_custom_progression() {
        let symbols: Vec<ChordSymbol> = ["Dm", "G", "C"].iter().map(|s| ChordSymbol::new(*s)).collect();
        let progression = Progression::new(&symbols, &default_voicings()).unwrap();
        let seed = build_seed(&progression, 1.5, 2);

        assert_eq!(seed.total_time, 4.5);
        assert_eq!(seed.chord_markers.len(), 3);
        assert_eq!(seed.chord_markers[2].time, 3.0);
    }
}
