//! Note sequence types
//!
//! A [`NoteSequence`] is the melodic timeline exchanged with the generative
//! model: notes plus tempo, meter and chord metadata. All times are seconds.
//!
//! ```text
//! NoteSequence
//!   ├── notes: Vec<NoteEvent>          (pitch, start_time, end_time)
//!   ├── total_time
//!   ├── tempos: Vec<TempoMarker>       (time, qpm)
//!   ├── time_signatures: Vec<TimeSignatureMarker>
//!   ├── chord_markers: Vec<ChordMarker> (time, symbol)
//!   └── quantization: Option<QuantizationInfo>
//! ```

use serde::{Deserialize, Serialize};

use crate::chords::ChordSymbol;
use crate::pitch::Pitch;

/// Fixed tempo of every session, in quarter notes per minute.
pub const TEMPO_QPM: f64 = 90.0;

/// One melodic onset/offset pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEvent {
    pub pitch: Pitch,
    pub start_time: f64,
    pub end_time: f64,
}

impl NoteEvent {
    pub fn new(pitch: Pitch, start_time: f64, end_time: f64) -> Self {
        Self {
            pitch,
            start_time,
            end_time,
        }
    }

    pub fn length(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// True when both times are finite, the start is non-negative and the
    /// note does not end before it starts.
    pub fn is_well_formed(&self) -> bool {
        self.start_time.is_finite()
            && self.end_time.is_finite()
            && self.start_time >= 0.0
            && self.end_time >= self.start_time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoMarker {
    pub time: f64,
    pub qpm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSignatureMarker {
    pub time: f64,
    pub numerator: u8,
    pub denominator: u8,
}

impl Default for TimeSignatureMarker {
    fn default() -> Self {
        Self {
            time: 0.0,
            numerator: 4,
            denominator: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordMarker {
    pub time: f64,
    pub symbol: ChordSymbol,
}

/// Grid resolution handed to the model; the model does the snapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantizationInfo {
    pub steps_per_quarter: u32,
}

impl QuantizationInfo {
    /// Length of one grid step in seconds at `qpm`.
    pub fn step_seconds(&self, qpm: f64) -> f64 {
        60.0 / qpm / self.steps_per_quarter as f64
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSequence {
    pub notes: Vec<NoteEvent>,
    pub total_time: f64,
    pub tempos: Vec<TempoMarker>,
    pub time_signatures: Vec<TimeSignatureMarker>,
    pub chord_markers: Vec<ChordMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization: Option<QuantizationInfo>,
}

impl NoteSequence {
    /// Latest `end_time` over all notes, or 0 for an empty sequence.
    pub fn max_end_time(&self) -> f64 {
        self.notes
            .iter()
            .map(|note| note.end_time)
            .fold(0.0, f64::max)
    }

    /// Tempo of the first marker, or the session tempo.
    pub fn qpm(&self) -> f64 {
        self.tempos.first().map_or(TEMPO_QPM, |tempo| tempo.qpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(start: f64, end: f64) -> NoteEvent {
        NoteEvent::new(Pitch::from_midi(60).unwrap(), start, end)
    }

    #[test]
    fn test_well_formed_notes() {
        assert!(note(0.0, 0.5).is_well_formed());
        assert!(note(1.0, 1.0).is_well_formed()); // zero-length is allowed
        assert!(!note(-0.1, 0.5).is_well_formed());
        assert!(!note(1.0, 0.5).is_well_formed());
        assert!(!note(f64::NAN, 0.5).is_well_formed());
        assert!(!note(0.0, f64::INFINITY).is_well_formed());
    }

    #[test]
    fn test_max_end_time() {
        let mut sequence = NoteSequence::default();
        assert_eq!(sequence.max_end_time(), 0.0);

        sequence.notes = vec![note(0.0, 0.5), note(2.0, 3.25), note(1.0, 1.5)];
        assert_eq!(sequence.max_end_time(), 3.25);
    }

    #[test]
    fn test_step_seconds() {
        let quantization = QuantizationInfo { steps_per_quarter: 4 };
        // 90 qpm: quarter = 2/3 s, sixteenth = 1/6 s
        assert!((quantization.step_seconds(90.0) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_serializes_camel_case() {
        let sequence = NoteSequence {
            notes: vec![note(0.0, 0.5)],
            total_time: 1.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&sequence).unwrap();
        assert!(json.contains("\"startTime\":0.0"));
        assert!(json.contains("\"totalTime\":1.0"));
        assert!(json.contains("\"pitch\":60"));
        assert!(!json.contains("quantization"));
    }
}
