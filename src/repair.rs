//! Sequence repair
//!
//! Turns a raw model continuation into a strictly increasing note timeline.
//!
//! Notes are stable-sorted by `start_time`, then a single pass keeps a note
//! only when its onset is strictly later than the previously *kept* onset.
//! Notes sharing an onset are dropped, not merged: same-onset polyphony in
//! the lead line is lost. That loss is accepted behaviour.
//!
//! The repaired sequence also ends [`TRAILING_SILENCE`] seconds after the
//! generated material so the performance has a short tail.

use crate::sequence::{NoteEvent, NoteSequence};

/// Seconds appended to `total_time` after generation.
pub const TRAILING_SILENCE: f64 = 1.0;

/// Sort notes by onset and drop every note that does not start strictly
/// after the previously kept one. Notes without a finite onset are dropped.
/// Idempotent.
///
/// # Example
/// ```rust
/// use chordjam::{normalize_notes, NoteEvent, Pitch};
///
/// let p = |m| Pitch::from_midi(m).unwrap();
/// let notes = vec![
///     NoteEvent::new(p(64), 1.0, 1.5),
///     NoteEvent::new(p(60), 0.0, 0.5),
///     NoteEvent::new(p(67), 1.0, 2.0), // same onset as E4, dropped
/// ];
///
/// let kept = normalize_notes(notes);
/// assert_eq!(kept.len(), 2);
/// assert_eq!(kept[0].pitch.midi(), 60);
/// assert_eq!(kept[1].pitch.midi(), 64);
/// ```
pub fn normalize_notes(mut notes: Vec<NoteEvent>) -> Vec<NoteEvent> {
    // sort_by is stable, so the first of equal onsets stays first
    notes.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let mut kept: Vec<NoteEvent> = Vec::with_capacity(notes.len());
    for note in notes {
        if !note.start_time.is_finite() {
            continue;
        }
        match kept.last() {
            Some(previous) if note.start_time <= previous.start_time => {}
            _ => kept.push(note),
        }
    }
    kept
}

/// Repair a raw generated sequence.
///
/// The result has strictly increasing onsets and a `total_time` of at least
/// `input.total_time + TRAILING_SILENCE`. If the notes overrun the declared
/// length, the silence is added after the last note ends instead.
pub fn repair_sequence(sequence: NoteSequence) -> NoteSequence {
    let generated_length = sequence.total_time.max(sequence.max_end_time());
    let notes = normalize_notes(sequence.notes);

    NoteSequence {
        notes,
        total_time: generated_length + TRAILING_SILENCE,
        ..sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::Pitch;

    fn note(midi: u8, start: f64, end: f64) -> NoteEvent {
        NoteEvent::new(Pitch::from_midi(midi).unwrap(), start, end)
    }

    fn raw(notes: Vec<NoteEvent>, total_time: f64) -> NoteSequence {
        NoteSequence {
            notes,
            total_time,
            ..Default::default()
        }
    }

    #[test]
    fn test_sorts_by_onset() {
        let repaired = repair_sequence(raw(
            vec![note(67, 2.0, 2.5), note(60, 0.0, 0.5), note(64, 1.0, 1.5)],
            3.0,
        ));
        let onsets: Vec<f64> = repaired.notes.iter().map(|n| n.start_time).collect();
        assert_eq!(onsets, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_same_onset_keeps_first_occurrence() {
        let repaired = repair_sequence(raw(
            vec![note(60, 0.5, 1.0), note(64, 0.5, 1.0), note(67, 0.5, 0.75)],
            1.0,
        ));
        assert_eq!(repaired.notes.len(), 1);
        assert_eq!(repaired.notes[0].pitch.midi(), 60);
    }

    #[test]
    fn test_strictly_increasing_after_repair() {
        let repaired = repair_sequence(raw(
            vec![
                note(60, 3.0, 3.0),
                note(62, 1.0, 1.25),
                note(64, 1.0, 2.0),
                note(65, 0.0, 0.0),
                note(67, 3.0, 3.5),
                note(69, 2.5, 2.75),
            ],
            4.0,
        ));
        assert_eq!(repaired.notes.len(), 4);
        for pair in repaired.notes.windows(2) {
            assert!(pair[0].start_time < pair[1].start_time);
        }
        // zero-length notes survive repair; the scheduler floors them
        assert_eq!(repaired.notes[0].length(), 0.0);
    }

    #[test]
    fn test_non_finite_onsets_are_dropped() {
        let notes = vec![
            note(60, 1.0, 1.5),
            note(62, f64::NAN, 1.0),
            note(64, 0.0, 0.5),
            note(65, -f64::NAN, 0.5),
            note(67, f64::INFINITY, 2.0),
            note(69, 2.0, 2.5),
        ];
        let kept = normalize_notes(notes);
        let onsets: Vec<f64> = kept.iter().map(|n| n.start_time).collect();
        assert_eq!(onsets, vec![0.0, 1.0, 2.0]);
        assert_eq!(normalize_notes(kept.clone()), kept);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let notes = vec![
            note(60, 2.0, 2.5),
            note(62, 0.0, 0.5),
            note(64, 2.0, 3.0),
            note(65, 1.0, 1.0),
        ];
        let once = normalize_notes(notes);
        let twice = normalize_notes(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_repairing_twice_keeps_notes() {
        let once = repair_sequence(raw(vec![note(60, 1.0, 1.5), note(62, 1.0, 2.0)], 2.0));
        let twice = repair_sequence(once.clone());
        assert_eq!(once.notes, twice.notes);
        assert_eq!(once.chord_markers, twice.chord_markers);
    }

    #[test]
    fn test_trailing_silence_floor() {
        let repaired = repair_sequence(raw(vec![note(60, 0.0, 1.0)], 10.0 + 2.0 / 3.0));
        assert!(repaired.total_time >= 10.0 + 2.0 / 3.0 + TRAILING_SILENCE);
        assert!((repaired.total_time - (11.0 + 2.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_silence_after_overrunning_notes() {
        let repaired = repair_sequence(raw(vec![note(60, 3.0, 5.0)], 4.0));
        assert_eq!(repaired.total_time, 6.0);
    }

    #[test]
    fn test_empty_sequence() {
        let repaired = repair_sequence(raw(Vec::new(), 0.0));
        assert!(repaired.notes.is_empty());
        assert_eq!(repaired.total_time, TRAILING_SILENCE);
    }
}
