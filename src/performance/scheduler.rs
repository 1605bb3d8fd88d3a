//! Performance scheduling
//!
//! Lays out the lead, pad, bass and drum voices on a single time origin.
//! Harmony follows the bar grid (one chord per bar, cycling the progression)
//! while the drums follow a finer step grid of their own. Both grids start at
//! the same `performance_start`, and neither depends on how long the
//! generated melody is.

use crate::chords::Progression;
use crate::pitch::Pitch;
use crate::sequence::NoteSequence;

use super::types::{NoteLength, PerformanceSpec, TriggerEvent, Voice, VoiceTimeline};

/// Fixed timing constants of the arrangement.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    /// Seconds per bar (one chord per bar)
    pub bar_duration: f64,
    /// Number of bars the pad and bass play
    pub bar_count: usize,
    pub pad_length: NoteLength,
    pub bass_length: NoteLength,
    /// Number of drum steps
    pub drum_steps: usize,
    /// Seconds per drum step
    pub step_duration: f64,
    /// Delay of every hi-hat hit after its step
    pub hat_offset: f64,
    pub kick_pitch: Pitch,
    pub kick_length: NoteLength,
    pub snare_length: NoteLength,
    pub hat_length: NoteLength,
    /// Floor for lead note lengths
    pub min_audible: f64,
}

impl Default for Arrangement {
    fn default() -> Self {
        Self {
            bar_duration: 2.0,
            bar_count: 16,
            pad_length: NoteLength::Half,
            bass_length: NoteLength::Eighth,
            drum_steps: 64,
            step_duration: 0.5,
            hat_offset: 0.125,
            kick_pitch: Pitch::C2,
            kick_length: NoteLength::Eighth,
            snare_length: NoteLength::Sixteenth,
            hat_length: NoteLength::Sixteenth,
            min_audible: 0.05,
        }
    }
}

/// Build the full performance for `sequence`.
///
/// `performance_start` is the only notion of "now": every trigger is that
/// instant plus a deterministic offset, so the same inputs always produce the
/// same performance.
///
/// # Example
/// ```rust
/// use chordjam::{schedule_performance, Arrangement, NoteSequence, Progression, Voice};
///
/// let spec = schedule_performance(
///     &NoteSequence::default(),
///     &Progression::default(),
///     &Arrangement::default(),
///     10.0,
/// );
///
/// assert_eq!(spec.events(Voice::Pad).len(), 16);
/// assert_eq!(spec.events(Voice::Pad)[1].at_time, 12.0);
/// assert_eq!(spec.events(Voice::HiHat).len(), 64);
/// ```
pub fn schedule_performance(
    sequence: &NoteSequence,
    progression: &Progression,
    arrangement: &Arrangement,
    performance_start: f64,
) -> PerformanceSpec {
    let qpm = sequence.qpm();
    let (kick, snare, hat) = drum_timelines(arrangement, performance_start);

    let mut spec = PerformanceSpec {
        start: performance_start,
        qpm,
        voices: vec![
            lead_timeline(sequence, arrangement, performance_start),
            pad_timeline(progression, arrangement, performance_start),
            bass_timeline(progression, arrangement, performance_start),
            kick,
            snare,
            hat,
        ],
        total_duration: 0.0,
    };

    let release = spec.last_release() - performance_start;
    spec.total_duration = sequence.total_time.max(release);
    spec
}

fn lead_timeline(
    sequence: &NoteSequence,
    arrangement: &Arrangement,
    performance_start: f64,
) -> VoiceTimeline {
    let events = sequence
        .notes
        .iter()
        .map(|note| TriggerEvent {
            at_time: performance_start + note.start_time,
            pitches: vec![note.pitch],
            duration: NoteLength::Seconds(note.length().max(arrangement.min_audible)),
        })
        .collect();

    VoiceTimeline {
        voice: Voice::Lead,
        events,
    }
}

fn bar_time(arrangement: &Arrangement, performance_start: f64, bar: usize) -> f64 {
    performance_start + bar as f64 * arrangement.bar_duration
}

fn pad_timeline(
    progression: &Progression,
    arrangement: &Arrangement,
    performance_start: f64,
) -> VoiceTimeline {
    let events = (0..arrangement.bar_count)
        .map(|bar| TriggerEvent {
            at_time: bar_time(arrangement, performance_start, bar),
            pitches: progression.chord_at(bar).pitches.to_vec(),
            duration: arrangement.pad_length,
        })
        .collect();

    VoiceTimeline {
        voice: Voice::Pad,
        events,
    }
}

fn bass_timeline(
    progression: &Progression,
    arrangement: &Arrangement,
    performance_start: f64,
) -> VoiceTimeline {
    let events = (0..arrangement.bar_count)
        .map(|bar| TriggerEvent {
            at_time: bar_time(arrangement, performance_start, bar),
            pitches: vec![progression.chord_at(bar).root()],
            duration: arrangement.bass_length,
        })
        .collect();

    VoiceTimeline {
        voice: Voice::Bass,
        events,
    }
}

/// Kick on every fourth step, snare two steps later, hi-hat on every step
/// just behind the beat.
fn drum_timelines(
    arrangement: &Arrangement,
    performance_start: f64,
) -> (VoiceTimeline, VoiceTimeline, VoiceTimeline) {
    let mut kick = Vec::new();
    let mut snare = Vec::new();
    let mut hat = Vec::with_capacity(arrangement.drum_steps);

    for step in 0..arrangement.drum_steps {
        let time = performance_start + step as f64 * arrangement.step_duration;

        match step % 4 {
            0 => kick.push(TriggerEvent {
                at_time: time,
                pitches: vec![arrangement.kick_pitch],
                duration: arrangement.kick_length,
            }),
            2 => snare.push(TriggerEvent {
                at_time: time,
                pitches: Vec::new(),
                duration: arrangement.snare_length,
            }),
            _ => {}
        }

        hat.push(TriggerEvent {
            at_time: time + arrangement.hat_offset,
            pitches: Vec::new(),
            duration: arrangement.hat_length,
        });
    }

    (
        VoiceTimeline {
            voice: Voice::Kick,
            events: kick,
        },
        VoiceTimeline {
            voice: Voice::Snare,
            events: snare,
        },
        VoiceTimeline {
            voice: Voice::HiHat,
            events: hat,
        },
    )
}
