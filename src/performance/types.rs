//! Performance type definitions
//!
//! This module defines the scheduler's output: per-voice timelines of
//! absolute-time trigger events, bundled into a [`PerformanceSpec`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pitch::Pitch;

/// One instrument voice of the arrangement.
///
/// The drum kit is split into three voices so each can be triggered on its
/// own cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    /// Generated melody
    Lead,
    /// Chord pad, one full triad per bar
    Pad,
    /// Chord root, one per bar
    Bass,
    Kick,
    Snare,
    HiHat,
}

/// Synthesis character a voice expects from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Instrument {
    /// Polyphonic subtractive synth
    PolySynth,
    /// Monophonic square-wave synth
    SquareMono,
    /// Pitched membrane (kick drum)
    Membrane,
    /// Short noise burst, 0.05 s sustain
    Noise,
    /// Metallic tone, 0.05 s decay
    Metal,
}

impl Voice {
    /// Every voice, in submission order.
    pub const ALL: [Voice; 6] = [
        Voice::Lead,
        Voice::Pad,
        Voice::Bass,
        Voice::Kick,
        Voice::Snare,
        Voice::HiHat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Voice::Lead => "lead",
            Voice::Pad => "pad",
            Voice::Bass => "bass",
            Voice::Kick => "kick",
            Voice::Snare => "snare",
            Voice::HiHat => "hihat",
        }
    }

    pub fn instrument(self) -> Instrument {
        match self {
            Voice::Lead | Voice::Pad => Instrument::PolySynth,
            Voice::Bass => Instrument::SquareMono,
            Voice::Kick => Instrument::Membrane,
            Voice::Snare => Instrument::Noise,
            Voice::HiHat => Instrument::Metal,
        }
    }

    /// Melodic voices share the delay and reverb send; drums are dry.
    pub fn through_effects(self) -> bool {
        matches!(self, Voice::Lead | Voice::Pad | Voice::Bass)
    }

    /// Snare and hi-hat triggers carry no pitch.
    pub fn is_pitched(self) -> bool {
        !matches!(self, Voice::Snare | Voice::HiHat)
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Length of a trigger: either absolute seconds or a symbolic note value
/// resolved against the tempo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoteLength {
    Seconds(f64),
    /// "2n"
    Half,
    /// "8n"
    Eighth,
    /// "16n"
    Sixteenth,
}

impl NoteLength {
    /// Length in seconds at `qpm` quarter notes per minute.
    ///
    /// # Example
    /// ```
    /// use chordjam::NoteLength;
    ///
    /// assert_eq!(NoteLength::Half.seconds(120.0), 1.0);
    /// assert_eq!(NoteLength::Eighth.seconds(120.0), 0.25);
    /// assert_eq!(NoteLength::Seconds(0.05).seconds(120.0), 0.05);
    /// ```
    pub fn seconds(self, qpm: f64) -> f64 {
        let quarter = 60.0 / qpm;
        match self {
            NoteLength::Seconds(seconds) => seconds,
            NoteLength::Half => quarter * 2.0,
            NoteLength::Eighth => quarter / 2.0,
            NoteLength::Sixteenth => quarter / 4.0,
        }
    }
}

impl fmt::Display for NoteLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteLength::Seconds(seconds) => write!(f, "{}", seconds),
            NoteLength::Half => f.write_str("2n"),
            NoteLength::Eighth => f.write_str("8n"),
            NoteLength::Sixteenth => f.write_str("16n"),
        }
    }
}

/// A single timed note trigger for the synthesis engine.
///
/// # Fields
/// - `at_time`: Absolute time on the engine's clock (performance start + offset)
/// - `pitches`: One pitch for lead/bass/kick, a full triad for the pad, none for snare and hi-hat
/// - `duration`: How long the note sounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerEvent {
    pub at_time: f64,
    pub pitches: Vec<Pitch>,
    pub duration: NoteLength,
}

impl TriggerEvent {
    /// Absolute time at which the note stops sounding.
    pub fn end_time(&self, qpm: f64) -> f64 {
        self.at_time + self.duration.seconds(qpm)
    }
}

/// Ordered triggers of one voice. Never mutated after emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceTimeline {
    pub voice: Voice,
    pub events: Vec<TriggerEvent>,
}

/// A complete multi-voice performance.
///
/// # Fields
/// - `start`: The performance start instant every trigger is offset from
/// - `qpm`: Tempo used to resolve symbolic lengths
/// - `voices`: One timeline per [`Voice`], in [`Voice::ALL`] order
/// - `total_duration`: Seconds after `start` at which playback is complete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSpec {
    pub start: f64,
    pub qpm: f64,
    pub voices: Vec<VoiceTimeline>,
    pub total_duration: f64,
}

impl PerformanceSpec {
    pub fn timeline(&self, voice: Voice) -> Option<&VoiceTimeline> {
        self.voices.iter().find(|timeline| timeline.voice == voice)
    }

    /// Triggers of `voice`, empty if the voice is absent.
    pub fn events(&self, voice: Voice) -> &[TriggerEvent] {
        self.timeline(voice)
            .map_or(&[][..], |timeline| timeline.events.as_slice())
    }

    pub fn trigger_count(&self) -> usize {
        self.voices.iter().map(|timeline| timeline.events.len()).sum()
    }

    /// Absolute time at which the completion signal is due.
    pub fn end_time(&self) -> f64 {
        self.start + self.total_duration
    }

    /// Latest `at_time + duration` over all voices.
    pub fn last_release(&self) -> f64 {
        self.voices
            .iter()
            .flat_map(|timeline| timeline.events.iter())
            .map(|event| event.end_time(self.qpm))
            .fold(self.start, f64::max)
    }
}
