//! External collaborators of a session
//!
//! The generative model, the synthesis engine and the visualizer live outside
//! this crate. The session only talks to them through these traits, which
//! keeps it testable with in-memory fakes.

use serde::{Deserialize, Serialize};

use crate::chords::ChordSymbol;
use crate::error::JamError;
use crate::performance::{TriggerEvent, Voice};
use crate::sequence::NoteSequence;

/// A generative sequence model that can continue a seed.
pub trait SequenceModel {
    /// Load weights or other assets. Called at most once per successful load.
    ///
    /// Fails with [`JamError::ModelLoad`].
    fn initialize(&mut self) -> Result<(), JamError>;

    /// Continue `seed` for `steps` quantized steps, conditioned on `chords`.
    ///
    /// Fails with [`JamError::Generation`].
    fn continue_sequence(
        &mut self,
        seed: &NoteSequence,
        steps: u32,
        temperature: f64,
        chords: &[ChordSymbol],
    ) -> Result<NoteSequence, JamError>;
}

/// Produces audible output for timed triggers.
///
/// Triggers carry absolute times; the engine must honour them regardless of
/// submission order.
pub trait SynthEngine {
    fn trigger(&mut self, voice: Voice, event: &TriggerEvent) -> Result<(), JamError>;
}

/// Rendering options handed to the visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizerOptions {
    pub note_height: u32,
    pub pixels_per_time_step: u32,
}

impl Default for VisualizerOptions {
    fn default() -> Self {
        Self {
            note_height: 6,
            pixels_per_time_step: 30,
        }
    }
}

/// Renders a sequence once, synchronously from the caller's perspective.
pub trait Visualizer {
    fn render(&mut self, sequence: &NoteSequence, options: &VisualizerOptions) -> Result<(), JamError>;
}

/// Observable session status, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    LoadingModel,
    Generated,
    Playing,
    Finished,
}

impl Status {
    pub fn text(self) -> &'static str {
        match self {
            Status::LoadingModel => "loading model",
            Status::Generated => "generated",
            Status::Playing => "playing",
            Status::Finished => "finished",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Receives every status change of a session.
pub trait StatusObserver {
    fn status_changed(&mut self, status: Status);
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NullObserver;

impl StatusObserver for NullObserver {
    fn status_changed(&mut self, _status: Status) {}
}
