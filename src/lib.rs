pub mod api;
pub mod chords;
pub mod clock;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod performance;
pub mod pitch;
pub mod repair;
pub mod seed;
pub mod sequence;
pub mod session;

pub use api::{perform, seed_for};
pub use chords::{Chord, ChordSymbol, Progression};
pub use collaborators::{SequenceModel, Status, StatusObserver, SynthEngine, Visualizer, VisualizerOptions};
pub use config::{GenerationSettings, JamConfig};
pub use error::*;
pub use performance::{
    schedule_performance, Arrangement, NoteLength, PerformanceSpec, TriggerEvent, Voice,
    VoiceTimeline,
};
pub use pitch::Pitch;
pub use repair::{normalize_notes, repair_sequence, TRAILING_SILENCE};
pub use seed::build_seed;
pub use sequence::{NoteEvent, NoteSequence, TEMPO_QPM};
pub use session::{PlayOutcome, Session, SessionState};
