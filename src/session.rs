//! # Session Controller
//!
//! Drives the pipeline from two user commands, "Generate" and "Play":
//!
//! ```text
//! Idle ──generate──▶ Generating ──model returns──▶ Ready ──play──▶ Playing
//!                        │                           ▲                │
//!                        └──failure: Idle/Ready──────┘◀──duration elapses
//! ```
//!
//! ## Generate
//! 1. Initialise the model (once; a failed load is retried next time)
//! 2. Build the seed from the progression
//! 3. Ask the model for a continuation conditioned on the progression
//! 4. Reject empty or malformed continuations
//! 5. Repair the sequence and hand it to the visualizer
//! 6. Commit it as the current sequence
//!
//! A failure at any step leaves the previous sequence (if any) untouched.
//!
//! ## Play
//! Reads the clock once, schedules the performance from that instant, submits
//! every trigger and records a pending completion at the end of the
//! performance. [`Session::poll`] fires due completions. There is no
//! cancellation: a performance always plays out, and several may overlap.
//!
//! ## Example
//! ```rust
//! use chordjam::clock::ManualClock;
//! use chordjam::collaborators::*;
//! use chordjam::performance::{TriggerEvent, Voice};
//! use chordjam::*;
//!
//! struct OneNote;
//! impl SequenceModel for OneNote {
//!     fn initialize(&mut self) -> Result<(), JamError> { Ok(()) }
//!     fn continue_sequence(
//!         &mut self, seed: &NoteSequence, _: u32, _: f64, _: &[ChordSymbol],
//!     ) -> Result<NoteSequence, JamError> {
//!         let pitch = Pitch::parse("E4")?;
//!         Ok(NoteSequence { notes: vec![NoteEvent::new(pitch, 0.0, 0.5)], ..seed.clone() })
//!     }
//! }
//! struct Silent;
//! impl SynthEngine for Silent {
//!     fn trigger(&mut self, _: Voice, _: &TriggerEvent) -> Result<(), JamError> { Ok(()) }
//! }
//! struct Blind;
//! impl Visualizer for Blind {
//!     fn render(&mut self, _: &NoteSequence, _: &VisualizerOptions) -> Result<(), JamError> { Ok(()) }
//! }
//!
//! let clock = ManualClock::new(0.0);
//! let mut session = Session::new(JamConfig::default(), OneNote, Silent, Blind, clock.clone());
//!
//! assert!(!session.can_play());
//! session.generate()?;
//! assert_eq!(session.state(), SessionState::Ready);
//!
//! assert!(matches!(session.play()?, PlayOutcome::Started { .. }));
//! clock.advance(60.0);
//! assert_eq!(session.poll(), 1);
//! assert_eq!(session.status(), Some(Status::Finished));
//! # Ok::<(), JamError>(())
//! ```

use crate::api::seed_for;
use crate::clock::Clock;
use crate::collaborators::{
    NullObserver, SequenceModel, Status, StatusObserver, SynthEngine, Visualizer,
};
use crate::config::JamConfig;
use crate::error::JamError;
use crate::performance::schedule_performance;
use crate::repair::repair_sequence;
use crate::sequence::NoteSequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No sequence yet
    Idle,
    /// Waiting on the model
    Generating,
    /// A sequence is available for playback
    Ready,
    /// At least one performance has not finished yet
    Playing,
}

/// Result of a "Play" request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayOutcome {
    Started {
        /// Performance start instant
        start: f64,
        /// When the "finished" status is due
        finishes_at: f64,
        /// Number of triggers submitted to the engine
        triggers: usize,
    },
    /// Nothing to play yet. Nothing happened.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingCompletion {
    due: f64,
}

pub struct Session {
    config: JamConfig,
    model: Box<dyn SequenceModel>,
    model_ready: bool,
    synth: Box<dyn SynthEngine>,
    visualizer: Box<dyn Visualizer>,
    clock: Box<dyn Clock>,
    observer: Box<dyn StatusObserver>,
    state: SessionState,
    status: Option<Status>,
    current: Option<NoteSequence>,
    pending: Vec<PendingCompletion>,
}

impl Session {
    pub fn new(
        config: JamConfig,
        model: impl SequenceModel + 'static,
        synth: impl SynthEngine + 'static,
        visualizer: impl Visualizer + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            config,
            model: Box::new(model),
            model_ready: false,
            synth: Box::new(synth),
            visualizer: Box::new(visualizer),
            clock: Box::new(clock),
            observer: Box::new(NullObserver),
            state: SessionState::Idle,
            status: None,
            current: None,
            pending: Vec::new(),
        }
    }

    /// Replace the status observer.
    pub fn with_observer(mut self, observer: impl StatusObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &JamConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Last reported status, if any.
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn current_sequence(&self) -> Option<&NoteSequence> {
        self.current.as_ref()
    }

    /// Whether the "Generate" command should be enabled.
    pub fn can_generate(&self) -> bool {
        self.state != SessionState::Generating
    }

    /// Whether the "Play" command should be enabled.
    pub fn can_play(&self) -> bool {
        self.state != SessionState::Generating && self.current.is_some()
    }

    pub fn pending_completions(&self) -> usize {
        self.pending.len()
    }

    /// Earliest pending completion time.
    pub fn next_completion(&self) -> Option<f64> {
        self.pending.iter().map(|p| p.due).reduce(f64::min)
    }

    /// Generate a new melody and make it the current sequence.
    ///
    /// # Errors
    /// - [`JamError::ModelLoad`] if the model cannot be initialised
    /// - [`JamError::Generation`] if the continuation fails or is unusable
    /// - Any error of the visualizer, unmodified
    ///
    /// On error the previous sequence (if any) stays current and the status
    /// reverts to what it was before the call. Performances still pending
    /// keep the session Playing either way.
    pub fn generate(&mut self) -> Result<&NoteSequence, JamError> {
        let previous_status = self.status;
        self.state = SessionState::Generating;
        self.set_status(Status::LoadingModel);

        match self.run_generation() {
            Ok(sequence) => {
                log::info!(
                    "generated {} notes, {:.2}s",
                    sequence.notes.len(),
                    sequence.total_time
                );
                self.state = if self.pending.is_empty() {
                    SessionState::Ready
                } else {
                    SessionState::Playing
                };
                self.set_status(Status::Generated);
                let sequence: &NoteSequence = self.current.insert(sequence);
                Ok(sequence)
            }
            Err(e) => {
                log::warn!("generation failed: {}", e);
                self.state = self.settled_state();
                match previous_status {
                    Some(status) => self.set_status(status),
                    None => self.status = None,
                }
                Err(e)
            }
        }
    }

    /// State once no generation is running.
    fn settled_state(&self) -> SessionState {
        if !self.pending.is_empty() {
            SessionState::Playing
        } else if self.current.is_some() {
            SessionState::Ready
        } else {
            SessionState::Idle
        }
    }

    fn run_generation(&mut self) -> Result<NoteSequence, JamError> {
        self.ensure_model()?;

        let seed = seed_for(&self.config);
        let settings = &self.config.generation;
        let chords = self.config.progression.symbols();

        log::debug!(
            "continuing seed: {} steps, temperature {}",
            settings.steps,
            settings.temperature
        );
        let raw = self
            .model
            .continue_sequence(&seed, settings.steps, settings.temperature, &chords)?;
        check_continuation(&raw)?;

        let sequence = repair_sequence(raw);
        self.visualizer.render(&sequence, &self.config.visualizer)?;
        Ok(sequence)
    }

    fn ensure_model(&mut self) -> Result<(), JamError> {
        if !self.model_ready {
            log::info!("loading model from {}", self.config.generation.checkpoint_url);
            self.model.initialize()?;
            self.model_ready = true;
        }
        Ok(())
    }

    /// Play the current sequence with the full arrangement.
    ///
    /// Rejected (not queued) before any sequence exists. A generation in
    /// progress holds the session mutably, so play cannot interleave with it.
    /// Errors from the synthesis engine are returned unmodified and leave the
    /// current sequence and state untouched.
    pub fn play(&mut self) -> Result<PlayOutcome, JamError> {
        let Some(sequence) = self.current.as_ref() else {
            log::debug!("play rejected: no sequence");
            return Ok(PlayOutcome::Rejected);
        };

        let start = self.clock.now();
        let spec = schedule_performance(
            sequence,
            &self.config.progression,
            &self.config.arrangement,
            start,
        );

        for timeline in &spec.voices {
            for event in &timeline.events {
                self.synth.trigger(timeline.voice, event)?;
            }
        }

        let finishes_at = spec.end_time();
        let triggers = spec.trigger_count();
        log::info!(
            "playing from {:.3}s: {} triggers, finished at {:.3}s",
            start,
            triggers,
            finishes_at
        );

        self.pending.push(PendingCompletion { due: finishes_at });
        self.state = SessionState::Playing;
        self.set_status(Status::Playing);

        Ok(PlayOutcome::Started {
            start,
            finishes_at,
            triggers,
        })
    }

    /// Fire every completion that is due. Returns how many fired.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.pending.len();
        self.pending.retain(|pending| pending.due > now);
        let fired = before - self.pending.len();

        for _ in 0..fired {
            self.set_status(Status::Finished);
        }
        if fired > 0 && self.pending.is_empty() && self.state == SessionState::Playing {
            self.state = SessionState::Ready;
        }
        fired
    }

    fn set_status(&mut self, status: Status) {
        log::info!("status: {}", status);
        self.status = Some(status);
        self.observer.status_changed(status);
    }
}

/// Reject continuations the repairer cannot make sense of.
fn check_continuation(sequence: &NoteSequence) -> Result<(), JamError> {
    if sequence.notes.is_empty() {
        return Err(JamError::Generation("continuation contains no notes".to_string()));
    }
    if !(sequence.total_time.is_finite() && sequence.total_time >= 0.0) {
        return Err(JamError::Generation(format!(
            "continuation has invalid total time {}",
            sequence.total_time
        )));
    }
    if let Some((index, note)) = sequence
        .notes
        .iter()
        .enumerate()
        .find(|(_, note)| !note.is_well_formed())
    {
        return Err(JamError::Generation(format!(
            "note {} has invalid timing ({} - {})",
            index, note.start_time, note.end_time
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::Pitch;
    use crate::sequence::NoteEvent;

    fn note(start: f64, end: f64) -> NoteEvent {
        NoteEvent::new(Pitch::from_midi(60).unwrap(), start, end)
    }

    #[test]
    fn test_check_continuation_accepts_zero_length_notes() {
        let sequence = NoteSequence {
            notes: vec![note(0.0, 0.0), note(0.5, 1.0)],
            total_time: 1.0,
            ..Default::default()
        };
        assert!(check_continuation(&sequence).is_ok());
    }

    #[test]
    fn test_check_continuation_rejects_empty() {
        let sequence = NoteSequence::default();
        assert!(matches!(
            check_continuation(&sequence),
            Err(JamError::Generation(_))
        ));
    }

    #[test]
    fn test_check_continuation_rejects_malformed_notes() {
        let backwards = NoteSequence {
            notes: vec![note(0.0, 0.5), note(2.0, 1.0)],
            total_time: 2.0,
            ..Default::default()
        };
        match check_continuation(&backwards) {
            Err(JamError::Generation(message)) => assert!(message.starts_with("note 1")),
            other => panic!("expected generation error, got {:?}", other),
        }

        let negative = NoteSequence {
            notes: vec![note(-1.0, 0.5)],
            total_time: 1.0,
            ..Default::default()
        };
        assert!(check_continuation(&negative).is_err());

        let endless = NoteSequence {
            notes: vec![note(0.0, 0.5)],
            total_time: f64::NAN,
            ..Default::default()
        };
        assert!(check_continuation(&endless).is_err());
    }
}
