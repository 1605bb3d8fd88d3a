//! # Public API
//!
//! Entry points for running the pipeline without a [`Session`](crate::Session).
//!
//! ## Pipeline Functions
//!
//! - [`seed_for()`] - The generation seed for a configuration
//! - [`perform()`] - Repair a raw continuation and schedule its performance
//!
//! The individual stages are exported at the crate root as well:
//! [`build_seed`](crate::build_seed), [`repair_sequence`](crate::repair_sequence)
//! and [`schedule_performance`](crate::schedule_performance).
//!
//! ## Typical Usage
//!
//! ```rust
//! use chordjam::{perform, seed_for, JamConfig, NoteEvent, Pitch, Voice};
//!
//! let config = JamConfig::default();
//! let mut continuation = seed_for(&config);
//! continuation.notes.push(NoteEvent::new(Pitch::parse("G4")?, 0.5, 1.0));
//!
//! let spec = perform(continuation, &config, 0.0);
//! assert_eq!(spec.events(Voice::Lead)[0].at_time, 0.5);
//! # Ok::<(), chordjam::JamError>(())
//! ```

use crate::config::JamConfig;
use crate::performance::{schedule_performance, PerformanceSpec};
use crate::repair::repair_sequence;
use crate::seed::build_seed;
use crate::sequence::NoteSequence;

/// Build the seed the model continues from.
///
/// One chord marker per progression entry, one bar apart, with the
/// configured quantization grid attached.
pub fn seed_for(config: &JamConfig) -> NoteSequence {
    build_seed(
        &config.progression,
        config.arrangement.bar_duration,
        config.generation.steps_per_quarter,
    )
}

/// Repair a raw continuation and lay out its performance from
/// `performance_start`.
pub fn perform(raw: NoteSequence, config: &JamConfig, performance_start: f64) -> PerformanceSpec {
    let sequence = repair_sequence(raw);
    schedule_performance(
        &sequence,
        &config.progression,
        &config.arrangement,
        performance_start,
    )
}
