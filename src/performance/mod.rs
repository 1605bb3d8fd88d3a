//! # Performance Module
//!
//! Turn a repaired melody and the fixed chord progression into a four-part
//! performance: lead, chord pad, bass and a three-piece drum kit.
//!
//! ## Sub-modules
//! - `types` - Voice, NoteLength, TriggerEvent, VoiceTimeline, PerformanceSpec
//! - `scheduler` - The arrangement constants and the scheduling logic
//!
//! ## Entry Point
//! [`schedule_performance()`] - Lay out every voice from one start instant
//!
//! ## Two Grids, One Origin
//!
//! ### Bar grid
//! - Pad and bass trigger once per bar (2 s), 16 bars
//! - The 4-chord progression cycles: C G Am F C G Am F ...
//!
//! ### Step grid
//! - 64 drum steps of 0.5 s
//! - Kick on `step % 4 == 0`, snare on `step % 4 == 2`
//! - Hi-hat on every step, 0.125 s late
//!
//! The lead voice follows the generated notes directly, each one lasting at
//! least 0.05 s so zero-length notes still sound.
//!
//! ## Example
//! ```rust
//! use chordjam::performance::{schedule_performance, Arrangement, Voice};
//! use chordjam::{NoteSequence, Progression};
//!
//! let spec = schedule_performance(
//!     &NoteSequence::default(),
//!     &Progression::default(),
//!     &Arrangement::default(),
//!     0.0,
//! );
//!
//! assert_eq!(spec.events(Voice::Kick).len(), 16);
//! assert_eq!(spec.events(Voice::Snare).len(), 16);
//! assert_eq!(spec.events(Voice::HiHat)[0].at_time, 0.125);
//! ```

mod scheduler;
mod types;


pub use scheduler::{schedule_performance, Arrangement};
pub use types::{Instrument, NoteLength, PerformanceSpec, TriggerEvent, Voice, VoiceTimeline};
