//! # Error Types
//!
//! This module defines all error types for the chordjam pipeline.
//!
//! ## Error Types
//! - `ModelLoad` - The generative model could not be initialised
//! - `Generation` - The model failed or returned an unusable continuation
//! - `Synthesis` - Raised by a synthesis engine while accepting triggers
//! - `Visualization` - Raised by a visualizer while rendering a sequence
//! - `Config` - Invalid YAML configuration
//! - `Pitch` - A pitch name could not be parsed
//!
//! Model errors are fatal to the current "Generate" attempt only. The session
//! never enters the Ready state with a stale sequence, and recovery is always
//! user-initiated by generating again.
//!
//! Calling "Play" without a sequence is not an error: the session rejects it
//! as a no-op (see [`crate::session::PlayOutcome`]).
//!
//! ## Usage
//! ```rust
//! use chordjam::{JamConfig, JamError};
//!
//! match JamConfig::from_yaml("temperature: 0") {
//!     Ok(_) => println!("loaded"),
//!     Err(JamError::Config(message)) => eprintln!("bad config: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JamError {
    /// The generative model could not be initialised.
    ///
    /// Usually a network or asset failure while fetching the checkpoint.
    ///
    /// # Example
    /// ```
    /// # use chordjam::JamError;
    /// let err = JamError::ModelLoad("checkpoint unreachable".to_string());
    /// assert_eq!(err.to_string(), "Model load error: checkpoint unreachable");
    /// ```
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// The model failed to continue the seed, or returned a malformed or
    /// empty continuation.
    ///
    /// # Example
    /// ```
    /// # use chordjam::JamError;
    /// let err = JamError::Generation("continuation contains no notes".to_string());
    /// assert_eq!(err.to_string(), "Generation error: continuation contains no notes");
    /// ```
    #[error("Generation error: {0}")]
    Generation(String),

    /// Raised by a synthesis engine. Propagated unmodified by the session.
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Raised by a visualizer. Propagated unmodified by the session.
    #[error("Visualization error: {0}")]
    Visualization(String),

    /// Invalid configuration value or YAML syntax.
    ///
    /// # Example
    /// ```
    /// # use chordjam::JamError;
    /// let err = JamError::Config("temperature must be positive".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: temperature must be positive");
    /// ```
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A pitch name such as `C4` or `Bb3` could not be parsed.
    #[error("Invalid pitch name: {0}")]
    Pitch(String),
}
