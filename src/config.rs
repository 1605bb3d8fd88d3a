//! # Session Configuration
//!
//! Sessions are configured from a small YAML document. Every key is optional
//! and falls back to the built-in defaults:
//!
//! ```yaml
//! progression: [C, G, Am, F]
//! voicings:
//!   C: [C4, E4, G4]
//! steps: 64
//! temperature: 1.1
//! steps-per-quarter: 4
//! checkpoint-url: https://storage.googleapis.com/magentadata/js/checkpoints/music_rnn/chord_pitches_improv
//! note-height: 6
//! pixels-per-time-step: 30
//! ```
//!
//! Tempo, meter and the arrangement timing are fixed and cannot be
//! configured.

use std::collections::HashMap;

use serde::Deserialize;

use crate::chords::{default_voicings, parse_voicing, ChordSymbol, Progression, DEFAULT_PROGRESSION};
use crate::collaborators::VisualizerOptions;
use crate::error::JamError;
use crate::performance::Arrangement;

pub const DEFAULT_CHECKPOINT_URL: &str =
    "https://storage.googleapis.com/magentadata/js/checkpoints/music_rnn/chord_pitches_improv";

/// Parameters of one model continuation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Number of quantized steps to generate
    pub steps: u32,
    pub temperature: f64,
    /// Quantization grid handed to the model with the seed
    pub steps_per_quarter: u32,
    /// Where the model loads its weights from
    pub checkpoint_url: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            steps: 64,
            temperature: 1.1,
            steps_per_quarter: 4,
            checkpoint_url: DEFAULT_CHECKPOINT_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JamConfig {
    pub progression: Progression,
    pub generation: GenerationSettings,
    pub visualizer: VisualizerOptions,
    pub arrangement: Arrangement,
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub progression: Option<Vec<String>>,
    pub voicings: Option<HashMap<String, Vec<String>>>,
    pub steps: Option<u32>,
    pub temperature: Option<f64>,
    pub steps_per_quarter: Option<u32>,
    pub checkpoint_url: Option<String>,
    pub note_height: Option<u32>,
    pub pixels_per_time_step: Option<u32>,
}

impl JamConfig {
    /// Parse and validate a YAML configuration.
    ///
    /// # Example
    /// ```rust
    /// use chordjam::JamConfig;
    ///
    /// let config = JamConfig::from_yaml("progression: [Am, F, C, G]\ntemperature: 0.9")?;
    /// assert_eq!(config.progression.len(), 4);
    /// assert_eq!(config.generation.temperature, 0.9);
    /// assert_eq!(config.generation.steps, 64);
    /// # Ok::<(), chordjam::JamError>(())
    /// ```
    pub fn from_yaml(content: &str) -> Result<Self, JamError> {
        if content.trim().is_empty() {
            return Self::from_raw(RawConfig::default());
        }
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| JamError::Config(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self, JamError> {
        let mut voicings = default_voicings();
        for (symbol, names) in raw.voicings.unwrap_or_default() {
            let pitches = parse_voicing(&names).map_err(|e| match e {
                JamError::Pitch(name) => {
                    JamError::Config(format!("voicing for '{}': invalid pitch name '{}'", symbol, name))
                }
                other => other,
            })?;
            voicings.insert(ChordSymbol::new(symbol), pitches);
        }

        let symbols: Vec<ChordSymbol> = match raw.progression {
            Some(symbols) => symbols.into_iter().map(ChordSymbol::new).collect(),
            None => DEFAULT_PROGRESSION.iter().map(|s| ChordSymbol::new(*s)).collect(),
        };
        let progression = Progression::new(&symbols, &voicings)?;

        let defaults = GenerationSettings::default();
        let generation = GenerationSettings {
            steps: raw.steps.unwrap_or(defaults.steps),
            temperature: raw.temperature.unwrap_or(defaults.temperature),
            steps_per_quarter: raw.steps_per_quarter.unwrap_or(defaults.steps_per_quarter),
            checkpoint_url: raw.checkpoint_url.unwrap_or(defaults.checkpoint_url),
        };
        generation.validate()?;

        let default_view = VisualizerOptions::default();
        let visualizer = VisualizerOptions {
            note_height: raw.note_height.unwrap_or(default_view.note_height),
            pixels_per_time_step: raw
                .pixels_per_time_step
                .unwrap_or(default_view.pixels_per_time_step),
        };

        Ok(Self {
            progression,
            generation,
            visualizer,
            arrangement: Arrangement::default(),
        })
    }
}

impl GenerationSettings {
    fn validate(&self) -> Result<(), JamError> {
        if self.steps == 0 {
            return Err(JamError::Config("steps must be at least 1".to_string()));
        }
        if self.steps_per_quarter == 0 {
            return Err(JamError::Config("steps-per-quarter must be at least 1".to_string()));
        }
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(JamError::Config(format!(
                "temperature must be a positive number, got {}",
                self.temperature
            )));
        }
        if self.checkpoint_url.trim().is_empty() {
            return Err(JamError::Config("checkpoint-url must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = JamConfig::from_yaml("").unwrap();
        assert_eq!(config, JamConfig::default());
        assert_eq!(config.generation.temperature, 1.1);
        assert_eq!(config.generation.checkpoint_url, DEFAULT_CHECKPOINT_URL);
        assert_eq!(config.visualizer.note_height, 6);
        assert_eq!(config.visualizer.pixels_per_time_step, 30);
    }

    #[test]
    fn test_custom_voicing_overrides_table() {
        let config = JamConfig::from_yaml(
            r#"
progression: [C, Dm]
voicings:
  C: [E3, G3, C4]
"#,
        )
        .unwrap();

        let c = config.progression.chord_at(0);
        assert_eq!(c.root().to_string(), "E3");
        // Dm is not in the table and is parsed as a triad
        assert_eq!(config.progression.chord_at(1).root().to_string(), "D4");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(JamConfig::from_yaml("temperature: 0"), Err(JamError::Config(_))));
        assert!(matches!(JamConfig::from_yaml("temperature: -1.5"), Err(JamError::Config(_))));
        assert!(matches!(JamConfig::from_yaml("steps: 0"), Err(JamError::Config(_))));
        assert!(matches!(JamConfig::from_yaml("steps-per-quarter: 0"), Err(JamError::Config(_))));
        assert!(matches!(JamConfig::from_yaml("progression: []"), Err(JamError::Config(_))));
        assert!(matches!(JamConfig::from_yaml("progression: [Q]"), Err(JamError::Config(_))));
    }

    #[test]
    fn test_invalid_voicings() {
        let short = "voicings:\n  C: [C4, E4]";
        assert!(matches!(JamConfig::from_yaml(short), Err(JamError::Config(_))));

        let bad_name = "voicings:\n  C: [C4, E4, Z4]";
        match JamConfig::from_yaml(bad_name) {
            Err(JamError::Config(message)) => assert!(message.contains("Z4")),
            other => panic!("expected config error, got {:?}", other),
        }

        let huge_octave = "voicings:\n  C: [C4, E4, C2000000000]";
        match JamConfig::from_yaml(huge_octave) {
            Err(JamError::Config(message)) => assert!(message.contains("C2000000000")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_yaml_errors_are_config_errors() {
        assert!(matches!(JamConfig::from_yaml("steps: [1, 2"), Err(JamError::Config(_))));
        assert!(matches!(JamConfig::from_yaml("tempo: 140"), Err(JamError::Config(_))));
    }
}
