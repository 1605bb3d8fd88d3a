use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;
use std::thread;
use std::time::Duration;

use serde::Serialize;

use chordjam::clock::{Clock, SystemClock};
use chordjam::{
    ChordSymbol, JamConfig, JamError, NoteEvent, NoteSequence, PlayOutcome, Progression,
    SequenceModel, Session, Status, StatusObserver, SynthEngine, TriggerEvent, Visualizer,
    VisualizerOptions, Voice,
};

const USAGE: &str = "Usage: chordjam [--config <file.yaml>] [--no-wait]";

/// Stand-in for a trained model: walks the tones of the conditioning chords
/// on the quantization grid, two steps per note, one octave up.
struct ChordToneModel {
    progression: Progression,
    loaded: bool,
}

impl SequenceModel for ChordToneModel {
    fn initialize(&mut self) -> Result<(), JamError> {
        self.loaded = true;
        Ok(())
    }

    fn continue_sequence(
        &mut self,
        seed: &NoteSequence,
        steps: u32,
        temperature: f64,
        chords: &[ChordSymbol],
    ) -> Result<NoteSequence, JamError> {
        if !self.loaded {
            return Err(JamError::Generation("model is not initialized".to_string()));
        }
        if chords.is_empty() {
            return Err(JamError::Generation("no conditioning chords".to_string()));
        }
        let quantization = seed
            .quantization
            .ok_or_else(|| JamError::Generation("seed is not quantized".to_string()))?;
        let step = quantization.step_seconds(seed.qpm());
        let bar_steps = (2.0 / step).round().max(1.0) as u32;
        // Higher temperatures leap further through the chord tones
        let stride = if temperature > 1.0 { 2 } else { 1 };

        let mut notes = Vec::new();
        for index in (0..steps).step_by(2) {
            let bar = (index / bar_steps) as usize;
            let symbol = &chords[bar % chords.len()];
            let chord = self
                .progression
                .chords()
                .iter()
                .find(|chord| &chord.symbol == symbol)
                .unwrap_or_else(|| self.progression.chord_at(bar));
            let tone = chord.pitches[(index as usize / 2 * stride) % 3];
            let pitch = tone.transposed(12).unwrap_or(tone);
            let start = index as f64 * step;
            notes.push(NoteEvent::new(pitch, start, start + 2.0 * step));
        }

        Ok(NoteSequence {
            notes,
            total_time: steps as f64 * step,
            ..seed.clone()
        })
    }
}

/// Writes each trigger as one JSON line on stdout.
struct JsonLinesEngine;

#[derive(Serialize)]
struct TriggerLine<'a> {
    voice: Voice,
    #[serde(flatten)]
    event: &'a TriggerEvent,
}

impl SynthEngine for JsonLinesEngine {
    fn trigger(&mut self, voice: Voice, event: &TriggerEvent) -> Result<(), JamError> {
        let line = serde_json::to_string(&TriggerLine { voice, event })
            .map_err(|e| JamError::Synthesis(e.to_string()))?;
        writeln!(io::stdout(), "{}", line).map_err(|e| JamError::Synthesis(e.to_string()))
    }
}

struct LogVisualizer;

impl Visualizer for LogVisualizer {
    fn render(&mut self, sequence: &NoteSequence, options: &VisualizerOptions) -> Result<(), JamError> {
        let pitches: Vec<String> = sequence.notes.iter().map(|n| n.pitch.to_string()).collect();
        log::info!(
            "melody ({}px notes, {}px per step): {}",
            options.note_height,
            options.pixels_per_time_step,
            pitches.join(" ")
        );
        Ok(())
    }
}

struct StatusLine;

impl StatusObserver for StatusLine {
    fn status_changed(&mut self, status: Status) {
        eprintln!("[{}]", status);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut config_path: Option<&String> = None;
    let mut wait = true;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                config_path = args.get(i + 1);
                if config_path.is_none() {
                    eprintln!("{}", USAGE);
                    process::exit(1);
                }
                i += 2;
            }
            "--no-wait" => {
                wait = false;
                i += 1;
            }
            _ => {
                eprintln!("{}", USAGE);
                process::exit(1);
            }
        }
    }

    let config = match config_path {
        Some(path) => {
            let source = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading file '{}': {}", path, e);
                    process::exit(1);
                }
            };
            match JamConfig::from_yaml(&source) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{}", e);
                    process::exit(1);
                }
            }
        }
        None => JamConfig::default(),
    };

    let clock = SystemClock::new();
    let model = ChordToneModel {
        progression: config.progression.clone(),
        loaded: false,
    };
    let mut session = Session::new(config, model, JsonLinesEngine, LogVisualizer, clock.clone())
        .with_observer(StatusLine);

    if let Err(e) = session.generate() {
        eprintln!("{}", e);
        process::exit(1);
    }

    match session.play() {
        Ok(PlayOutcome::Started { finishes_at, .. }) => {
            log::info!("performance ends at {:.2}s", finishes_at);
        }
        Ok(PlayOutcome::Rejected) => {
            eprintln!("Nothing to play");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }

    if !wait {
        return;
    }
    while let Some(due) = session.next_completion() {
        let remaining = (due - clock.now()).max(0.0);
        thread::sleep(Duration::from_secs_f64(remaining + 0.01));
        session.poll();
    }
}
