//! Audio output and the two gameplay cues.
//!
//! Cues come from `park.ogg` / `crash.ogg` in the assets directory when
//! present; otherwise they are synthesized with fundsp at startup.

use std::fs::File;
use std::path::Path;

use fundsp::prelude32::{AudioUnit, saw_hz, sine_hz};
use rodio::buffer::SamplesBuffer;
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{info, warn};

use crate::error::{GameError, Result};
use crate::game::Event;

const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Park,
    Crash,
}

impl Cue {
    pub fn for_event(event: &Event) -> Option<Cue> {
        match event {
            Event::Parked { .. } => Some(Cue::Park),
            Event::Crashed { .. } => Some(Cue::Crash),
            Event::Restarted => None,
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            Cue::Park => "park.ogg",
            Cue::Crash => "crash.ogg",
        }
    }

    fn synthesize(self) -> Clip {
        match self {
            Cue::Park => park_jingle(),
            Cue::Crash => crash_jingle(),
        }
    }
}

/// Fully decoded sound, replayed from memory.
#[derive(Debug, Clone)]
pub struct Clip {
    channels: u16,
    sample_rate: u32,
    samples: Vec<f32>,
}

impl Clip {
    pub fn mono(samples: Vec<f32>) -> Self {
        Self {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            samples,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| GameError::asset(path, e))?;
        let decoder = Decoder::try_from(file).map_err(|e| GameError::asset(path, e))?;
        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<f32> = decoder.collect();
        if samples.is_empty() {
            return Err(GameError::asset(path, "no samples"));
        }
        info!(path = %path.display(), channels, sample_rate, "loaded sound");
        Ok(Self {
            channels,
            sample_rate,
            samples,
        })
    }

    fn source(&self) -> SamplesBuffer {
        SamplesBuffer::new(self.channels, self.sample_rate, self.samples.clone())
    }
}

fn load_cue(assets: &Path, cue: Cue) -> Clip {
    let path = assets.join(cue.file_name());
    if !path.exists() {
        return cue.synthesize();
    }
    Clip::load(&path).unwrap_or_else(|e| {
        warn!("{e}, using synthesized {cue:?} sound");
        cue.synthesize()
    })
}

// ── Synthesized cues ────────────────────────────────────────────────────────

/// Render `secs` of a generator with a linear fade-out.
fn render_note(mut unit: Box<dyn AudioUnit>, secs: f32, gain: f32) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let n = (secs * SAMPLE_RATE as f32) as usize;
    (0..n)
        .map(|i| {
            let fade = 1.0 - i as f32 / n as f32;
            (unit.get_mono() * gain * fade).clamp(-1.0, 1.0)
        })
        .collect()
}

/// Rising major arpeggio.
fn park_jingle() -> Clip {
    let notes = [523.25, 659.25, 783.99, 1046.5];
    let samples = notes
        .iter()
        .flat_map(|&f| render_note(Box::new(sine_hz(f)), 0.09, 0.3))
        .collect();
    Clip::mono(samples)
}

/// Falling sawtooth, getting quieter.
fn crash_jingle() -> Clip {
    let notes = [(400.0, 0.15), (300.0, 0.12), (200.0, 0.10), (110.0, 0.08)];
    let samples = notes
        .iter()
        .flat_map(|&(f, gain)| render_note(Box::new(saw_hz(f)), 0.12, gain))
        .collect();
    Clip::mono(samples)
}

// ── Output ──────────────────────────────────────────────────────────────────

/// Open audio device plus the cues. Dropping it closes the device.
pub struct Audio {
    output: Option<(OutputStream, Mixer)>,
    park: Clip,
    crash: Clip,
}

impl Audio {
    /// Plays nothing.
    pub fn silent() -> Self {
        Self {
            output: None,
            park: Clip::mono(Vec::new()),
            crash: Clip::mono(Vec::new()),
        }
    }

    /// Device and cues. A missing device is not fatal: the game runs muted.
    pub fn open(assets: &Path) -> Self {
        let output = match open_stream() {
            Ok(stream) => {
                let mixer = stream.mixer().clone();
                Some((stream, mixer))
            }
            Err(e) => {
                warn!("{e}, running without sound");
                return Self::silent();
            }
        };
        Self {
            output,
            park: load_cue(assets, Cue::Park),
            crash: load_cue(assets, Cue::Crash),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.output.is_none()
    }

    pub fn play(&self, cue: Cue) {
        let Some((_, mixer)) = &self.output else {
            return;
        };
        let clip = match cue {
            Cue::Park => &self.park,
            Cue::Crash => &self.crash,
        };
        let sink = Sink::connect_new(mixer);
        sink.append(clip.source());
        sink.detach(); // Play in background
    }
}

fn open_stream() -> Result<OutputStream> {
    let mut stream = OutputStreamBuilder::open_default_stream()
        .map_err(|e| GameError::AudioDevice(e.to_string()))?;
    // Its drop message would land on the game screen.
    stream.log_on_drop(false);
    info!("audio device opened");
    Ok(stream)
}
