use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

mod audio;
mod color;
mod config;
mod error;
mod game;
mod geometry;
mod input;
mod logging;
mod render;
mod sprite;
mod terminal;
mod timer;

use audio::{Audio, Cue};
use config::Args;
use game::Game;
use render::{PixelBuf, Renderer};
use sprite::Sprite;
use terminal::TerminalGuard;

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn run(args: &Args, term: &mut TerminalGuard, renderer: &Renderer, audio: &Audio) -> Result<()> {
    let seed = args.seed.unwrap_or_else(clock_seed);
    info!(seed, "session seed");
    let mut game = Game::with_seed(args.step_interval(), seed);

    let (pw, ph) = TerminalGuard::pixel_size().context("failed to read terminal size")?;
    let mut buf = PixelBuf::new(pw, ph);

    let frame_dur = args.frame_duration();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start - last;
        last = frame_start;

        // Input
        let frame = input::poll().context("failed to read input")?;
        if frame.quit {
            info!(score = game.score(), "quit");
            return Ok(());
        }
        if let Some((cols, rows)) = frame.resize {
            let (pw, ph) = terminal::cells_to_pixels(cols, rows);
            buf.resize(pw, ph);
        }

        // Update
        if let Some(event) = game.update(frame.keys, dt) {
            if let Some(cue) = Cue::for_event(&event) {
                audio.play(cue);
            }
        }

        // Render
        renderer.draw(&game, &mut buf);
        buf.render(term.out()).context("failed to draw frame")?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log_file)
        .with_context(|| format!("failed to open log file {}", args.log_file.display()))?;
    info!(?args, "starting");

    let renderer = Renderer::new(Sprite::load_or_default(&args.assets.join("car.png")));
    let audio = if args.mute {
        Audio::silent()
    } else {
        Audio::open(&args.assets)
    };
    info!(muted = audio.is_silent(), "audio ready");

    let mut term = TerminalGuard::enter().context("failed to set up terminal")?;
    let result = run(&args, &mut term, &renderer, &audio);

    // Screen first, so nothing the audio backend prints lands on it.
    drop(term);
    drop(audio);
    info!("shutdown");
    result
}
