use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Logical play field, in world units.
pub const SCREEN_WIDTH: f32 = 1600.0;
pub const SCREEN_HEIGHT: f32 = 1000.0;

/// Edge of the car, of every garage, and the height of a lane.
pub const SQUARE_SIZE: f32 = 200.0;

pub const GARAGE_COUNT: usize = 5;

pub const FPS_TARGET: u32 = 60;

/// Time between two lateral steps of the car.
pub const STEP_INTERVAL: Duration = Duration::from_secs(1);

pub const DEFAULT_ASSETS_DIR: &str = "assets";
pub const DEFAULT_LOG_FILE: &str = "logs/garage-tui.log";

/// Park the car in the garage of the same color
#[derive(Parser, Debug, Clone)]
#[command(name = "garage-tui")]
#[command(about = "Park the car in the garage of the same color", long_about = None)]
pub struct Args {
    /// Frames per second the loop is paced to
    #[arg(long, default_value_t = FPS_TARGET, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Milliseconds between two steps of the car
    #[arg(long, default_value_t = STEP_INTERVAL.as_millis() as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub step_ms: u64,

    /// Directory holding car.png, park.ogg and crash.ogg
    #[arg(long, default_value = DEFAULT_ASSETS_DIR)]
    pub assets: PathBuf,

    /// Seed for the car colors (defaults to the wall clock)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Do not open an audio device
    #[arg(long)]
    pub mute: bool,

    /// Where the log is written (the terminal belongs to the game)
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl Args {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let args = Args::parse_from(["garage-tui"]);
        assert_eq!(args.fps, FPS_TARGET);
        assert_eq!(args.step_interval(), STEP_INTERVAL);
        assert_eq!(args.assets, PathBuf::from(DEFAULT_ASSETS_DIR));
        assert!(args.seed.is_none());
        assert!(!args.mute);
    }

    #[test]
    fn overrides_are_parsed() {
        let args = Args::parse_from([
            "garage-tui",
            "--fps",
            "30",
            "--step-ms",
            "500",
            "--seed",
            "7",
            "--mute",
        ]);
        assert_eq!(args.frame_duration(), Duration::from_secs(1) / 30);
        assert_eq!(args.step_interval(), Duration::from_millis(500));
        assert_eq!(args.seed, Some(7));
        assert!(args.mute);
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(Args::try_parse_from(["garage-tui", "--fps", "0"]).is_err());
    }

    #[test]
    fn field_is_a_whole_number_of_lanes() {
        assert_eq!(SCREEN_HEIGHT % SQUARE_SIZE, 0.0);
        assert_eq!((SCREEN_HEIGHT / SQUARE_SIZE) as usize, GARAGE_COUNT);
    }
}
