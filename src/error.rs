//! Startup and shutdown failures. Losing a round is gameplay, not an error.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Terminal could not be put into (or taken out of) game mode
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// No usable audio output
    #[error("audio device error: {0}")]
    AudioDevice(String),

    /// An asset exists but could not be read or decoded
    #[error("failed to load asset {path}: {reason}")]
    Asset { path: PathBuf, reason: String },
}

impl GameError {
    pub fn asset(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        GameError::Asset {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
