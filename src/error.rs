use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single game could not be converted. The batch keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("missing data: {0}")]
    MissingData(String),
}

/// Errors that abort the whole run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to open file '{}': {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Failed to create output file '{}': {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("Failed to read '{source_label}': {error}")]
    Read { source_label: String, error: io::Error },

    #[error("Failed to write output: {0}")]
    Write(#[from] io::Error),

    #[error("Failed to serialize games: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("No input files match '{0}'")]
    NoInput(String),

    #[error("{0}")]
    Config(String),
}

/// Where a game came from: the source label and its 1-based index within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLocation {
    pub source: String,
    pub index: usize,
}

/// One failed game as reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFailure {
    pub location: GameLocation,
    pub error: GameError,
}

impl fmt::Display for GameFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "game {} in '{}': {}",
            self.location.index, self.location.source, self.error
        )
    }
}
