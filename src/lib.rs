//! Convert PGN chess games into a JSON array of `{Event, Site, Date, Round,
//! White, Black, Result, Moves}` records, with moves in canonical SAN.
//!
//! Games that fail to parse or contain illegal moves are reported and skipped;
//! they never stop the batch.

pub mod config;
pub mod convert;
pub mod error;
pub mod log;
pub mod reader;
pub mod san;
pub mod types;
pub mod visitor;

pub use config::{CompressionMode, ConvertConfig, DEFAULT_MAX_GAMES};
pub use convert::{ConversionResult, convert, convert_games, run, write_json};
pub use error::{ConvertError, GameError, GameFailure, GameLocation};
pub use reader::{GameSource, PgnSource, RawGame, StreamSource};
pub use types::GameRecord;
