use crate::config::ConvertConfig;
use crate::error::{ConvertError, GameError, GameFailure};
use crate::log;
use crate::reader::{GameSource, PgnSource, StreamSource};
use crate::san::{render_mainline, starting_position};
use crate::types::GameRecord;
use crate::visitor::ParsedGame;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

const JSON_INDENT: &[u8] = b"    ";

/// Games that made it through, plus one entry per game that did not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionResult {
    pub games: Vec<GameRecord>,
    pub errors: Vec<GameFailure>,
}

impl ConversionResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human-readable summary of the run, separate from the JSON document.
    pub fn report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.errors.is_empty() {
            writeln!(out, "Conversion completed without errors.")
        } else {
            writeln!(out, "Errors were encountered during conversion:")?;
            for error in &self.errors {
                writeln!(out, "- {error}")?;
            }
            Ok(())
        }
    }
}

/// Builds the output record for one parsed game.
pub fn game_record(game: &ParsedGame) -> Result<GameRecord, GameError> {
    let headers = &game.headers;
    let start = starting_position(headers)?;
    let moves = render_mainline(start, &game.mainline)?;

    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    Ok(GameRecord {
        event: field(&headers.event),
        site: field(&headers.site),
        date: field(&headers.date),
        round: field(&headers.round),
        white: field(&headers.white),
        black: field(&headers.black),
        result: field(&headers.result),
        moves,
    })
}

/// Pulls games from `source` until it runs dry or `max_games` games have
/// been converted. Failed games are recorded and do not count toward the limit.
pub fn convert_games<S: GameSource>(
    source: &mut S,
    max_games: usize,
) -> Result<ConversionResult, ConvertError> {
    let mut result = ConversionResult::default();

    while result.games.len() < max_games {
        let Some(raw) = source.next_game()? else {
            break;
        };

        match raw.parsed.and_then(|game| game_record(&game)) {
            Ok(record) => result.games.push(record),
            Err(error) => {
                let failure = GameFailure {
                    location: raw.location,
                    error,
                };
                log::warn(failure.to_string());
                result.errors.push(failure);
            }
        }
    }

    Ok(result)
}

/// Serializes `games` as a JSON array indented by four spaces.
pub fn to_json_bytes(games: &[GameRecord]) -> Result<Vec<u8>, ConvertError> {
    let mut buffer = Vec::with_capacity(games.len() * 512);
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));
    games.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Writes the whole document in one pass once it is fully serialized.
pub fn write_json<W: Write>(games: &[GameRecord], mut destination: W) -> Result<(), ConvertError> {
    let document = to_json_bytes(games)?;
    destination.write_all(&document)?;
    destination.flush()?;
    Ok(())
}

/// Converts PGN text from `source` and writes the JSON array to `destination`.
pub fn convert<R: Read, W: Write>(
    source: R,
    destination: W,
    max_games: usize,
) -> Result<ConversionResult, ConvertError> {
    let mut games = StreamSource::new(source);
    let result = convert_games(&mut games, max_games)?;
    write_json(&result.games, destination)?;
    Ok(result)
}

/// Sibling path the document is written to before it replaces `output`.
fn partial_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    output.with_file_name(name)
}

/// Writes into `<output>.part` and renames it over `output` only once the
/// whole document is on disk. On any fatal error the partial file is removed
/// and an existing `output` is left untouched.
fn run_with_source<S: GameSource>(
    source: &mut S,
    output: &Path,
    max_games: usize,
) -> Result<ConversionResult, ConvertError> {
    let partial = partial_path(output);
    let file = File::create(&partial).map_err(|source| ConvertError::Create {
        path: output.to_path_buf(),
        source,
    })?;

    let written = convert_games(source, max_games).and_then(|result| {
        write_json(&result.games, BufWriter::new(file))?;
        fs::rename(&partial, output)?;
        Ok(result)
    });

    if written.is_err() {
        let _ = fs::remove_file(&partial);
    }
    written
}

/// File-based entry point. Both ends are acquired before any game is read.
pub fn run(config: &ConvertConfig) -> Result<ConversionResult, ConvertError> {
    let mut source = PgnSource::open(&config.input, config.compression)?;
    let result = run_with_source(&mut source, &config.output, config.max_games)?;

    log::info(format!(
        "Converted {} games ({} failed) from {} input file(s) into '{}'",
        result.games.len(),
        result.errors.len(),
        source.paths().len(),
        config.output.display()
    ));
    Ok(result)
}
