use crate::config::CompressionMode;
use crate::error::{ConvertError, GameError, GameLocation};
use crate::log;
use crate::visitor::{GameVisitor, ParsedGame};
use pgn_reader::Reader;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use zstd::stream::read::Decoder as ZstdDecoder;

pub type PgnInput = Box<dyn Read + Send>;

pub const STREAM_LABEL: &str = "<stream>";

/// One record pulled from a source, converted or not.
#[derive(Debug)]
pub struct RawGame {
    pub location: GameLocation,
    pub parsed: Result<ParsedGame, GameError>,
}

/// Yields game records one at a time until the input is exhausted.
///
/// `Ok(None)` is end of input. Per-record problems travel inside
/// [`RawGame::parsed`]; an `Err` aborts the run.
pub trait GameSource {
    fn next_game(&mut self) -> Result<Option<RawGame>, ConvertError>;
}

pub struct PgnReaderState<R: Read> {
    pgn_reader: Reader<R>,
    label: String,
    next_game_index: usize,
}

impl<R: Read> PgnReaderState<R> {
    pub fn new(input: R, label: impl Into<String>) -> Self {
        Self {
            // pgn-reader buffers internally, so no BufReader here.
            pgn_reader: Reader::new(input),
            label: label.into(),
            next_game_index: 1,
        }
    }
}

fn read_next_game<R: Read>(
    reader: &mut PgnReaderState<R>,
    visitor: &mut GameVisitor,
) -> Result<Option<RawGame>, ConvertError> {
    let location = GameLocation {
        source: reader.label.clone(),
        index: reader.next_game_index,
    };

    let parsed = match reader.pgn_reader.read_game(visitor) {
        Ok(None) => return Ok(None),
        Ok(Some(game)) if game.is_empty() => Err(GameError::MissingData(
            "record has no tags, moves or result".to_string(),
        )),
        Ok(Some(game)) => Ok(game),
        Err(error) if error.kind() == io::ErrorKind::InvalidData => {
            log::warn(format!(
                "Parser-stage error: file='{}'; game_index={}; error={}",
                location.source, location.index, error
            ));
            Err(GameError::Parse(error.to_string()))
        }
        Err(error) => {
            return Err(ConvertError::Read {
                source_label: location.source,
                error,
            });
        }
    };

    reader.next_game_index += 1;
    Ok(Some(RawGame { location, parsed }))
}

/// A single in-memory or already-open PGN stream.
pub struct StreamSource<R: Read> {
    state: PgnReaderState<R>,
    visitor: GameVisitor,
}

impl<R: Read> StreamSource<R> {
    pub fn new(input: R) -> Self {
        Self::with_label(input, STREAM_LABEL)
    }

    pub fn with_label(input: R, label: impl Into<String>) -> Self {
        Self {
            state: PgnReaderState::new(input, label),
            visitor: GameVisitor::new(),
        }
    }
}

impl<R: Read> GameSource for StreamSource<R> {
    fn next_game(&mut self) -> Result<Option<RawGame>, ConvertError> {
        read_next_game(&mut self.state, &mut self.visitor)
    }
}

/// Expands the input argument into concrete paths.
///
/// Anything containing `*` or `?` is treated as a glob pattern; matches are
/// returned in sorted order.
pub fn resolve_input_paths(pattern: &str) -> Result<Vec<PathBuf>, ConvertError> {
    if !(pattern.contains('*') || pattern.contains('?')) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let mut paths: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(ConvertError::NoInput(pattern.to_string()));
    }
    Ok(paths)
}

fn open_input_stream(path: &Path, compression: CompressionMode) -> Result<PgnInput, ConvertError> {
    let file = File::open(path).map_err(|source| ConvertError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    match compression {
        CompressionMode::Plain => Ok(Box::new(file)),
        CompressionMode::Zstd => ZstdDecoder::new(file)
            .map(|decoder| Box::new(decoder) as PgnInput)
            .map_err(|source| ConvertError::Open {
                path: path.to_path_buf(),
                source,
            }),
    }
}

/// Reads games from one or more PGN files as a single concatenated stream.
///
/// The first file is opened on construction; later files are opened as the
/// previous one runs dry. Failing to open any of them is fatal.
pub struct PgnSource {
    paths: Vec<PathBuf>,
    compression: CompressionMode,
    next_path_idx: usize,
    current: Option<PgnReaderState<PgnInput>>,
    visitor: GameVisitor,
}

impl PgnSource {
    pub fn open(pattern: &str, compression: CompressionMode) -> Result<Self, ConvertError> {
        let paths = resolve_input_paths(pattern)?;
        let mut source = Self {
            paths,
            compression,
            next_path_idx: 0,
            current: None,
            visitor: GameVisitor::new(),
        };
        source.current = source.acquire_reader()?;
        Ok(source)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn acquire_reader(&mut self) -> Result<Option<PgnReaderState<PgnInput>>, ConvertError> {
        let Some(path) = self.paths.get(self.next_path_idx) else {
            return Ok(None);
        };
        self.next_path_idx += 1;

        let input = open_input_stream(path, self.compression)?;
        log::debug(format!("Opened input '{}'", path.display()));
        Ok(Some(PgnReaderState::new(
            input,
            path.display().to_string(),
        )))
    }
}

impl GameSource for PgnSource {
    fn next_game(&mut self) -> Result<Option<RawGame>, ConvertError> {
        loop {
            let Some(reader) = self.current.as_mut() else {
                return Ok(None);
            };

            if let Some(game) = read_next_game(reader, &mut self.visitor)? {
                return Ok(Some(game));
            }

            self.current = self.acquire_reader()?;
        }
    }
}
