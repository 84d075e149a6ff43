use crate::error::ConvertError;
use std::path::PathBuf;

pub const DEFAULT_MAX_GAMES: usize = 10_000;
pub const DEFAULT_INPUT: &str = "chess.pgn";
pub const DEFAULT_OUTPUT: &str = "games.json";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CompressionMode {
    #[default]
    Plain,
    Zstd,
}

impl CompressionMode {
    pub fn parse(raw: &str) -> Result<Self, ConvertError> {
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(ConvertError::Config(
                "Invalid compression value ''. Supported values: 'zstd' or omitted.".to_string(),
            ));
        }

        if normalized.eq_ignore_ascii_case("zstd") {
            Ok(Self::Zstd)
        } else {
            Err(ConvertError::Config(format!(
                "Invalid compression value '{}'. Supported values: 'zstd' or omitted.",
                normalized
            )))
        }
    }
}

/// Parameters of one conversion run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertConfig {
    /// A single PGN file, or a glob pattern when it contains `*` or `?`.
    pub input: String,
    pub output: PathBuf,
    /// Upper bound on successfully converted games. Failed games do not count.
    pub max_games: usize,
    pub compression: CompressionMode,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            max_games: DEFAULT_MAX_GAMES,
            compression: CompressionMode::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConvertConfig::default();
        assert_eq!(config.input, "chess.pgn");
        assert_eq!(config.output, PathBuf::from("games.json"));
        assert_eq!(config.max_games, 10_000);
        assert_eq!(config.compression, CompressionMode::Plain);
    }

    #[test]
    fn test_parse_compression_mode_zstd_case_insensitive() {
        for raw in ["zstd", "ZSTD", " ZsTd "] {
            assert_eq!(CompressionMode::parse(raw).unwrap(), CompressionMode::Zstd);
        }
    }

    #[test]
    fn test_parse_compression_mode_rejects_empty_value() {
        let err = CompressionMode::parse("  ").unwrap_err();
        assert!(err.to_string().contains("Invalid compression value ''"));
    }

    #[test]
    fn test_parse_compression_mode_rejects_unsupported_value() {
        let err = CompressionMode::parse("gzip").unwrap_err();
        assert!(err.to_string().contains("Invalid compression value 'gzip'"));
        assert!(err.to_string().contains("Supported values: 'zstd'"));
    }
}
