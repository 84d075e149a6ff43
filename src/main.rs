use clap::Parser;
use pgn2json::config::{
    CompressionMode, ConvertConfig, DEFAULT_INPUT, DEFAULT_MAX_GAMES, DEFAULT_OUTPUT,
};
use pgn2json::{log, run};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert PGN chess games into a JSON array of records.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Input PGN file, or a glob pattern matching several files
    #[arg(default_value = DEFAULT_INPUT)]
    input: String,

    /// Output JSON file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Stop after this many successfully converted games
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_GAMES)]
    max_games: usize,

    /// Input compression [possible values: zstd]
    #[arg(long, value_parser = CompressionMode::parse)]
    compression: Option<CompressionMode>,
}

impl Args {
    fn into_config(self) -> ConvertConfig {
        ConvertConfig {
            input: self.input,
            output: self.output,
            max_games: self.max_games,
            compression: self.compression.unwrap_or_default(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args.into_config()) {
        Ok(result) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = result.report(&mut stdout) {
                log::error(format!("Failed to print report: {e}"));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error(e.to_string());
            ExitCode::FAILURE
        }
    }
}
