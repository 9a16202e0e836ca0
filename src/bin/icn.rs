use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use infinite_chess_core::batch::{validate_batch, validate_batch_with_threads};
use infinite_chess_core::config::EngineConfig;
use infinite_chess_core::notation;
use infinite_chess_core::variants::BuiltInVariants;
use infinite_chess_core::{logging, Coord};

#[derive(Parser)]
#[command(name = "icn", about = "Validate and inspect Infinite Chess Notation records")]
struct Cli {
    /// JSON engine configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay every record (one per line) and report the ones that fail.
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the legal moves of the piece on a square after replaying a record.
    Moves {
        file: PathBuf,
        /// Square as `x,y`.
        #[arg(long, allow_hyphen_values = true)]
        at: Coord,
    },
    /// Decode and replay a record, then print it encoded again.
    Roundtrip { file: PathBuf },
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    logging::init(config.log_filter());

    match cli.command {
        Command::Validate { files } => {
            let mut inputs = Vec::new();
            for path in &files {
                inputs.extend(
                    read(path)?
                        .lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(str::to_string),
                );
            }
            let report = match config.batch_threads {
                Some(threads) => {
                    validate_batch_with_threads(&inputs, &BuiltInVariants, &config, threads)?
                }
                None => validate_batch(&inputs, &BuiltInVariants, &config),
            };
            for failure in &report.failures {
                println!("record {}: {}", failure.index + 1, failure.error);
            }
            println!("{}/{} records valid", report.valid, report.total);
            if !report.all_valid() {
                bail!("{} record(s) failed", report.failures.len());
            }
        }
        Command::Moves { file, at } => {
            let record = notation::decode(read(&file)?.trim())?;
            let mut game = record.to_game_with(&BuiltInVariants, &config)?;
            let Some(piece) = game.position().piece_at(at) else {
                bail!("no piece on {at}");
            };
            let moves = game.legal_moves(at)?;
            println!("{piece} on {at}:");
            for d in &moves.individual {
                match d.special {
                    Some(flag) => println!("  {} {:?}", d.coord, flag),
                    None => println!("  {}", d.coord),
                }
            }
            for (dir, extent) in &moves.sliding {
                let fmt = |b: Option<i64>| b.map_or_else(|| "inf".to_string(), |v| v.to_string());
                println!("  ray {dir} steps {}..{}", fmt(extent.min), fmt(extent.max));
            }
        }
        Command::Roundtrip { file } => {
            let record = notation::decode(read(&file)?.trim())?;
            let game = record.to_game_with(&BuiltInVariants, &config)?;
            println!("{}", notation::encode(&record)?);
            if let Some(c) = game.conclusion() {
                println!("concluded: {:?} ({:?})", c.reason, c.victor);
            }
        }
    }
    Ok(())
}
