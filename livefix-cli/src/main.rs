use std::{io, path::PathBuf};

use anyhow::{bail, Result};
use clap::Parser;
use exiftool::Exiftool;
use livefix_lib::repair::{RepairConfig, Repairer};
use livefix_util::CanonicalizedDirBuf;
use slog::o;
use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::Severity;
use sloggers::Build;

/// Restore the link between Live Photo images and their videos.
///
/// Finds short `.mov` videos that sit next to a `.HEIC` photo of the same name but lack the
/// photo's ContentIdentifier, and copies the identifier onto them with exiftool.
///
/// WARNING: repaired videos are overwritten in place, no backup is kept.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory containing IMG_xxxx.HEIC and IMG_xxxx.mov files
    directory: CanonicalizedDirBuf,
    /// exiftool executable to run
    #[arg(long, default_value = "exiftool")]
    exiftool: PathBuf,
    /// Also scan subdirectories
    #[arg(long)]
    recursive: bool,
    /// Report files that fail to repair at the end instead of stopping at the first one
    #[arg(long)]
    keep_going: bool,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let logger = TerminalLoggerBuilder::new()
        .destination(Destination::Stderr)
        .level(if args.verbose {
            Severity::Debug
        } else {
            Severity::Info
        })
        .build()?;

    let exiftool = Exiftool::new(&args.exiftool)
        .with_recursive(args.recursive)
        .with_logger(logger.new(o!("component" => "exiftool")));
    let repairer = Repairer::new(exiftool)
        .with_config(RepairConfig {
            keep_going: args.keep_going,
        })
        .with_logger(logger);

    let directory: PathBuf = args.directory.into();
    println!("Get metadata for {}", directory.display());
    let summary = repairer.run(&directory, &mut io::stdout().lock())?;
    println!("{summary}");

    if !summary.failures.is_empty() {
        bail!("{} file(s) could not be repaired", summary.failures.len());
    }
    Ok(())
}
