//! Command-line interface for the floatext demo binary
//!
//! Supports both graphical (default) and headless modes.

use clap::Parser;
use std::path::PathBuf;

/// Floating text and tooltip effect showcase
#[derive(Parser, Debug)]
#[command(name = "floatext")]
#[command(about = "Floating text and tooltip effect showcase")]
#[command(version)]
pub struct Args {
    /// Run in headless mode with the specified JSON effect script
    #[arg(long, value_name = "SCRIPT_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for the effect log (headless mode only)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Random seed for deterministic smoke mirroring (headless mode only)
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
