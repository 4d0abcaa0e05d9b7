//! # mdlr CLI
//!
//! This is the binary entry point for the `mdlr` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and output preferences.
//! - Dispatching to the command implementations and turning library errors
//!   into user-friendly output.
//!
//! All manifest logic lives in the `mdlr` library crate; the binary is a thin
//! wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
