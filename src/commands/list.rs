//! # List Command Implementation
//!
//! Prints every registered module in name order together with its detailed
//! local status. Read-only: the manifest is never written.

use anyhow::Result;
use clap::Args;

use mdlr::suggestions::with_hints;

use super::GlobalArgs;

/// List modules with their current status
#[derive(Args, Debug)]
pub struct ListArgs {}

/// Execute the `list` command.
pub fn execute(_args: ListArgs, globals: &GlobalArgs) -> Result<()> {
    let mut ctx = globals.context(false)?;
    let listing = ctx.list().map_err(with_hints)?;
    println!("{listing}");
    Ok(())
}
