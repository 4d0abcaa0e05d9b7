//! # Init Command Implementation
//!
//! Creates an empty `mdlr.yml`. Refuses to touch a manifest that already
//! exists, and surfaces a broken one instead of replacing it.

use anyhow::Result;
use clap::Args;

use mdlr::output::Marker;
use mdlr::suggestions::with_hints;

use super::GlobalArgs;

/// Create an empty manifest
#[derive(Args, Debug)]
pub struct InitArgs {}

/// Execute the `init` command.
pub fn execute(_args: InitArgs, globals: &GlobalArgs) -> Result<()> {
    let mut ctx = globals.context(true)?;
    ctx.init().map_err(with_hints)?;

    println!(
        "{} Created {}",
        globals.output.marker(Marker::Done),
        ctx.manifest_path().display()
    );
    println!(
        "{} Run `mdlr add <NAME> <URL>` to register a module",
        globals.output.marker(Marker::Hint)
    );
    Ok(())
}
