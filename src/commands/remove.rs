//! # Remove Command Implementation
//!
//! Unregisters a module. The checkout stays on disk unless `--drop-files` is
//! given.

use anyhow::Result;
use clap::Args;

use mdlr::output::Marker;
use mdlr::suggestions::with_hints;

use super::GlobalArgs;

/// Unregister a module
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Module name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Also delete the module checkout from disk
    #[arg(long)]
    pub drop_files: bool,
}

/// Execute the `remove` command.
pub fn execute(args: RemoveArgs, globals: &GlobalArgs) -> Result<()> {
    let mut ctx = globals.context(false)?;
    ctx.remove(&args.name, args.drop_files).map_err(with_hints)?;

    let suffix = if args.drop_files {
        " and deleted its files"
    } else {
        ""
    };
    println!(
        "{} Removed module {}{}",
        globals.output.marker(Marker::Done),
        args.name,
        suffix
    );
    Ok(())
}
