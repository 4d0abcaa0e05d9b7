//! # Import Command Implementation
//!
//! Clones module checkouts at the branch, commit and depth recorded in the
//! manifest. Stops at the first module that fails.

use anyhow::Result;
use clap::Args;

use mdlr::output::Marker;
use mdlr::suggestions::with_hints;

use super::GlobalArgs;

/// Clone module checkouts
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Only import this module (default: all modules)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Delete existing checkouts before cloning
    #[arg(long)]
    pub force: bool,
}

/// Execute the `import` command.
pub fn execute(args: ImportArgs, globals: &GlobalArgs) -> Result<()> {
    let mut ctx = globals.context(false)?;
    ctx.import(args.name.as_deref(), args.force)
        .map_err(with_hints)?;

    let what = match &args.name {
        Some(name) => format!("module {name}"),
        None => "all modules".to_string(),
    };
    println!("{} Imported {}", globals.output.marker(Marker::Imported), what);
    Ok(())
}
