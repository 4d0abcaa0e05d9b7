//! # Status Command Implementation
//!
//! Shows how one module checkout relates to what the manifest asks for:
//! `missing`, `up-to-date`, `ahead`, `behind`, `diverged` or `dirty`. No
//! network access is made.

use anyhow::Result;
use clap::Args;

use mdlr::suggestions::with_hints;

use super::GlobalArgs;

/// Show the local state of one module
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Module name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Include the short revision of the checkout
    #[arg(short, long)]
    pub verbose: bool,
}

/// Execute the `status` command.
pub fn execute(args: StatusArgs, globals: &GlobalArgs) -> Result<()> {
    let mut ctx = globals.context(false)?;
    let status = ctx.status(&args.name, args.verbose).map_err(with_hints)?;
    println!("{}", globals.output.status(&status));
    Ok(())
}
