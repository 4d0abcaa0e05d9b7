//! # Update Command Implementation
//!
//! Fetches module remotes and moves checkouts to the requested branch and
//! commit, then records the result in the manifest.
//!
//! ## Bookkeeping
//!
//! - Without `--branch`, each module keeps its recorded branch.
//! - Without `--commit` (or with `HEAD`), modules tracking `HEAD` keep
//!   tracking it; pinned modules are re-pinned to the new branch tip.
//! - With `--commit`, the resolved revision is recorded.
//! - `--force` re-clones the checkouts first.

use anyhow::Result;
use clap::Args;

use mdlr::defaults::HEAD;
use mdlr::output::Marker;
use mdlr::suggestions::with_hints;

use super::GlobalArgs;

/// Fetch and move module checkouts to their branch or commit
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Only update this module (default: all modules)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Switch to this branch instead of the recorded one
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Move to this commit instead of the branch tip
    #[arg(short, long, default_value = HEAD)]
    pub commit: String,

    /// Re-clone checkouts before updating
    #[arg(long)]
    pub force: bool,
}

/// Execute the `update` command.
pub fn execute(args: UpdateArgs, globals: &GlobalArgs) -> Result<()> {
    let mut ctx = globals.context(false)?;
    ctx.update(
        args.name.as_deref(),
        args.branch.as_deref().unwrap_or_default(),
        &args.commit,
        args.force,
    )
    .map_err(with_hints)?;

    let what = match &args.name {
        Some(name) => format!("module {name}"),
        None => "all modules".to_string(),
    };
    println!("{} Updated {}", globals.output.marker(Marker::Updated), what);
    Ok(())
}
