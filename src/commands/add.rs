//! # Add Command Implementation
//!
//! Registers a new module in the manifest. Nothing is cloned; run
//! `mdlr import` afterwards to acquire the checkout.
//!
//! ## Defaults
//!
//! - `--path` defaults to the module name
//! - `--branch` defaults to `main`
//! - `--commit` defaults to `HEAD`, which tracks the branch tip
//! - `--depth 0` clones full history

use anyhow::Result;
use clap::Args;

use mdlr::context::NewModule;
use mdlr::defaults::{DEFAULT_BRANCH, DEFAULT_MODULE_TYPE, HEAD};
use mdlr::output::Marker;
use mdlr::suggestions::with_hints;

use super::GlobalArgs;

/// Register a new module in the manifest
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Unique module name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Remote URL (https, ssh, git, file or user@host:path)
    #[arg(value_name = "URL")]
    pub url: String,

    /// Checkout location relative to the manifest directory
    #[arg(short, long, value_name = "PATH")]
    pub path: Option<String>,

    /// Module type
    #[arg(short = 't', long = "type", value_name = "TYPE", default_value = DEFAULT_MODULE_TYPE)]
    pub kind: String,

    /// Branch to follow
    #[arg(short, long, default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Commit to pin, or HEAD to track the branch tip
    #[arg(short, long, default_value = HEAD)]
    pub commit: String,

    /// Shallow clone depth (0 for full history)
    #[arg(short, long, default_value_t = 0)]
    pub depth: u32,
}

/// Execute the `add` command.
pub fn execute(args: AddArgs, globals: &GlobalArgs) -> Result<()> {
    let path = args.path.unwrap_or_else(|| args.name.clone());
    let request = NewModule {
        name: args.name,
        kind: args.kind,
        path,
        url: args.url,
        branch: args.branch,
        commit: args.commit,
        depth: args.depth,
    };
    let name = request.name.clone();
    let path = request.path.clone();

    let mut ctx = globals.context(false)?;
    ctx.add(request).map_err(with_hints)?;

    println!(
        "{} Added module {} at {}",
        globals.output.marker(Marker::Done),
        name,
        path
    );
    println!(
        "{} Run `mdlr import {}` to clone it",
        globals.output.marker(Marker::Hint),
        name
    );
    Ok(())
}
