//! # CLI Command Implementations
//!
//! Each `mdlr` subcommand lives in its own file with:
//! - An `Args` struct for its arguments and options, derived using `clap`.
//! - An `execute` function that opens a [`Context`], runs one lifecycle
//!   operation and prints the outcome.
//!
//! Library errors are passed through [`mdlr::suggestions::with_hints`] before
//! they reach `main`, so users see how to fix the problem alongside it.

pub mod add;
pub mod completions;
pub mod import;
pub mod init;
pub mod list;
pub mod remove;
pub mod status;
pub mod update;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use mdlr::context::Context;
use mdlr::defaults;
use mdlr::observer::LogObserver;
use mdlr::output::OutputConfig;

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    /// Explicit manifest location from `--file` or `MDLR_FILE`.
    pub manifest: Option<PathBuf>,
    pub output: OutputConfig,
}

impl GlobalArgs {
    /// Where the manifest lives.
    ///
    /// An explicit path always wins. Otherwise `init` targets the current
    /// directory while every other command searches upward for an existing
    /// manifest.
    pub fn manifest_path(&self, creating: bool) -> Result<PathBuf> {
        if let Some(path) = &self.manifest {
            return Ok(path.clone());
        }
        let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
        Ok(if creating {
            defaults::manifest_path_in(&cwd)
        } else {
            defaults::find_manifest(&cwd)
        })
    }

    /// A context bound to the manifest, using system git and logging events.
    pub fn context(&self, creating: bool) -> Result<Context> {
        let path = self.manifest_path(creating)?;
        log::debug!("using manifest {}", path.display());
        Ok(Context::new(path).with_observer(Box::new(LogObserver)))
    }
}
