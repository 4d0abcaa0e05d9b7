//! # Version-Control Backend
//!
//! Modules never shell out to git themselves. They go through the
//! [`VcsBackend`] trait, which captures the handful of capabilities the
//! manifest lifecycle needs: clone, fetch, checkout, resolve a revision and
//! inspect local state.
//!
//! In the main application [`GitBackend`] is used, which wraps the system
//! `git` command (see [`crate::git`]). Tests swap in a mock implementation to
//! drive every success and failure path without a real repository or network.

use std::path::Path;

use crate::error::Result;
use crate::module::ModuleStatus;

/// Trait for version-control operations - allows mocking in tests
pub trait VcsBackend {
    /// Clones `url` into `dest`, checking out `branch`.
    ///
    /// A `depth` of 0 requests full history.
    fn clone_repo(&self, url: &str, dest: &Path, branch: &str, depth: u32) -> Result<()>;

    /// Fetches the latest history of `branch` from the checkout's remote.
    fn fetch(&self, dest: &Path, branch: &str) -> Result<()>;

    /// Moves the working tree at `dest` to `revision`.
    fn checkout(&self, dest: &Path, revision: &str) -> Result<()>;

    /// Resolves `reference` (branch, tag, remote ref or commit) to a concrete
    /// revision id.
    fn resolve_revision(&self, dest: &Path, reference: &str) -> Result<String>;

    /// Reports how the checkout at `dest` relates to `target` without any
    /// network access. A missing checkout yields [`ModuleStatus::Missing`].
    fn local_status(&self, dest: &Path, target: &str) -> Result<ModuleStatus>;
}

/// The default implementation of `VcsBackend`, which uses the system's `git`
/// command to perform real operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitBackend;

impl VcsBackend for GitBackend {
    fn clone_repo(&self, url: &str, dest: &Path, branch: &str, depth: u32) -> Result<()> {
        crate::git::clone(url, dest, branch, depth)
    }

    fn fetch(&self, dest: &Path, branch: &str) -> Result<()> {
        crate::git::fetch(dest, branch)
    }

    fn checkout(&self, dest: &Path, revision: &str) -> Result<()> {
        crate::git::checkout(dest, revision)
    }

    fn resolve_revision(&self, dest: &Path, reference: &str) -> Result<String> {
        crate::git::rev_parse(dest, reference)
    }

    fn local_status(&self, dest: &Path, target: &str) -> Result<ModuleStatus> {
        crate::git::local_status(dest, target)
    }
}
