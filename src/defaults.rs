//! Default values for mdlr.
//!
//! This module provides the well-known names and fallbacks shared by the
//! library and the CLI, ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

/// File name of the manifest at the project root.
pub const MANIFEST_FILENAME: &str = "mdlr.yml";

/// Commit value meaning "track the branch tip".
pub const HEAD: &str = "HEAD";

/// Branch used by `mdlr add` when none is given.
pub const DEFAULT_BRANCH: &str = "main";

/// Module type used by `mdlr add` when none is given.
pub const DEFAULT_MODULE_TYPE: &str = "git";

/// Returns the manifest path for a project rooted at `dir`.
pub fn manifest_path_in(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILENAME)
}

/// Locates the manifest governing `start`.
///
/// Walks from `start` up through its ancestors and returns the first
/// `mdlr.yml` found. Falls back to `start/mdlr.yml` when no ancestor has one,
/// so that a later load reports the missing manifest at the expected place.
pub fn find_manifest(start: &Path) -> PathBuf {
    start
        .ancestors()
        .map(manifest_path_in)
        .find(|candidate| candidate.is_file())
        .unwrap_or_else(|| manifest_path_in(start))
}
