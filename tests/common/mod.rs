//! Shared test utilities for E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().initialized();
//!     fixture.command().arg("list").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    #[allow(unused_imports)]
    pub use super::GitRemote;
    pub use super::TestFixture;
}

/// Manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// Two modules, neither checked out.
    pub const TWO_MODULES: &str = r#"modules:
  docs:
    type: git
    path: docs
    url: https://example.com/docs.git
    branch: main
    commit: HEAD
  core:
    type: git
    path: ./core
    url: https://example.com/core.git
    branch: main
    commit: HEAD
"#;

    /// Not valid YAML.
    pub const INVALID_YAML: &str = "modules: [unclosed";
}

/// A temporary project directory to run `mdlr` in.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Run `mdlr init` in the fixture.
    pub fn initialized(self) -> Self {
        self.command().arg("init").assert().success();
        self
    }

    /// Write `mdlr.yml` with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("mdlr.yml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.temp_dir.path().join("mdlr.yml")
    }

    /// Current manifest content.
    pub fn manifest(&self) -> String {
        std::fs::read_to_string(self.manifest_path()).expect("Failed to read manifest")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    ///
    /// `MDLR_FILE` and `RUST_LOG` are cleared so the caller's environment
    /// cannot leak into the test.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mdlr");
        cmd.current_dir(self.path())
            .env_remove("MDLR_FILE")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true when a usable `git` executable is on `PATH`.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

/// A local git repository acting as a module remote.
///
/// Commits are made on `main`; clones reach it through a `file://` URL.
#[allow(dead_code)]
pub struct GitRemote {
    dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl GitRemote {
    /// Creates a remote with one commit on `main`, or `None` if git is
    /// unavailable.
    pub fn new() -> Option<Self> {
        if !git_available() {
            eprintln!("git not available, skipping");
            return None;
        }

        let remote = Self {
            dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        };
        remote.git(&["init", "--quiet"]);
        remote.git(&["checkout", "--quiet", "-B", "main"]);
        remote.git(&["config", "user.email", "test@example.com"]);
        remote.git(&["config", "user.name", "Test User"]);
        remote.git(&["config", "commit.gpgsign", "false"]);
        remote.commit("README.md", "# remote\n", "Initial commit");
        Some(remote)
    }

    pub fn url(&self) -> String {
        format!("file://{}", self.dir.path().display())
    }

    /// Writes `path` and commits it on the current branch. Returns the new
    /// commit id.
    pub fn commit(&self, path: &str, content: &str, message: &str) -> String {
        self.dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self.git(&["add", "."]);
        self.git(&["commit", "--quiet", "-m", message]);
        self.head()
    }

    /// Creates `branch` at the current commit and switches to it.
    pub fn branch(&self, branch: &str) {
        self.git(&["checkout", "--quiet", "-b", branch]);
    }

    pub fn switch(&self, branch: &str) {
        self.git(&["checkout", "--quiet", branch]);
    }

    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"])
    }

    fn git(&self, args: &[&str]) -> String {
        git_in(self.dir.path(), args)
    }
}

/// Runs git in `dir`, panicking on failure, and returns trimmed stdout.
#[allow(dead_code)]
pub fn git_in(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest(manifests::TWO_MODULES);
        assert!(fixture.manifest_path().exists());
    }

    #[test]
    fn test_manifest_snippets_are_valid_yaml() {
        let parsed: Result<serde_yaml::Value, _> = serde_yaml::from_str(manifests::TWO_MODULES);
        assert!(parsed.is_ok());
    }
}
