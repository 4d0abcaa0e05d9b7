//! # Modules
//!
//! A [`Module`] binds one external repository to a location inside the host
//! project: where it lives, which remote it comes from, and which branch and
//! commit it should sit at. The commit value `HEAD` means "track the branch
//! tip" and is never replaced by a concrete id unless the caller pins one.
//!
//! Modules validate themselves and drive their own checkout through a
//! [`VcsBackend`], but they never persist anything. Persistence belongs to
//! the [`crate::manifest::Manifest`] that owns them.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::backend::VcsBackend;
use crate::defaults::HEAD;
use crate::error::{Error, Result};

/// Length of the revision prefix shown in detailed status output.
const SHORT_REVISION_LEN: usize = 12;

/// URL schemes accepted for a module remote.
const ALLOWED_SCHEMES: [&str; 5] = ["https", "http", "ssh", "git", "file"];

/// The kind of backend a module is checked out with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    /// A plain git checkout.
    Git,
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleType::Git => f.write_str("git"),
        }
    }
}

impl FromStr for ModuleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "git" => Ok(ModuleType::Git),
            other => Err(Error::Validation {
                field: ValidationField::Type,
                message: format!("unsupported module type '{other}' (supported: git)"),
            }),
        }
    }
}

/// The module field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationField {
    Name,
    Type,
    Path,
    Url,
    Branch,
}

impl fmt::Display for ValidationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValidationField::Name => "name",
            ValidationField::Type => "type",
            ValidationField::Path => "path",
            ValidationField::Url => "url",
            ValidationField::Branch => "branch",
        };
        f.write_str(label)
    }
}

/// Local synchronization state of a module checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    /// No checkout on disk.
    Missing,
    UpToDate,
    /// Local commits not present in the target.
    Ahead,
    /// The target has commits the checkout lacks.
    Behind,
    Diverged,
    /// Uncommitted local changes.
    Dirty,
}

impl ModuleStatus {
    /// Compact label used in CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            ModuleStatus::Missing => "missing",
            ModuleStatus::UpToDate => "up-to-date",
            ModuleStatus::Ahead => "ahead",
            ModuleStatus::Behind => "behind",
            ModuleStatus::Diverged => "diverged",
            ModuleStatus::Dirty => "dirty",
        }
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn default_commit() -> String {
    HEAD.to_string()
}

fn is_full_history(depth: &u32) -> bool {
    *depth == 0
}

/// One external repository tracked in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Unique key in the manifest. Set by [`Module::prepare`], never persisted
    /// as a field because the manifest mapping key carries it.
    #[serde(skip)]
    name: String,
    /// Backend kind.
    #[serde(rename = "type")]
    pub kind: ModuleType,
    /// Location relative to the project root.
    pub path: String,
    /// Remote the checkout is cloned from.
    pub url: String,
    /// Branch the checkout follows.
    pub branch: String,
    /// Revision to check out, or `HEAD` to track the branch tip.
    #[serde(default = "default_commit")]
    pub commit: String,
    /// Shallow clone depth; 0 means full history.
    #[serde(default, skip_serializing_if = "is_full_history")]
    pub depth: u32,
    #[serde(skip)]
    absolute_path: PathBuf,
}

impl Module {
    /// Creates an unprepared module. An empty `commit` becomes `HEAD`.
    pub fn new(
        kind: ModuleType,
        path: impl Into<String>,
        url: impl Into<String>,
        branch: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        let commit = commit.into();
        Self {
            name: String::new(),
            kind,
            path: path.into(),
            url: url.into(),
            branch: branch.into(),
            commit: if commit.is_empty() {
                default_commit()
            } else {
                commit
            },
            depth: 0,
            absolute_path: PathBuf::new(),
        }
    }

    /// Sets the shallow clone depth.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location of the checkout on disk, `parent_directory/path`.
    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// True when the module follows the branch tip rather than a pinned commit.
    pub fn is_tracking_head(&self) -> bool {
        self.commit == HEAD
    }

    /// Binds the module to its manifest key and project root.
    pub fn prepare(&mut self, name: &str, parent_directory: &Path) {
        self.name = name.to_string();
        self.absolute_path = resolve_under(parent_directory, &self.path);
    }

    /// Checks the fields a module needs before it can be accepted.
    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(invalid(ValidationField::Name, "must not be empty"));
        }
        if name.len() != self.name.len() || name.chars().any(char::is_whitespace) {
            return Err(invalid(ValidationField::Name, "must not contain whitespace"));
        }

        validate_path(&self.path)?;

        if self.url.trim().is_empty() {
            return Err(invalid(ValidationField::Url, "must not be empty"));
        }
        if !is_valid_remote(&self.url) {
            return Err(invalid(
                ValidationField::Url,
                &format!(
                    "'{}' is not a valid remote (expected {} URL or user@host:path)",
                    self.url,
                    ALLOWED_SCHEMES.join("/")
                ),
            ));
        }

        if self.branch.trim().is_empty() {
            return Err(invalid(ValidationField::Branch, "must not be empty"));
        }
        Ok(())
    }

    /// Acquires a fresh checkout at [`Module::absolute_path`].
    ///
    /// Clones `branch` with the given `depth`, then checks out `commit` unless
    /// it is `HEAD`. An existing checkout is an error; removing it first is the
    /// caller's job.
    pub fn import(
        &self,
        backend: &dyn VcsBackend,
        branch: &str,
        commit: &str,
        depth: u32,
    ) -> Result<()> {
        let dest = self.absolute_path.as_path();
        if dest.exists() {
            return Err(self.import_error(Error::AlreadyExists {
                path: dest.to_path_buf(),
            }));
        }

        backend
            .clone_repo(&self.url, dest, branch, depth)
            .map_err(|e| self.import_error(e))?;
        if !commit.is_empty() && commit != HEAD {
            backend
                .checkout(dest, commit)
                .map_err(|e| self.import_error(e))?;
        }
        Ok(())
    }

    /// Synchronizes an existing checkout to `branch` and `commit`.
    ///
    /// Fetches `branch`, resolves `commit` (`HEAD` meaning the fetched branch
    /// tip) and checks the result out. Returns the concrete revision id.
    pub fn update(&self, backend: &dyn VcsBackend, branch: &str, commit: &str) -> Result<String> {
        let dest = self.absolute_path.as_path();
        if !dest.exists() {
            return Err(self.update_error(Error::CheckoutMissing {
                path: dest.to_path_buf(),
            }));
        }

        backend
            .fetch(dest, branch)
            .map_err(|e| self.update_error(e))?;
        let reference = if commit.is_empty() || commit == HEAD {
            format!("origin/{branch}")
        } else {
            commit.to_string()
        };
        let revision = backend
            .resolve_revision(dest, &reference)
            .map_err(|e| self.update_error(e))?;
        backend
            .checkout(dest, &revision)
            .map_err(|e| self.update_error(e))?;
        Ok(revision)
    }

    /// Reports the local state of the checkout.
    ///
    /// The compact form is just the state label. The verbose form appends the
    /// short local revision, e.g. `behind (1a2b3c4d5e6f)`.
    pub fn status(&self, backend: &dyn VcsBackend, verbose: bool) -> Result<String> {
        let state = backend.local_status(&self.absolute_path, &self.status_target())?;
        if !verbose || state == ModuleStatus::Missing {
            return Ok(state.to_string());
        }

        let revision = backend.resolve_revision(&self.absolute_path, HEAD)?;
        let short: String = revision.chars().take(SHORT_REVISION_LEN).collect();
        Ok(format!("{} ({})", state, short))
    }

    /// The reference local state is compared against.
    fn status_target(&self) -> String {
        if self.is_tracking_head() {
            format!("origin/{}", self.branch)
        } else {
            self.commit.clone()
        }
    }

    fn import_error(&self, source: Error) -> Error {
        Error::Import {
            name: self.name.clone(),
            source: Box::new(source),
        }
    }

    fn update_error(&self, source: Error) -> Error {
        Error::Update {
            name: self.name.clone(),
            source: Box::new(source),
        }
    }
}

fn invalid(field: ValidationField, message: &str) -> Error {
    Error::Validation {
        field,
        message: message.to_string(),
    }
}

/// Joins `relative` onto `root`, dropping `.` components.
pub fn resolve_under(root: &Path, relative: &str) -> PathBuf {
    Path::new(relative)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .fold(root.to_path_buf(), |acc, c| acc.join(c.as_os_str()))
}

fn validate_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(ValidationField::Path, "must not be empty"));
    }

    let mut depth = 0usize;
    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(invalid(
                    ValidationField::Path,
                    "must not contain '..' components",
                ))
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid(
                    ValidationField::Path,
                    "must be relative to the project root",
                ))
            }
        }
    }

    if depth == 0 {
        return Err(invalid(
            ValidationField::Path,
            "must name a directory below the project root",
        ));
    }
    Ok(())
}

fn scp_like() -> Option<&'static Regex> {
    static SCP_LIKE: OnceLock<Option<Regex>> = OnceLock::new();
    SCP_LIKE
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+@[A-Za-z0-9.-]+:[A-Za-z0-9._~/-]+$").ok())
        .as_ref()
}

/// Returns true when `url` is something a git remote can point at.
pub fn is_valid_remote(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            ALLOWED_SCHEMES.contains(&parsed.scheme())
                && (parsed.scheme() == "file" || parsed.host_str().is_some_and(|h| !h.is_empty()))
        }
        Err(_) => scp_like().is_some_and(|re| re.is_match(url)),
    }
}
