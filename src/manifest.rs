//! # Manifest
//!
//! The manifest is the project's module registry, stored as `mdlr.yml` at the
//! project root:
//!
//! ```yaml
//! modules:
//!   core:
//!     type: git
//!     path: ./core
//!     url: https://example.com/core.git
//!     branch: main
//!     commit: HEAD
//! ```
//!
//! Modules are kept in a `BTreeMap`, so listing and batch operations always
//! visit them in lexicographic name order.
//!
//! Writes are atomic: the new content goes to a temporary file in the same
//! directory which is then renamed over the old manifest. A failed write
//! leaves the previous manifest untouched.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::module::Module;

/// The on-disk document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    modules: BTreeMap<String, Module>,
}

/// The in-memory registry bound to one manifest file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    /// Modules keyed by unique name.
    pub modules: BTreeMap<String, Module>,
    parent_directory: PathBuf,
    path: PathBuf,
}

impl Manifest {
    /// Reads the manifest at `path`.
    ///
    /// Fails with [`Error::ManifestNotFound`] when there is no file and with
    /// [`Error::InvalidFormat`] when it cannot be parsed. Every module comes
    /// back prepared, with its name and absolute path filled in.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ManifestNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let document = if content.trim().is_empty() {
            Document::default()
        } else {
            serde_yaml::from_str::<Option<Document>>(&content)
                .map_err(|e| Error::InvalidFormat {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?
                .unwrap_or_default()
        };

        let mut manifest = Self::prepare(path);
        manifest.modules = document.modules;
        let parent = manifest.parent_directory.clone();
        for (name, module) in manifest.modules.iter_mut() {
            module.prepare(name, &parent);
        }
        Ok(manifest)
    }

    /// Creates an empty manifest bound to `path` without touching disk.
    pub fn prepare(path: &Path) -> Self {
        let parent_directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self {
            modules: BTreeMap::new(),
            parent_directory,
            path: path.to_path_buf(),
        }
    }

    /// Writes the full manifest to its bound path, replacing the old file
    /// atomically.
    pub fn persist(&self) -> Result<()> {
        let write_error = |source: io::Error| Error::Write {
            path: self.path.clone(),
            source,
        };

        let document = Document {
            modules: self.modules.clone(),
        };
        let yaml = serde_yaml::to_string(&document)
            .map_err(|e| write_error(io::Error::other(e)))?;

        let mut tmp = NamedTempFile::new_in(&self.parent_directory).map_err(write_error)?;
        tmp.write_all(yaml.as_bytes()).map_err(write_error)?;
        if let Some(permissions) = self.target_permissions().map_err(write_error)? {
            tmp.as_file()
                .set_permissions(permissions)
                .map_err(write_error)?;
        }
        tmp.as_file().sync_all().map_err(write_error)?;
        tmp.persist(&self.path).map_err(|e| write_error(e.error))?;
        Ok(())
    }

    /// Permissions the written manifest should end up with.
    ///
    /// The temporary file is created owner-only, so an existing manifest's
    /// mode is carried over and a new one gets 0644 on unix.
    fn target_permissions(&self) -> io::Result<Option<fs::Permissions>> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(meta.permissions())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(default_permissions()),
            Err(e) => Err(e),
        }
    }

    /// The project root every module path is relative to.
    pub fn parent_directory(&self) -> &Path {
        &self.parent_directory
    }

    /// The manifest file this registry is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Names of all modules in iteration order.
    pub fn names(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    /// Returns the module, other than `except`, that already uses `path`.
    pub fn path_owner(&self, path: &Path, except: &str) -> Option<&str> {
        self.modules
            .iter()
            .find(|(name, module)| name.as_str() != except && module.absolute_path() == path)
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
