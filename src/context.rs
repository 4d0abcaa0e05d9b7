//! # Lifecycle Manager
//!
//! [`Context`] owns the single [`Manifest`] of one command invocation and
//! sequences every operation on it: load (or create), validate and mutate,
//! drive module checkouts through the backend, then persist.
//!
//! ## State
//!
//! A context starts unloaded and loads its manifest at most once. Every public
//! operation performs that load itself, so a context serves exactly one
//! operation; calling a second one fails with [`Error::AlreadyLoaded`].
//!
//! ## Failure policy
//!
//! - Lookup and validation errors are raised before anything is mutated.
//! - Batch `import`/`update` walk modules in name order and stop at the first
//!   failure. The manifest is only persisted after the whole batch succeeds;
//!   checkouts already touched by the batch are not rolled back.
//! - `remove` with `drop_files` persists the removal even when deleting the
//!   checkout fails, and then reports the deletion error.
//! - The only error swallowed on purpose is the best-effort deletion before a
//!   forced import, which is reported to the observer instead.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::backend::{GitBackend, VcsBackend};
use crate::defaults::{HEAD, MANIFEST_FILENAME};
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::module::{Module, ModuleType, ValidationField};
use crate::observer::{Event, NoopObserver, Observer};
use crate::suggestions;

/// Message returned by [`Context::list`] when there is nothing to list.
pub const EMPTY_LIST_MESSAGE: &str = "There aren't any modules defined in mdlr.yml yet. \
Run 'mdlr add <NAME> <URL>' to add a module.";

/// Everything needed to register a new module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewModule {
    pub name: String,
    /// Backend kind, e.g. `git`.
    pub kind: String,
    pub path: String,
    pub url: String,
    pub branch: String,
    /// Revision to pin, or empty / `HEAD` to track the branch tip.
    pub commit: String,
    /// Shallow clone depth, 0 for full history.
    pub depth: u32,
}

/// Orchestrates manifest loading and module operations for one invocation.
pub struct Context {
    manifest_path: PathBuf,
    manifest: Option<Manifest>,
    backend: Box<dyn VcsBackend>,
    observer: Box<dyn Observer>,
}

/// The loaded manifest together with the collaborators operations need.
struct Session<'a> {
    manifest: &'a mut Manifest,
    backend: &'a dyn VcsBackend,
    observer: &'a dyn Observer,
}

impl Context {
    /// Creates an unloaded context for the manifest at `manifest_path`, using
    /// the system git backend and discarding events.
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            manifest: None,
            backend: Box::new(GitBackend),
            observer: Box::new(NoopObserver),
        }
    }

    /// Replaces the version-control backend.
    pub fn with_backend(mut self, backend: Box<dyn VcsBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Replaces the event observer.
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn is_loaded(&self) -> bool {
        self.manifest.is_some()
    }

    /// The loaded manifest, if any operation has loaded it.
    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    fn load(&mut self) -> Result<Session<'_>> {
        if self.manifest.is_some() {
            return Err(Error::AlreadyLoaded);
        }
        if self.manifest_path.as_os_str().is_empty() {
            return Err(Error::InvalidPath {
                message: format!("no path given for {MANIFEST_FILENAME}"),
            });
        }

        let loaded = Manifest::load(&self.manifest_path)?;
        Ok(Session {
            manifest: self.manifest.insert(loaded),
            backend: self.backend.as_ref(),
            observer: self.observer.as_ref(),
        })
    }

    /// Creates an empty manifest.
    ///
    /// Fails with [`Error::AlreadyExists`] when one can already be loaded, and
    /// propagates any load error other than "not found".
    pub fn init(&mut self) -> Result<()> {
        let outcome = self.load().map(|_| ());
        match outcome {
            Ok(()) => {
                return Err(Error::AlreadyExists {
                    path: self.manifest_path.clone(),
                })
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let manifest = self.manifest.insert(Manifest::prepare(&self.manifest_path));
        manifest.persist()?;
        self.observer.notify(&Event::ManifestCreated {
            path: self.manifest_path.clone(),
        });
        Ok(())
    }

    /// Renders every module with its detailed status, in name order.
    ///
    /// An empty manifest yields [`EMPTY_LIST_MESSAGE`] rather than an error.
    pub fn list(&mut self) -> Result<String> {
        let session = self.load()?;
        if session.manifest.is_empty() {
            return Ok(EMPTY_LIST_MESSAGE.to_string());
        }

        let mut out = format!("Modules: {}", session.manifest.modules.len());
        for (index, (name, module)) in session.manifest.modules.iter().enumerate() {
            let status = module
                .status(session.backend, true)
                .unwrap_or_else(|e| {
                    session.observer.notify(&Event::StatusUnavailable {
                        name: name.clone(),
                        message: e.to_string(),
                    });
                    "unknown".to_string()
                });
            out.push_str(&format!(
                "\n{}. {}:{} ({}) {}@{}({}) [current={}]",
                index + 1,
                name,
                module.path,
                module.kind,
                module.url,
                module.branch,
                module.commit,
                status
            ));
        }
        Ok(out)
    }

    /// Registers a new module after validating it.
    pub fn add(&mut self, request: NewModule) -> Result<()> {
        let session = self.load()?;
        if session.manifest.modules.contains_key(&request.name) {
            return Err(Error::NameAlreadyInUse { name: request.name });
        }

        let kind: ModuleType = request.kind.parse()?;
        let mut module = Module::new(
            kind,
            request.path,
            request.url,
            request.branch,
            request.commit,
        )
        .with_depth(request.depth);
        module.prepare(&request.name, session.manifest.parent_directory());
        module.validate()?;
        if let Some(owner) = session
            .manifest
            .path_owner(module.absolute_path(), &request.name)
        {
            return Err(Error::Validation {
                field: ValidationField::Path,
                message: format!("'{}' is already used by module '{}'", module.path, owner),
            });
        }

        session.manifest.modules.insert(request.name.clone(), module);
        session
            .observer
            .notify(&Event::ModuleAdded { name: request.name });
        session.persist()
    }

    /// Unregisters a module, optionally deleting its checkout.
    pub fn remove(&mut self, name: &str, drop_files: bool) -> Result<()> {
        let session = self.load()?;
        session.require_modules()?;
        session.module(name)?;

        let root = session.manifest.parent_directory().to_path_buf();
        let Some(module) = session.manifest.modules.remove(name) else {
            return Err(session.not_exist(name));
        };
        session.observer.notify(&Event::ModuleRemoved {
            name: name.to_string(),
        });

        let cleanup = if drop_files {
            remove_checkout(&root, module.absolute_path()).map(|removed| {
                if removed {
                    session.observer.notify(&Event::CheckoutRemoved {
                        path: module.absolute_path().to_path_buf(),
                    });
                }
            })
        } else {
            Ok(())
        };

        session.persist()?;
        cleanup
    }

    /// Acquires checkouts for one module or, with `name` of `None`, all of
    /// them using each module's recorded branch, commit and depth.
    ///
    /// With `force`, existing checkouts are deleted first (best effort).
    pub fn import(&mut self, name: Option<&str>, force: bool) -> Result<()> {
        let session = self.load()?;
        session.require_modules()?;
        session.import(name, force)?;
        session.persist()
    }

    /// Synchronizes one module or all of them.
    ///
    /// An empty `branch` keeps each module's stored branch; an empty `commit`
    /// means `HEAD`. With `force`, checkouts are re-imported first. The stored
    /// commit stays `HEAD` when both the request and the module track `HEAD`;
    /// otherwise it records the concrete revision.
    pub fn update(
        &mut self,
        name: Option<&str>,
        branch: &str,
        commit: &str,
        force: bool,
    ) -> Result<()> {
        let commit = if commit.is_empty() { HEAD } else { commit };

        let mut session = self.load()?;
        session.require_modules()?;
        if force {
            session.import(name, true)?;
            session.persist()?;
        }
        session.update(name, branch, commit)?;
        session.persist()
    }

    /// Compact (or with `verbose`, detailed) status of one module.
    pub fn status(&mut self, name: &str, verbose: bool) -> Result<String> {
        let session = self.load()?;
        session.require_modules()?;
        let module = session.module(name)?;
        module.status(session.backend, verbose)
    }
}

impl Session<'_> {
    fn persist(&self) -> Result<()> {
        self.manifest.persist()?;
        self.observer.notify(&Event::ManifestPersisted {
            path: self.manifest.path().to_path_buf(),
        });
        Ok(())
    }

    fn require_modules(&self) -> Result<()> {
        if self.manifest.is_empty() {
            return Err(Error::NoModules);
        }
        Ok(())
    }

    fn not_exist(&self, name: &str) -> Error {
        Error::NameNotExist {
            name: name.to_string(),
            suggestion: suggestions::find_similar(
                name,
                self.manifest.modules.keys().map(String::as_str),
            )
            .map(str::to_string),
        }
    }

    fn module(&self, name: &str) -> Result<&Module> {
        self.manifest
            .modules
            .get(name)
            .ok_or_else(|| self.not_exist(name))
    }

    /// Resolves the modules a batch operation applies to.
    fn targets(&self, name: Option<&str>) -> Result<Vec<String>> {
        match name {
            Some(name) if !name.is_empty() => {
                self.module(name)?;
                Ok(vec![name.to_string()])
            }
            _ => Ok(self.manifest.names()),
        }
    }

    fn import(&self, name: Option<&str>, force: bool) -> Result<()> {
        let root = self.manifest.parent_directory().to_path_buf();
        for target in self.targets(name)? {
            let module = self.module(&target)?;
            let dest = module.absolute_path();
            if !inside_root(&root, dest) {
                return Err(Error::Import {
                    name: target,
                    source: Box::new(Error::Validation {
                        field: ValidationField::Path,
                        message: "must name a directory below the project root".to_string(),
                    }),
                });
            }

            if force {
                match remove_checkout(&root, dest) {
                    Ok(true) => self.observer.notify(&Event::CheckoutRemoved {
                        path: dest.to_path_buf(),
                    }),
                    Ok(false) => {}
                    Err(e) => self.observer.notify(&Event::CleanupFailed {
                        path: dest.to_path_buf(),
                        message: e.to_string(),
                    }),
                }
            }

            module.import(self.backend, &module.branch, &module.commit, module.depth)?;
            self.observer.notify(&Event::ModuleImported {
                name: target.clone(),
                path: dest.to_path_buf(),
            });
        }
        Ok(())
    }

    fn update(&mut self, name: Option<&str>, branch: &str, commit: &str) -> Result<()> {
        let backend = self.backend;
        for target in self.targets(name)? {
            let module = self.module(&target)?;
            let effective_branch = if branch.is_empty() {
                module.branch.clone()
            } else {
                branch.to_string()
            };
            let revision = module.update(backend, &effective_branch, commit)?;
            let keep_tracking = commit == HEAD && module.is_tracking_head();

            if let Some(module) = self.manifest.modules.get_mut(&target) {
                module.branch = effective_branch.clone();
                if !keep_tracking {
                    module.commit = revision.clone();
                }
            }
            self.observer.notify(&Event::ModuleUpdated {
                name: target,
                branch: effective_branch,
                revision,
            });
        }
        Ok(())
    }
}

/// Deletes a module checkout below `root`.
///
/// Returns `Ok(false)` when there was nothing to delete. Refuses to touch
/// anything that is not strictly inside the project root.
fn remove_checkout(root: &Path, dest: &Path) -> Result<bool> {
    if !inside_root(root, dest) {
        return Err(Error::RemoveCheckout {
            path: dest.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "checkout is not inside the project root",
            ),
        });
    }

    match fs::remove_dir_all(dest) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(Error::RemoveCheckout {
            path: dest.to_path_buf(),
            source,
        }),
    }
}

/// True when `dest` lies strictly below `root`.
fn inside_root(root: &Path, dest: &Path) -> bool {
    let escapes = dest
        .components()
        .any(|c| matches!(c, Component::ParentDir));
    dest != root && dest.starts_with(root) && !escapes
}
