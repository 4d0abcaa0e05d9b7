//! # Lifecycle Events
//!
//! The lifecycle manager reports what it did through an [`Observer`] instead
//! of logging directly. The CLI plugs in [`LogObserver`], which forwards
//! events to the `log` facade; library users and tests can supply their own
//! observer or fall back to [`NoopObserver`].

use std::fmt;
use std::path::PathBuf;

use log::{info, warn};

/// Something noteworthy that happened during a lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `init` wrote a fresh manifest.
    ManifestCreated { path: PathBuf },
    /// The manifest was written after a mutation.
    ManifestPersisted { path: PathBuf },
    ModuleAdded { name: String },
    ModuleRemoved { name: String },
    /// A module checkout was deleted from disk.
    CheckoutRemoved { path: PathBuf },
    /// Best-effort deletion before a forced import failed and was ignored.
    CleanupFailed { path: PathBuf, message: String },
    ModuleImported { name: String, path: PathBuf },
    /// A module was synchronized to a concrete revision.
    ModuleUpdated {
        name: String,
        branch: String,
        revision: String,
    },
    /// A module's local state could not be inspected while listing.
    StatusUnavailable { name: String, message: String },
}

impl Event {
    /// True for events that describe something going wrong.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::CleanupFailed { .. } | Event::StatusUnavailable { .. }
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ManifestCreated { path } => write!(f, "created manifest {}", path.display()),
            Event::ManifestPersisted { path } => write!(f, "saved manifest {}", path.display()),
            Event::ModuleAdded { name } => write!(f, "added module {name}"),
            Event::ModuleRemoved { name } => write!(f, "removed module {name}"),
            Event::CheckoutRemoved { path } => write!(f, "deleted checkout {}", path.display()),
            Event::CleanupFailed { path, message } => {
                write!(f, "could not delete {}: {message}", path.display())
            }
            Event::ModuleImported { name, path } => {
                write!(f, "imported module {name} into {}", path.display())
            }
            Event::ModuleUpdated {
                name,
                branch,
                revision,
            } => write!(f, "updated module {name} to {branch}@{revision}"),
            Event::StatusUnavailable { name, message } => {
                write!(f, "status of module {name} unavailable: {message}")
            }
        }
    }
}

/// Receives lifecycle events.
pub trait Observer {
    fn notify(&self, event: &Event);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn notify(&self, _event: &Event) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn notify(&self, event: &Event) {
        if event.is_warning() {
            warn!("{event}");
        } else {
            info!("{event}");
        }
    }
}

/// Collects events for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordingObserver {
    events: std::rc::Rc<std::cell::RefCell<Vec<Event>>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }
}

#[cfg(test)]
impl Observer for RecordingObserver {
    fn notify(&self, event: &Event) {
        self.events.borrow_mut().push(event.clone());
    }
}
