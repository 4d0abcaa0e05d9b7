//! # Error Handling
//!
//! This module defines the centralized error type for `mdlr`. It uses the
//! `thiserror` library to describe every failure the manifest lifecycle can
//! hit, so callers can branch on the variant instead of matching strings.
//!
//! ## Key Components
//!
//! - **`Error`**: One variant per failure kind. Lookup and validation errors
//!   (`NameAlreadyInUse`, `NameNotExist`, `NoModules`, `Validation`) are raised
//!   before anything is mutated. Backend failures surface as `GitCommand` and
//!   are wrapped in `Import` or `Update` with the module name attached.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.

use std::path::PathBuf;

use thiserror::Error;

use crate::module::ValidationField;

/// Main error type for mdlr operations
#[derive(Error, Debug)]
pub enum Error {
    /// No manifest exists at the expected location.
    #[error("Manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    /// The manifest exists but could not be parsed.
    #[error("Invalid manifest format in {}: {message}", path.display())]
    InvalidFormat { path: PathBuf, message: String },

    /// The manifest was already loaded by this context.
    #[error("Manifest is already loaded")]
    AlreadyLoaded,

    /// Something that must be created fresh is already on disk.
    ///
    /// Raised by `init` for an existing manifest and by import for an
    /// existing checkout.
    #[error("{} already exists", path.display())]
    AlreadyExists { path: PathBuf },

    /// A module has no checkout on disk.
    #[error("No checkout found at {}", path.display())]
    CheckoutMissing { path: PathBuf },

    /// The manifest location itself is unusable.
    #[error("Invalid manifest path: {message}")]
    InvalidPath { message: String },

    /// A module with this name is already registered.
    #[error("Module name already in use: {name}")]
    NameAlreadyInUse { name: String },

    /// No module with this name is registered.
    ///
    /// May carry the closest registered name as a suggestion.
    #[error("Module does not exist: {name}{}", suggestion.as_ref().map(|s| format!(" (did you mean '{}'?)", s)).unwrap_or_default())]
    NameNotExist {
        name: String,
        suggestion: Option<String>,
    },

    /// The manifest has no modules at all.
    #[error("No modules are defined in the manifest")]
    NoModules,

    /// A module definition failed validation.
    #[error("Invalid module {field}: {message}")]
    Validation {
        field: ValidationField,
        message: String,
    },

    /// Acquiring a module checkout failed.
    #[error("Failed to import module '{name}': {source}")]
    Import {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// Synchronizing a module checkout failed.
    #[error("Failed to update module '{name}': {source}")]
    Update {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// Writing the manifest failed. The previous file is left in place.
    #[error("Failed to write manifest {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing a module checkout from disk failed.
    #[error("Failed to remove checkout {}: {source}", path.display())]
    RemoveCheckout {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A git command exited unsuccessfully or could not be spawned.
    #[error("Git command failed in {}: {command} - {stderr}", path.display())]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for the "no manifest yet" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ManifestNotFound { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
