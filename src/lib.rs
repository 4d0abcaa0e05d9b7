//! # mdlr
//!
//! This library manages a declarative manifest of external git repositories
//! ("modules") checked out inside a host project. It powers the `mdlr`
//! command-line tool but can be embedded anywhere that needs to keep nested
//! checkouts in sync with a committed manifest.
//!
//! ## Quick Example
//!
//! ```no_run
//! use mdlr::context::{Context, NewModule};
//!
//! let mut ctx = Context::new("mdlr.yml");
//! ctx.add(NewModule {
//!     name: "core".to_string(),
//!     kind: "git".to_string(),
//!     path: "./core".to_string(),
//!     url: "https://example.com/core.git".to_string(),
//!     branch: "main".to_string(),
//!     commit: "HEAD".to_string(),
//!     depth: 0,
//! })?;
//!
//! // Each context serves a single operation.
//! println!("{}", Context::new("mdlr.yml").list()?);
//! # Ok::<(), mdlr::error::Error>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: The `mdlr.yml` registry mapping module names to
//!   their definitions, with atomic persistence.
//! - **Module (`module`)**: One external repository: where it lives, where it
//!   comes from, which branch and commit it follows.
//! - **Lifecycle (`context`)**: Load, validate, mutate, sync and persist, one
//!   operation per context.
//! - **Backends (`backend`, `git`)**: The version-control seam and its system
//!   `git` implementation.
//! - **Events (`observer`)**: Progress and warnings reported by the lifecycle.

pub mod backend;
pub mod context;
pub mod defaults;
pub mod error;
pub mod git;
pub mod manifest;
pub mod module;
pub mod observer;
pub mod output;
pub mod suggestions;

#[cfg(test)]
mod manifest_proptest;
