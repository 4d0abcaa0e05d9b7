//! Thin wrappers over the system `git` executable.
//!
//! Using the system git automatically picks up SSH keys, credential helpers
//! and anything else configured in `~/.gitconfig`. Every function here maps a
//! failed invocation to [`Error::GitCommand`] carrying git's stderr.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use log::debug;

use crate::error::{Error, Result};
use crate::module::ModuleStatus;

/// Runs `git` with `args`, optionally inside `dir`, and returns trimmed stdout.
fn run(dir: Option<&Path>, args: &[&str], context: &Path) -> Result<String> {
    let mut cmd = Command::new("git");
    if let Some(dir) = dir {
        cmd.arg("-C").arg(dir);
    }
    cmd.args(args);
    debug!("running git {} ({})", args.join(" "), context.display());

    let output = cmd.output().map_err(|e| Error::GitCommand {
        command: args.join(" "),
        path: context.to_path_buf(),
        stderr: e.to_string(),
    })?;
    check(output, args, context)
}

fn check(output: Output, args: &[&str], context: &Path) -> Result<String> {
    if !output.status.success() {
        return Err(Error::GitCommand {
            command: args.join(" "),
            path: context.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Returns true when `dest` holds a git working tree.
pub fn is_checkout(dest: &Path) -> bool {
    dest.join(".git").exists()
}

/// Clone `url` into `dest` at `branch`.
///
/// A `depth` of 0 clones full history; anything else makes a shallow clone.
pub fn clone(url: &str, dest: &Path, branch: &str, depth: u32) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let depth_arg = depth.to_string();
    let dest_arg = dest.to_string_lossy();
    let mut args = vec!["clone", "--quiet"];
    if depth > 0 {
        args.extend(["--depth", depth_arg.as_str()]);
    }
    args.extend(["--branch", branch, url, &*dest_arg]);

    run(None, &args, dest).map(|_| ()).map_err(|err| match err {
        Error::GitCommand {
            command,
            path,
            stderr,
        } if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository") =>
        {
            Error::GitCommand {
                command,
                path,
                stderr: format!(
                    "Authentication failed. Make sure you have access to {}.\n\
                     For private repos, ensure an SSH key or credential helper is configured.\n\
                     Error: {}",
                    url, stderr
                ),
            }
        }
        other => other,
    })
}

/// Fetch the latest history of `branch` into `origin/<branch>`.
pub fn fetch(dest: &Path, branch: &str) -> Result<()> {
    let refspec = format!("+refs/heads/{branch}:refs/remotes/origin/{branch}");
    run(Some(dest), &["fetch", "--quiet", "origin", &refspec], dest).map(|_| ())
}

/// Check out `revision` in the working tree at `dest`.
pub fn checkout(dest: &Path, revision: &str) -> Result<()> {
    run(Some(dest), &["checkout", "--quiet", revision], dest).map(|_| ())
}

/// Resolve `reference` to a full commit id.
pub fn rev_parse(dest: &Path, reference: &str) -> Result<String> {
    let revspec = format!("{reference}^{{commit}}");
    let id = run(Some(dest), &["rev-parse", "--verify", "--quiet", &revspec], dest)?;
    if id.is_empty() {
        return Err(Error::GitCommand {
            command: format!("rev-parse {revspec}"),
            path: dest.to_path_buf(),
            stderr: format!("unknown revision '{reference}'"),
        });
    }
    Ok(id)
}

/// Returns true when the working tree has uncommitted changes.
pub fn is_dirty(dest: &Path) -> Result<bool> {
    let porcelain = run(Some(dest), &["status", "--porcelain"], dest)?;
    Ok(!porcelain.is_empty())
}

/// Count commits only on `HEAD` and only on `target`.
pub fn ahead_behind(dest: &Path, target: &str) -> Result<(u64, u64)> {
    let range = format!("HEAD...{target}");
    let counts = run(
        Some(dest),
        &["rev-list", "--left-right", "--count", &range],
        dest,
    )?;

    // Output format: <ahead>\t<behind>
    let mut parts = counts.split_whitespace().map(str::parse::<u64>);
    match (parts.next(), parts.next()) {
        (Some(Ok(ahead)), Some(Ok(behind))) => Ok((ahead, behind)),
        _ => Err(Error::GitCommand {
            command: format!("rev-list --left-right --count {range}"),
            path: dest.to_path_buf(),
            stderr: format!("unexpected output '{counts}'"),
        }),
    }
}

/// Compare the checkout at `dest` with `target` without touching the network.
pub fn local_status(dest: &Path, target: &str) -> Result<ModuleStatus> {
    if !is_checkout(dest) {
        return Ok(ModuleStatus::Missing);
    }
    if is_dirty(dest)? {
        return Ok(ModuleStatus::Dirty);
    }

    let head = rev_parse(dest, "HEAD")?;
    let wanted = rev_parse(dest, target)?;
    if head == wanted {
        return Ok(ModuleStatus::UpToDate);
    }

    Ok(match ahead_behind(dest, &wanted)? {
        (0, 0) => ModuleStatus::UpToDate,
        (_, 0) => ModuleStatus::Ahead,
        (0, _) => ModuleStatus::Behind,
        _ => ModuleStatus::Diverged,
    })
}
