//! # Error Suggestions
//!
//! This module provides helpers for telling users what went wrong AND how to
//! fix it: "did you mean" lookups for mistyped module names, and hint lines
//! attached to library errors before the CLI prints them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mdlr::suggestions;
//!
//! ctx.status(&name, false).map_err(suggestions::with_hints)?;
//! ```

use crate::error::Error;

/// Attach actionable hints to a library error.
///
/// Errors without a known remedy are passed through unchanged.
pub fn with_hints(err: Error) -> anyhow::Error {
    let hints: &[&str] = match &err {
        Error::ManifestNotFound { .. } => &[
            "hint: Run 'mdlr init' to create a manifest in the current directory",
            "hint: Use --file or set MDLR_FILE to point at an existing manifest",
        ],
        Error::AlreadyExists { .. } => &["hint: Run 'mdlr list' to see the registered modules"],
        Error::InvalidFormat { .. } => &[
            "hint: Each entry under 'modules:' needs type, path, url and branch",
        ],
        Error::NoModules => &["hint: Add one with 'mdlr add <NAME> <URL>'"],
        Error::NameAlreadyInUse { .. } => &[
            "hint: Pick another name, or run 'mdlr remove <NAME>' first",
        ],
        Error::Import { source, .. } if matches!(**source, Error::AlreadyExists { .. }) => &[
            "hint: Re-run with --force to replace the existing checkout",
        ],
        Error::Update { source, .. } if matches!(**source, Error::CheckoutMissing { .. }) => &[
            "hint: Run 'mdlr import <NAME>' first, or pass --force",
        ],
        _ => &[],
    };

    if hints.is_empty() {
        anyhow::anyhow!("{err}")
    } else {
        anyhow::anyhow!("{err}\n\n{}", hints.join("\n"))
    }
}

/// Largest edit distance still offered as a "did you mean" suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Picks the candidate closest to `input`, if any is close enough to be a
/// plausible typo. Ties go to the earliest candidate.
pub fn find_similar<'a, I>(input: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_len = input.chars().count();
    candidates
        .into_iter()
        .map(|name| (name, edit_distance(input, name)))
        .filter(|&(_, d)| d <= MAX_SUGGESTION_DISTANCE && d < input_len)
        .min_by_key(|&(_, d)| d)
        .map(|(name, _)| name)
}

/// Levenshtein distance over chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let target: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=target.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in target.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1)
                .min(row[j] + 1)
                .min(diagonal + usize::from(ca != *cb));
            diagonal = above;
        }
    }

    row[target.len()]
}
