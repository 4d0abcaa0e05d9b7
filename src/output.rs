//! Terminal decoration for CLI output.
//!
//! Colors and emoji markers are switched on and off together. The `--color`
//! flag decides first. With `auto`, `NO_COLOR`, `CLICOLOR`, `CLICOLOR_FORCE`
//! and `TERM=dumb` are consulted before falling back to whether stdout is a
//! terminal.

use std::env;

use clap::ValueEnum;
use console::Style;

use crate::module::ModuleStatus;

/// Value of the `--color` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Leading marker of a CLI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Done,
    Hint,
    Imported,
    Updated,
}

impl Marker {
    fn glyph(self) -> &'static str {
        match self {
            Marker::Done => "✅",
            Marker::Hint => "💡",
            Marker::Imported => "📦",
            Marker::Updated => "🔄",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Marker::Hint => "[TIP]",
            Marker::Done | Marker::Imported | Marker::Updated => "[OK]",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    pub fn new(mode: ColorMode) -> Self {
        let use_color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => color_from_env(
                |key| env::var(key).ok(),
                console::Term::stdout().features().colors_supported(),
            ),
        };
        Self { use_color }
    }

    pub fn marker(&self, marker: Marker) -> &'static str {
        if self.use_color {
            marker.glyph()
        } else {
            marker.tag()
        }
    }

    /// Colors a rendered status line by the label it starts with.
    ///
    /// `text` is what [`crate::module::Module::status`] produced, e.g.
    /// `behind (1a2b3c4d5e6f)`. Text without a known label is left alone.
    pub fn status(&self, text: &str) -> String {
        if !self.use_color {
            return text.to_string();
        }

        let label = text.split_whitespace().next().unwrap_or_default();
        let status = [
            ModuleStatus::Missing,
            ModuleStatus::UpToDate,
            ModuleStatus::Ahead,
            ModuleStatus::Behind,
            ModuleStatus::Diverged,
            ModuleStatus::Dirty,
        ]
        .into_iter()
        .find(|s| s.label() == label);

        let style = match status {
            Some(ModuleStatus::UpToDate) => Style::new().green(),
            Some(ModuleStatus::Ahead | ModuleStatus::Behind) => Style::new().yellow(),
            Some(ModuleStatus::Diverged | ModuleStatus::Dirty) => Style::new().red(),
            Some(ModuleStatus::Missing) => Style::new().dim(),
            None => return text.to_string(),
        };
        style.force_styling(true).apply_to(text).to_string()
    }
}

/// Decides `auto` color mode from environment lookups and terminal support.
fn color_from_env(var: impl Fn(&str) -> Option<String>, terminal: bool) -> bool {
    // NO_COLOR disables colors even when empty.
    if var("NO_COLOR").is_some() {
        return false;
    }
    if var("CLICOLOR").is_some_and(|v| v == "0") {
        return false;
    }
    if var("CLICOLOR_FORCE").is_some_and(|v| !v.is_empty() && v != "0") {
        return true;
    }
    if var("TERM").is_some_and(|v| v == "dumb") {
        return false;
    }
    terminal
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_explicit_modes() {
        assert!(OutputConfig::new(ColorMode::Always).use_color);
        assert!(!OutputConfig::new(ColorMode::Never).use_color);
    }

    #[test]
    fn test_auto_follows_terminal() {
        assert!(color_from_env(lookup(&[]), true));
        assert!(!color_from_env(lookup(&[]), false));
    }

    #[test]
    fn test_no_color_wins_even_when_empty() {
        assert!(!color_from_env(lookup(&[("NO_COLOR", "")]), true));
        assert!(!color_from_env(
            lookup(&[("NO_COLOR", "1"), ("CLICOLOR_FORCE", "1")]),
            true
        ));
    }

    #[test]
    fn test_clicolor_variables() {
        assert!(!color_from_env(lookup(&[("CLICOLOR", "0")]), true));
        assert!(color_from_env(lookup(&[("CLICOLOR_FORCE", "1")]), false));
        assert!(!color_from_env(lookup(&[("CLICOLOR_FORCE", "0")]), false));
    }

    #[test]
    fn test_dumb_terminal() {
        assert!(!color_from_env(lookup(&[("TERM", "dumb")]), true));
        assert!(color_from_env(lookup(&[("TERM", "xterm-256color")]), true));
    }

    #[test]
    fn test_markers() {
        let color = OutputConfig { use_color: true };
        let plain = OutputConfig { use_color: false };
        assert_eq!(color.marker(Marker::Imported), "📦");
        assert_eq!(plain.marker(Marker::Imported), "[OK]");
        assert_eq!(plain.marker(Marker::Hint), "[TIP]");
    }

    #[test]
    fn test_status_plain() {
        let plain = OutputConfig { use_color: false };
        assert_eq!(plain.status("behind (abc)"), "behind (abc)");
    }

    #[test]
    fn test_status_colored() {
        let color = OutputConfig { use_color: true };

        let painted = color.status("dirty (0123456789ab)");
        assert!(painted.contains("dirty (0123456789ab)"));
        assert!(painted.contains("\u{1b}["));

        assert_eq!(color.status("unknown"), "unknown");
    }
}
