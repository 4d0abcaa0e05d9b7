//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands::{self, GlobalArgs};
use mdlr::output::{ColorMode, OutputConfig};

/// mdlr - Manage nested git checkouts declared in mdlr.yml
#[derive(Parser, Debug)]
#[command(name = "mdlr")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the manifest file.
    ///
    /// Defaults to the nearest mdlr.yml in the current directory or its
    /// parents (`init` always uses the current directory).
    #[arg(short, long, global = true, value_name = "FILE", env = "MDLR_FILE")]
    file: Option<PathBuf>,

    /// When to use colors and emoji markers
    #[arg(long, global = true, value_name = "WHEN", value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,

    /// Set log level (off, error, warn, info, debug, trace). RUST_LOG overrides it.
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty mdlr.yml
    Init(commands::init::InitArgs),

    /// List modules with their current status
    #[command(visible_alias = "ls")]
    List(commands::list::ListArgs),

    /// Register a new module
    Add(commands::add::AddArgs),

    /// Unregister a module
    #[command(visible_alias = "rm")]
    Remove(commands::remove::RemoveArgs),

    /// Clone module checkouts
    Import(commands::import::ImportArgs),

    /// Fetch and move module checkouts to their branch or commit
    Update(commands::update::UpdateArgs),

    /// Show the local state of one module
    Status(commands::status::StatusArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let output = OutputConfig::new(self.color);
        init_logging(self.log_level, &output);

        let globals = GlobalArgs {
            manifest: self.file,
            output,
        };

        match self.command {
            Commands::Init(args) => commands::init::execute(args, &globals),
            Commands::List(args) => commands::list::execute(args, &globals),
            Commands::Add(args) => commands::add::execute(args, &globals),
            Commands::Remove(args) => commands::remove::execute(args, &globals),
            Commands::Import(args) => commands::import::execute(args, &globals),
            Commands::Update(args) => commands::update::execute(args, &globals),
            Commands::Status(args) => commands::status::execute(args, &globals),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Logs go to stderr so command output stays pipeable.
fn init_logging(level: LevelFilter, output: &OutputConfig) {
    let style = if output.use_color {
        env_logger::WriteStyle::Auto
    } else {
        env_logger::WriteStyle::Never
    };

    // A logger may already be installed when the CLI is driven from tests.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .write_style(style)
        .format_timestamp(None)
        .try_init();
}
