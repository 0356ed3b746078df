//! Command-line interface for sugar-term.
//!
//! This module handles CLI argument parsing and the `inspect` subcommand.

use crate::session::storage::load_session_from;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// sugar-term - a tabbed terminal with session save and restore
#[derive(Parser)]
#[command(name = "sugar-term")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file to use instead of the default
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Session file to restore from and save to
    #[arg(long, value_name = "PATH")]
    pub session: Option<PathBuf>,

    /// Start with a single fresh tab instead of restoring the last session
    #[arg(long)]
    pub fresh: bool,

    /// Set debug log level (overrides RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a summary of a saved session file
    Inspect {
        /// Session file to read
        path: PathBuf,
    },
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    /// Config file override
    pub config_path: Option<PathBuf>,
    /// Session file override
    pub session_path: Option<PathBuf>,
    /// Skip session restore
    pub fresh: bool,
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
}

/// Result of CLI processing
pub enum CliResult {
    /// Continue with normal application startup
    Continue(RuntimeOptions),
    /// Exit with the given code (subcommand completed)
    Exit(i32),
}

/// Process CLI arguments and handle subcommands
pub fn process_cli() -> CliResult {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect { path }) => CliResult::Exit(inspect_session(&path)),
        None => {
            let options = RuntimeOptions {
                config_path: cli.config,
                session_path: cli.session,
                fresh: cli.fresh,
                log_level: cli.log_level.map(|l| l.to_level_filter()),
            };
            CliResult::Continue(options)
        }
    }
}

/// Print what a session file would restore; returns the exit code
pub fn inspect_session(path: &Path) -> i32 {
    match load_session_from(path) {
        Ok(None) => {
            println!("{}: no saved session", path.display());
            0
        }
        Ok(Some(doc)) => {
            let current = doc.clamped_current_tab(doc.tabs.len());
            println!("{}", path.display());
            println!("  theme: {}", doc.theme.as_str());
            if let Some(hex) = &doc.theme_hex {
                println!("  colours: fg {} bg {}", hex.fg_color, hex.bg_color);
            }
            println!("  tabs: {} (current: {})", doc.tabs.len(), current + 1);
            for (idx, tab) in doc.tabs.iter().enumerate() {
                let marker = if idx == current { '*' } else { ' ' };
                println!(
                    "  {} {}. {} (font {}, {} env vars, {} scrollback lines)",
                    marker,
                    idx + 1,
                    tab.cwd,
                    tab.font_size,
                    tab.env.len(),
                    tab.scrollback.len()
                );
            }
            0
        }
        Err(e) => {
            eprintln!("sugar-term: {}: {}", path.display(), e);
            1
        }
    }
}
