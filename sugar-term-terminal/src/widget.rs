//! The terminal-widget contract the tab registry is written against.

use crate::events::TerminalHandle;
use anyhow::Result;
use std::path::PathBuf;
use sugar_term_config::Theme;

/// Everything needed to start a child process inside a new terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnConfig {
    /// Program and arguments; `argv[0]` is the program
    pub argv: Vec<String>,
    /// Directory the child starts in
    pub working_directory: PathBuf,
    /// Variables added to (or overriding) the inherited environment
    pub env: Vec<(String, String)>,
    /// Scrollback lines the terminal retains
    pub scrollback_lines: usize,
    /// Saved lines shown above anything the child prints
    pub initial_lines: Vec<String>,
    /// Terminal width in columns
    pub cols: u16,
    /// Terminal height in rows
    pub rows: u16,
}

/// A live terminal: a screen buffer attached to one child process
pub trait TerminalWidget {
    /// Pid of the child, while it is known
    fn process_id(&self) -> Option<u32>;

    /// Full buffer text, scrollback first, one entry per line
    fn buffer_text(&self) -> Vec<String>;

    /// Send input to the child
    fn write_input(&mut self, data: &str) -> Result<()>;

    fn font_size(&self) -> u32;

    fn set_font_size(&mut self, size: u32);

    fn set_colors(&mut self, theme: &Theme);

    /// Ask the child to terminate (SIGHUP on Unix)
    fn kill(&mut self) -> Result<()>;
}

/// Creates terminal widgets and the child processes behind them
pub trait TerminalSpawner {
    type Widget: TerminalWidget;

    /// Start a child as described by `config`. Events for the new terminal
    /// are tagged with `handle`.
    fn spawn(&mut self, handle: TerminalHandle, config: SpawnConfig) -> Result<Self::Widget>;
}
