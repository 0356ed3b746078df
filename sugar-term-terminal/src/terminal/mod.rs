use crate::events::TerminalHandle;
use crate::widget::TerminalWidget;
use anyhow::Result;
use parking_lot::Mutex;
use portable_pty::{ChildKiller, MasterPty};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use sugar_term_config::Theme;

pub mod scrollback;
pub mod spawn;

pub use spawn::PtySpawner;

/// A terminal backed by a real PTY and a VT parser
pub struct PtyTerminal {
    /// Identifier stamped on every event this terminal emits
    pub(crate) handle: TerminalHandle,
    /// Screen and scrollback state, shared with the reader thread
    pub(crate) parser: Arc<Mutex<vt100::Parser>>,
    /// Master side of the PTY; dropping it hangs up the child
    pub(crate) _master: Box<dyn MasterPty + Send>,
    /// Writer into the child's stdin
    pub(crate) writer: Box<dyn Write + Send>,
    /// Kills the child without owning it (the reader thread waits on it)
    pub(crate) killer: Box<dyn ChildKiller + Send + Sync>,
    /// Pid reported at spawn time
    pub(crate) process_id: Option<u32>,
    /// Set by the reader thread once the child is gone
    pub(crate) exited: Arc<AtomicBool>,
    pub(crate) font_size: u32,
    pub(crate) colors: Option<Theme>,
}

impl PtyTerminal {
    pub fn handle(&self) -> TerminalHandle {
        self.handle
    }

    /// Check if the child process is still running
    pub fn is_running(&self) -> bool {
        !self.exited.load(Ordering::Acquire)
    }

    /// Get the terminal title set by OSC 0 or 2 sequences
    pub fn title(&self) -> String {
        self.parser.lock().screen().title().to_string()
    }

    /// Colours last applied to this terminal
    pub fn colors(&self) -> Option<Theme> {
        self.colors
    }
}

impl TerminalWidget for PtyTerminal {
    fn process_id(&self) -> Option<u32> {
        if self.is_running() {
            self.process_id
        } else {
            None
        }
    }

    fn buffer_text(&self) -> Vec<String> {
        let mut parser = self.parser.lock();
        scrollback::buffer_lines(&mut parser)
    }

    fn write_input(&mut self, data: &str) -> Result<()> {
        if !data.is_empty() {
            log::debug!("Writing to PTY {}: {:?}", self.handle, data);
        }
        self.writer
            .write_all(data.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to write to PTY: {}", e))?;
        self.writer
            .flush()
            .map_err(|e| anyhow::anyhow!("Failed to flush PTY: {}", e))?;
        Ok(())
    }

    fn font_size(&self) -> u32 {
        self.font_size
    }

    fn set_font_size(&mut self, size: u32) {
        self.font_size = size;
    }

    fn set_colors(&mut self, theme: &Theme) {
        self.colors = Some(*theme);
    }

    fn kill(&mut self) -> Result<()> {
        if !self.is_running() {
            return Ok(());
        }
        log::info!("Killing child of {}", self.handle);
        self.killer
            .kill()
            .map_err(|e| anyhow::anyhow!("Failed to kill PTY child: {}", e))
    }
}
