//! In-memory doubles for the terminal collaborator.
//!
//! Enabled by the `test-support` feature. `StubSpawner` hands out
//! `StubTerminal`s with fake pids and records what each was spawned with;
//! `StubProcessTable` answers lookups from a map.

use crate::events::TerminalHandle;
use crate::process_table::{ProcessInfo, ProcessTable, ProcessTableError};
use crate::widget::{SpawnConfig, TerminalSpawner, TerminalWidget};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use sugar_term_config::Theme;

/// A terminal with no child process behind it
#[derive(Debug)]
pub struct StubTerminal {
    pub handle: TerminalHandle,
    pub config: SpawnConfig,
    pub pid: Option<u32>,
    pub lines: Vec<String>,
    pub input: String,
    pub font_size: u32,
    pub colors: Option<Theme>,
    /// Shared with the spawner so tests can observe kills after the
    /// terminal itself has been dropped
    pub killed: Arc<AtomicBool>,
}

impl TerminalWidget for StubTerminal {
    fn process_id(&self) -> Option<u32> {
        self.pid
    }

    fn buffer_text(&self) -> Vec<String> {
        self.lines.clone()
    }

    fn write_input(&mut self, data: &str) -> Result<()> {
        self.input.push_str(data);
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
        self.killed.store(true, Ordering::SeqCst);
        self.pid = None;
        Ok(())
    }
}

/// Spawner handing out `StubTerminal`s with sequential fake pids
#[derive(Debug, Default)]
pub struct StubSpawner {
    next_pid: u32,
    /// Every spawn request, in order
    pub spawned: Vec<(TerminalHandle, SpawnConfig)>,
    /// Kill flags per handle
    pub kills: HashMap<TerminalHandle, Arc<AtomicBool>>,
    /// Make the next spawn fail
    pub fail_next: bool,
}

impl StubSpawner {
    pub fn new() -> Self {
        Self {
            next_pid: 1000,
            ..Self::default()
        }
    }

    pub fn was_killed(&self, handle: TerminalHandle) -> bool {
        self.kills
            .get(&handle)
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Pid the next spawned terminal will get
    pub fn peek_pid(&self) -> u32 {
        self.next_pid
    }
}

impl TerminalSpawner for StubSpawner {
    type Widget = StubTerminal;

    fn spawn(&mut self, handle: TerminalHandle, config: SpawnConfig) -> Result<StubTerminal> {
        if self.fail_next {
            self.fail_next = false;
            anyhow::bail!("stub spawn failure for {}", handle);
        }
        let pid = self.next_pid;
        self.next_pid += 1;
        let killed = Arc::new(AtomicBool::new(false));
        self.kills.insert(handle, Arc::clone(&killed));
        self.spawned.push((handle, config.clone()));
        Ok(StubTerminal {
            handle,
            pid: Some(pid),
            lines: config.initial_lines.clone(),
            config,
            input: String::new(),
            font_size: sugar_term_config::defaults::font_size(),
            colors: None,
            killed,
        })
    }
}

/// Process table answering from a fixed map; unknown pids are gone
#[derive(Debug, Default)]
pub struct StubProcessTable {
    pub processes: HashMap<u32, ProcessInfo>,
}

impl StubProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pid: u32, info: ProcessInfo) {
        self.processes.insert(pid, info);
    }
}

impl ProcessTable for StubProcessTable {
    fn lookup(&mut self, pid: u32) -> Result<ProcessInfo, ProcessTableError> {
        self.processes
            .get(&pid)
            .cloned()
            .ok_or(ProcessTableError::ProcessGone(pid))
    }
}
