//! Tab manager: the ordered registry of open terminal tabs

use super::{Tab, TabId, TabIndex};
use crate::app::AppState;
use crate::error::TabError;
use crate::session::{TabState, filter_environment, home_dir, validate_cwd};
use anyhow::Result;
use sugar_term_config::{Config, Theme};
use sugar_term_terminal::{SpawnConfig, TerminalHandle, TerminalSpawner, TerminalWidget};

/// What the window should do after a tab was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Other tabs are still open
    TabsRemain,
    /// The last tab is gone; the window should close
    WindowShouldClose,
}

/// Manages the terminal tabs of the window
pub struct TabManager<S: TerminalSpawner> {
    /// Creates terminal widgets and their child processes
    spawner: S,
    /// All tabs, in display order
    tabs: Vec<Tab<S::Widget>>,
    /// Currently active tab ID
    active_tab_id: Option<TabId>,
    /// Counter for generating unique tab IDs
    next_tab_id: TabId,
}

impl<S: TerminalSpawner> TabManager<S> {
    /// Create a new empty tab manager
    pub fn new(spawner: S) -> Self {
        Self {
            spawner,
            tabs: Vec::new(),
            active_tab_id: None,
            next_tab_id: 1,
        }
    }

    /// Open a new tab, optionally seeded from a saved snapshot
    ///
    /// The tab is appended and becomes active. A spawn failure leaves the
    /// registry unchanged.
    pub fn open(&mut self, initial_state: Option<&TabState>, state: &AppState) -> Result<TabIndex> {
        let config = spawn_config(initial_state, &state.config);
        let font_size = initial_state
            .map(|s| s.font_size)
            .unwrap_or(state.config.font_size);

        let id = self.next_tab_id;
        self.next_tab_id += 1;
        let handle = TerminalHandle(id);

        let mut widget = self.spawner.spawn(handle, config)?;
        widget.set_font_size(font_size);
        widget.set_colors(&state.theme);

        // Tab number is based on current count, not unique ID
        let tab_number = self.tabs.len() + 1;
        self.tabs.push(Tab::new(id, tab_number, widget, font_size));

        // Always switch to the new tab
        self.active_tab_id = Some(id);

        log::info!(
            "Opened tab {} (pid: {:?}, total: {})",
            id,
            self.tabs.last().and_then(|t| t.process_id()),
            self.tabs.len()
        );

        Ok(self.tabs.len() - 1)
    }

    /// Close the tab at `index`, terminating its child
    pub fn close(&mut self, index: TabIndex) -> Result<CloseOutcome, TabError> {
        if index >= self.tabs.len() {
            return Err(TabError::InvalidTabIndex {
                index,
                len: self.tabs.len(),
            });
        }

        let mut tab = self.tabs.remove(index);
        log::info!("Closing tab {} (index {})", tab.id, index);

        if let Err(e) = tab.widget.kill() {
            log::warn!("Failed to terminate child of tab {}: {:#}", tab.id, e);
        }

        // If we closed the active tab, switch to another
        if self.active_tab_id == Some(tab.id) {
            self.active_tab_id = if self.tabs.is_empty() {
                None
            } else {
                // Prefer the tab at the same index (or previous if at end)
                let new_idx = index.min(self.tabs.len() - 1);
                Some(self.tabs[new_idx].id)
            };
        }

        self.renumber_default_tabs();

        if self.tabs.is_empty() {
            log::info!("Last tab closed");
            Ok(CloseOutcome::WindowShouldClose)
        } else {
            Ok(CloseOutcome::TabsRemain)
        }
    }

    /// Remove every tab without signalling that the window should close
    pub fn clear(&mut self) {
        self.active_tab_id = None;
        for mut tab in self.tabs.drain(..) {
            if let Err(e) = tab.widget.kill() {
                log::warn!("Failed to terminate child of tab {}: {:#}", tab.id, e);
            }
        }
        log::debug!("Cleared all tabs");
    }

    /// Focus the tab at `index`
    pub fn activate(&mut self, index: TabIndex) -> Result<(), TabError> {
        let id = self
            .tabs
            .get(index)
            .map(|t| t.id)
            .ok_or(TabError::InvalidTabIndex {
                index,
                len: self.tabs.len(),
            })?;
        self.active_tab_id = Some(id);
        log::debug!("Switched to tab {}", id);
        Ok(())
    }

    /// Switch to the next tab (wraps around)
    pub fn next_tab(&mut self) {
        if self.tabs.len() <= 1 {
            return;
        }

        if let Some(current_idx) = self.active_tab_index() {
            let next_idx = (current_idx + 1) % self.tabs.len();
            self.active_tab_id = Some(self.tabs[next_idx].id);
        }
    }

    /// Switch to the previous tab (wraps around)
    pub fn prev_tab(&mut self) {
        if self.tabs.len() <= 1 {
            return;
        }

        if let Some(current_idx) = self.active_tab_index() {
            let prev_idx = if current_idx == 0 {
                self.tabs.len() - 1
            } else {
                current_idx - 1
            };
            self.active_tab_id = Some(self.tabs[prev_idx].id);
        }
    }

    /// The child behind `handle` exited: close its tab
    ///
    /// Returns `None` when no tab owns the handle, e.g. because the user
    /// already closed it.
    pub fn on_child_exited(&mut self, handle: TerminalHandle) -> Option<CloseOutcome> {
        let Some(index) = self.index_of(handle) else {
            log::debug!("Exit of {} ignored: no owning tab", handle);
            return None;
        };
        self.close(index).ok()
    }

    /// The child behind `handle` set its window title
    ///
    /// An empty title puts the tab back on its positional default label.
    pub fn on_title_changed(&mut self, handle: TerminalHandle, title: &str) -> bool {
        let Some(index) = self.index_of(handle) else {
            return false;
        };
        let tab = &mut self.tabs[index];
        if title.trim().is_empty() {
            tab.has_default_title = true;
            tab.set_default_title(index + 1);
        } else {
            tab.set_title(title);
        }
        true
    }

    /// Push a theme's colours to every open tab
    pub fn apply_theme(&mut self, theme: &Theme) {
        for tab in &mut self.tabs {
            tab.widget.set_colors(theme);
        }
    }

    /// Grow the active tab's font by one point; returns the new size
    pub fn zoom_in(&mut self) -> Option<u32> {
        self.zoom_active(|size| size.saturating_add(1))
    }

    /// Shrink the active tab's font by one point; returns the new size
    pub fn zoom_out(&mut self) -> Option<u32> {
        self.zoom_active(|size| size.saturating_sub(1))
    }

    /// Reset the active tab's font to `default`
    pub fn zoom_reset(&mut self, default: u32) -> Option<u32> {
        self.zoom_active(|_| default)
    }

    fn zoom_active(&mut self, step: impl FnOnce(u32) -> u32) -> Option<u32> {
        let tab = self.active_tab_mut()?;
        let size = Config::clamp_font_size(step(tab.font_size));
        tab.set_font_size(size);
        log::debug!("Tab {} font size now {}", tab.id, size);
        Some(size)
    }

    /// Renumber tabs that have default titles based on their current position
    fn renumber_default_tabs(&mut self) {
        for (idx, tab) in self.tabs.iter_mut().enumerate() {
            tab.set_default_title(idx + 1);
        }
    }

    fn index_of(&self, handle: TerminalHandle) -> Option<TabIndex> {
        self.tabs.iter().position(|t| t.id == handle.0)
    }

    /// Get a reference to the active tab
    pub fn active_tab(&self) -> Option<&Tab<S::Widget>> {
        self.active_tab_id
            .and_then(|id| self.tabs.iter().find(|t| t.id == id))
    }

    /// Get a mutable reference to the active tab
    pub fn active_tab_mut(&mut self) -> Option<&mut Tab<S::Widget>> {
        let active_id = self.active_tab_id;
        active_id.and_then(move |id| self.tabs.iter_mut().find(|t| t.id == id))
    }

    /// Get index of active tab (0-based)
    pub fn active_tab_index(&self) -> Option<TabIndex> {
        self.active_tab_id
            .and_then(|id| self.tabs.iter().position(|t| t.id == id))
    }

    /// Get the number of tabs
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Get all tabs as a slice
    pub fn tabs(&self) -> &[Tab<S::Widget>] {
        &self.tabs
    }

    /// Get the tab owning a terminal handle
    pub fn get_tab(&self, handle: TerminalHandle) -> Option<&Tab<S::Widget>> {
        self.tabs.iter().find(|t| t.id == handle.0)
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    pub fn spawner_mut(&mut self) -> &mut S {
        &mut self.spawner
    }
}

/// Build the spawn request for a new tab
fn spawn_config(initial_state: Option<&TabState>, config: &Config) -> SpawnConfig {
    let working_directory = match initial_state {
        Some(snapshot) => validate_cwd(&snapshot.cwd),
        None => home_dir(),
    };

    let mut env: Vec<(String, String)> = initial_state
        .map(|snapshot| filter_environment(snapshot.env.iter().cloned()))
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| {
            let (name, value) = entry.split_once('=')?;
            (!name.is_empty()).then(|| (name.to_string(), value.to_string()))
        })
        .collect();
    // Applied last so the configured emulation wins over a saved TERM
    env.push(("TERM".to_string(), config.emulation.clone()));

    SpawnConfig {
        argv: vec![config.shell.clone()],
        working_directory,
        env,
        scrollback_lines: config.scrollback_lines,
        initial_lines: initial_state
            .map(|snapshot| snapshot.scrollback.clone())
            .unwrap_or_default(),
        cols: config.cols,
        rows: config.rows,
    }
}
