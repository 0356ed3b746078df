//! Application shell: owns the tab registry and dispatches events to it
//!
//! Terminal events (child exit, title change, output) and driver lines from
//! stdin arrive on one single-threaded loop. Nothing else touches the
//! registry, so it needs no locking.

pub mod input;

use crate::session::capture::capture_session;
use crate::session::restore::restore_session;
use crate::session::storage::{load_session_from, save_session_to};
use crate::tab::{CloseOutcome, TabManager};
use crate::url_detection::{self, DetectedLink};
use anyhow::Result;
use input::{Command, HELP, parse_line};
use std::io::Write;
use std::path::{Path, PathBuf};
use sugar_term_config::{Config, Theme};
use sugar_term_terminal::{EventReceiver, ProcessTable, TerminalEvent, TerminalSpawner, TerminalWidget};
use tokio::sync::mpsc::UnboundedReceiver;

/// Configuration and theme shared by registry and serializer operations
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub theme: Theme,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let theme = config.load_theme();
        Self { config, theme }
    }
}

/// Whether the event loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppFlow {
    Continue,
    Quit,
}

/// Main application state
pub struct App<S: TerminalSpawner, P: ProcessTable> {
    pub state: AppState,
    pub tabs: TabManager<S>,
    process_table: P,
    session_path: PathBuf,
    /// Links from the last `:links` listing
    links: Vec<DetectedLink>,
    output: Box<dyn Write>,
}

impl<S: TerminalSpawner, P: ProcessTable> App<S, P> {
    /// Create a new application writing to stdout
    pub fn new(state: AppState, spawner: S, process_table: P, session_path: PathBuf) -> Self {
        Self {
            state,
            tabs: TabManager::new(spawner),
            process_table,
            session_path,
            links: Vec::new(),
            output: Box::new(std::io::stdout()),
        }
    }

    /// Send terminal output and notices somewhere other than stdout
    pub fn with_output(mut self, output: Box<dyn Write>) -> Self {
        self.output = output;
        self
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    /// Open the first tabs: the saved session if asked for and present,
    /// otherwise a single fresh tab
    pub fn start(&mut self, restore: bool) -> Result<()> {
        if restore {
            self.load_session()?;
        }
        if self.tabs.is_empty() {
            self.tabs.open(None, &self.state)?;
        }
        log::info!("Started with {} tabs", self.tabs.tab_count());
        Ok(())
    }

    /// Replace the open tabs with the saved session.
    ///
    /// Returns whether a session was restored. A missing file leaves the
    /// registry alone; an unreadable or corrupt one replaces it with a
    /// single fresh tab.
    pub fn load_session(&mut self) -> Result<bool> {
        match load_session_from(&self.session_path) {
            Ok(Some(doc)) => {
                restore_session(&doc, &mut self.tabs, &mut self.state)?;
                Ok(true)
            }
            Ok(None) => {
                log::info!("No saved session at {:?}", self.session_path);
                Ok(false)
            }
            Err(e) => {
                log::warn!("Discarding saved session: {}", e);
                self.notice(&format!("saved session unusable ({}), starting fresh", e));
                self.tabs.clear();
                self.tabs.open(None, &self.state)?;
                self.tabs.apply_theme(&self.state.theme);
                Ok(false)
            }
        }
    }

    /// Snapshot the open tabs into the session file
    pub fn save_session(&mut self) -> Result<()> {
        let doc = capture_session(&self.tabs, &self.state, &mut self.process_table);
        save_session_to(&doc, &self.session_path)
    }

    /// Dispatch one event from the terminal collaborator
    pub fn handle_terminal_event(&mut self, event: TerminalEvent) -> AppFlow {
        match event {
            TerminalEvent::ChildExited { handle, exit_code } => {
                log::info!("Child of {} exited with {:?}", handle, exit_code);
                match self.tabs.on_child_exited(handle) {
                    Some(CloseOutcome::WindowShouldClose) => AppFlow::Quit,
                    _ => AppFlow::Continue,
                }
            }
            TerminalEvent::TitleChanged { handle, title } => {
                self.tabs.on_title_changed(handle, &title);
                AppFlow::Continue
            }
            TerminalEvent::Output { handle, bytes } => {
                if self.tabs.active_tab().is_some_and(|t| t.handle() == handle) {
                    self.emit(&bytes);
                }
                AppFlow::Continue
            }
        }
    }

    /// Parse and run one driver line, reporting errors to the output
    pub fn handle_line(&mut self, line: &str) -> AppFlow {
        let command = match parse_line(line) {
            Ok(command) => command,
            Err(e) => {
                self.notice(&e.to_string());
                return AppFlow::Continue;
            }
        };
        match self.handle_command(command) {
            Ok(flow) => flow,
            Err(e) => {
                log::error!("Command failed: {:#}", e);
                self.notice(&format!("error: {:#}", e));
                AppFlow::Continue
            }
        }
    }

    /// Run one driver command
    pub fn handle_command(&mut self, command: Command) -> Result<AppFlow> {
        match command {
            Command::NewTab => {
                let index = self.tabs.open(None, &self.state)?;
                self.announce_active();
                log::debug!("New tab at index {}", index);
            }
            Command::CloseTab(number) => {
                let index = match number {
                    // 0 wraps to an out-of-range index and is rejected below
                    Some(n) => n.wrapping_sub(1),
                    None => self.tabs.active_tab_index().unwrap_or(0),
                };
                match self.tabs.close(index) {
                    Ok(CloseOutcome::WindowShouldClose) => return Ok(AppFlow::Quit),
                    Ok(CloseOutcome::TabsRemain) => self.announce_active(),
                    Err(e) => {
                        log::warn!("Ignoring close: {}", e);
                        self.notice(&e.to_string());
                    }
                }
            }
            Command::NextTab => {
                self.tabs.next_tab();
                self.announce_active();
            }
            Command::PrevTab => {
                self.tabs.prev_tab();
                self.announce_active();
            }
            Command::SwitchTab(number) => match self.tabs.activate(number.wrapping_sub(1)) {
                Ok(()) => self.announce_active(),
                Err(e) => {
                    log::warn!("Ignoring tab switch: {}", e);
                    self.notice(&e.to_string());
                }
            },
            Command::ZoomIn => self.report_zoom(|tabs| tabs.zoom_in()),
            Command::ZoomOut => self.report_zoom(|tabs| tabs.zoom_out()),
            Command::ZoomReset => {
                let default = self.state.config.font_size;
                self.report_zoom(|tabs| tabs.zoom_reset(default));
            }
            Command::SetTheme(theme) => {
                self.state.theme = theme;
                self.tabs.apply_theme(&theme);
                self.notice(&format!("theme: {}", theme.kind.as_str()));
            }
            Command::Save => {
                self.save_session()?;
                self.notice(&format!("session saved to {}", self.session_path.display()));
            }
            Command::Load => {
                if !self.session_path.exists() {
                    self.notice("no saved session");
                } else if self.load_session()? {
                    self.announce_active();
                }
            }
            Command::Links => self.list_links(),
            Command::OpenLink(number) => match self.links.get(number.wrapping_sub(1)).cloned() {
                Some(link) => {
                    if let Err(e) = url_detection::open_link(&link) {
                        log::warn!("{}", e);
                        self.notice(&e);
                    }
                }
                None => self.notice(&format!("no link {} (run :links first)", number)),
            },
            Command::ListTabs => self.list_tabs(),
            Command::Help => self.notice(HELP),
            Command::Quit => return Ok(AppFlow::Quit),
            Command::Input(text) => {
                if let Some(tab) = self.tabs.active_tab_mut() {
                    tab.widget.write_input(&format!("{}\n", text))?;
                }
            }
        }
        Ok(AppFlow::Continue)
    }

    /// Save the session (unless disabled) and close every tab
    pub fn shutdown(&mut self) -> Result<()> {
        let result = if self.state.config.save_session {
            self.save_session()
        } else {
            log::info!("Session saving disabled, not saving");
            Ok(())
        };
        self.tabs.clear();
        result
    }

    /// Receive events until the last tab closes, `:quit`, or stdin ends
    pub async fn run(&mut self, mut events: EventReceiver, mut lines: UnboundedReceiver<String>) {
        loop {
            let flow = tokio::select! {
                Some(event) = events.recv() => self.handle_terminal_event(event),
                line = lines.recv() => match line {
                    Some(line) => self.handle_line(&line),
                    None => {
                        log::info!("Input closed");
                        AppFlow::Quit
                    }
                },
            };
            if flow == AppFlow::Quit {
                break;
            }
        }
    }

    fn report_zoom(&mut self, zoom: impl FnOnce(&mut TabManager<S>) -> Option<u32>) {
        if let Some(size) = zoom(&mut self.tabs) {
            self.notice(&format!("font size: {}", size));
        }
    }

    fn list_links(&mut self) {
        let lines = self
            .tabs
            .active_tab()
            .map(|t| t.widget.buffer_text())
            .unwrap_or_default();
        self.links = url_detection::detect_links_in_buffer(&lines);

        if self.links.is_empty() {
            self.notice("no links found");
            return;
        }
        let listing: Vec<String> = self
            .links
            .iter()
            .enumerate()
            .map(|(idx, link)| format!("{}. {}", idx + 1, link.target()))
            .collect();
        self.notice(&listing.join("\n"));
    }

    fn list_tabs(&mut self) {
        let active = self.tabs.active_tab_index();
        let listing: Vec<String> = self
            .tabs
            .tabs()
            .iter()
            .enumerate()
            .map(|(idx, tab)| {
                format!(
                    "{} {}. {} (pid {}, font {})",
                    if Some(idx) == active { '*' } else { ' ' },
                    idx + 1,
                    tab.label_text,
                    tab.process_id()
                        .map_or_else(|| "-".to_string(), |pid| pid.to_string()),
                    tab.font_size
                )
            })
            .collect();
        self.notice(&listing.join("\n"));
    }

    fn announce_active(&mut self) {
        if let (Some(index), Some(tab)) = (self.tabs.active_tab_index(), self.tabs.active_tab()) {
            let message = format!("tab {}/{}: {}", index + 1, self.tabs.tab_count(), tab.label_text);
            self.notice(&message);
        }
    }

    /// Print a driver message on its own line
    fn notice(&mut self, message: &str) {
        let text = format!("\r\n[sugar-term] {}\r\n", message.replace('\n', "\r\n"));
        self.emit(text.as_bytes());
    }

    fn emit(&mut self, bytes: &[u8]) {
        if let Err(e) = self
            .output
            .write_all(bytes)
            .and_then(|()| self.output.flush())
        {
            log::debug!("Failed to write output: {}", e);
        }
    }
}
