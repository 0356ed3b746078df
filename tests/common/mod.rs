//! Shared integration test helpers for sugar-term.
//!
//! This module provides canonical factory functions and test isolation
//! utilities used across the `tests/` integration test suite.
//!
//! # Usage
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{TestContext, manager_with_tabs};
//! ```
//!
//! Note: Rust integration tests use `mod common;` (not `use`) to bring in
//! helpers from `tests/common/mod.rs`. The `#[allow(dead_code)]` attributes
//! suppress warnings when only a subset of helpers are used per file.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sugar_term::app::{App, AppState};
use sugar_term::config::Config;
use sugar_term::tab::TabManager;
use sugar_term_terminal::stub::{StubProcessTable, StubSpawner};
use tempfile::TempDir;

pub type StubApp = App<StubSpawner, StubProcessTable>;

/// Default app state: default config, light theme
pub fn app_state() -> AppState {
    AppState::new(Config::default())
}

/// A registry over stub terminals with `count` fresh tabs; the last is active
pub fn manager_with_tabs(count: usize) -> TabManager<StubSpawner> {
    let state = app_state();
    let mut manager = TabManager::new(StubSpawner::new());
    for _ in 0..count {
        manager.open(None, &state).expect("stub spawn");
    }
    manager
}

/// Everything written to an app's output, readable after the app took
/// ownership of the writer
#[derive(Clone, Default)]
pub struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Provides test isolation with automatic resource cleanup.
///
/// Wraps a `TempDir` holding the session file, removed when the context is
/// dropped.
pub struct TestContext {
    /// Temporary directory, kept alive for the lifetime of the context.
    pub dir: TempDir,
    /// Config instance for the test.
    pub config: Config,
}

impl TestContext {
    /// Create a new `TestContext` with a fresh temp dir and default config.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            dir,
            config: Config::default(),
        }
    }

    /// Return the path to the temporary directory root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Session file inside the temp dir (not created)
    pub fn session_path(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    /// App over stub terminals using this context's config and session path
    pub fn app(&self) -> (StubApp, SharedOutput) {
        self.app_with_table(StubProcessTable::new())
    }

    pub fn app_with_table(&self, table: StubProcessTable) -> (StubApp, SharedOutput) {
        let output = SharedOutput::default();
        let app = App::new(
            AppState::new(self.config.clone()),
            StubSpawner::new(),
            table,
            self.session_path(),
        )
        .with_output(Box::new(output.clone()));
        (app, output)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
