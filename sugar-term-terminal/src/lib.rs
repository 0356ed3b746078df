//! Terminal collaborator for the sugar-term terminal activity.
//!
//! This crate provides everything the tab registry delegates:
//!
//! - `TerminalWidget` / `TerminalSpawner`: the contract a terminal backend fulfils
//! - `PtyTerminal` / `PtySpawner`: a PTY-backed implementation
//! - `TerminalEvent`: child-exit, title-change and output notifications
//! - `ProcessTable`: cwd and initial environment lookup by pid
//! - `stub` (feature `test-support`): deterministic doubles for tests

pub mod events;
pub mod process_table;
#[cfg(feature = "test-support")]
pub mod stub;
pub mod terminal;
pub mod widget;

// Re-export main types for convenience
pub use events::{EventReceiver, EventSender, TerminalEvent, TerminalHandle, event_channel};
pub use process_table::{ProcessInfo, ProcessTable, ProcessTableError, SysinfoProcessTable};
pub use terminal::{PtySpawner, PtyTerminal};
pub use widget::{SpawnConfig, TerminalSpawner, TerminalWidget};

// Re-export theme types that are part of the widget API
pub use sugar_term_config::{Color, Theme};
