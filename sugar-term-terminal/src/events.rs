//! Notifications delivered by terminal backends to the UI loop.
//!
//! Backends run their I/O on their own threads and only ever talk to the UI
//! loop through this channel, so the tab registry stays single-threaded.

use std::fmt;
use tokio::sync::mpsc;

/// Opaque identifier tying a notification to the terminal that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerminalHandle(pub u64);

impl fmt::Display for TerminalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "term-{}", self.0)
    }
}

/// An event raised by a terminal backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// The child process behind the terminal exited
    ChildExited {
        handle: TerminalHandle,
        /// Exit code, when the backend could collect it
        exit_code: Option<u32>,
    },
    /// The child set a new window title (OSC 0/2)
    TitleChanged {
        handle: TerminalHandle,
        title: String,
    },
    /// Raw bytes the child wrote to the terminal
    Output {
        handle: TerminalHandle,
        bytes: Vec<u8>,
    },
}

impl TerminalEvent {
    pub fn handle(&self) -> TerminalHandle {
        match self {
            TerminalEvent::ChildExited { handle, .. }
            | TerminalEvent::TitleChanged { handle, .. }
            | TerminalEvent::Output { handle, .. } => *handle,
        }
    }
}

pub type EventSender = mpsc::UnboundedSender<TerminalEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<TerminalEvent>;

/// Create the channel terminal backends report through
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
