// Library exports for testing and potential library use
//
// # Threading
//
// The tab registry and the session serializer live on the single event-loop
// thread and are never locked. PTY reader threads and the stdin reader only
// send messages over `tokio::sync::mpsc` channels. The one lock in this crate
// is the `parking_lot::Mutex` around the debug log file.

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod cli;
pub mod debug;
pub mod error;
pub mod session;
pub mod tab;
pub mod url_detection;

// Re-export configuration crate
pub use sugar_term_config as config;

pub use app::{App, AppFlow, AppState};
pub use error::{SessionError, TabError};
pub use session::{SessionDocument, TabState};
pub use tab::{CloseOutcome, Tab, TabId, TabIndex, TabManager};
