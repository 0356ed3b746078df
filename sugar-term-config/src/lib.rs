//! Configuration system for the sugar-term terminal activity.
//!
//! This crate provides configuration loading, saving, and default values
//! for the terminal activity. It includes:
//!
//! - Terminal settings (shell, scrollback, emulation, PTY size)
//! - Theme definitions (light, dark, custom colours)
//! - Typed configuration errors

pub mod config;
pub mod defaults;
pub mod error;
pub mod themes;

// Re-export main types for convenience
pub use config::{Config, MAX_FONT_SIZE, MIN_FONT_SIZE};
pub use error::ConfigError;
pub use themes::{Color, Theme, ThemeKind};
