//! Terminal configuration management.
//!
//! # Sub-modules
//!
//! - [`persistence`]: `impl Config` methods for load/save and path resolution

pub mod persistence;

use crate::defaults;
use crate::error::ConfigError;
use crate::themes::{Color, Theme, ThemeKind};
use serde::{Deserialize, Serialize};

/// Smallest per-tab font size reachable by zooming out
pub const MIN_FONT_SIZE: u32 = 4;

/// Largest per-tab font size reachable by zooming in
pub const MAX_FONT_SIZE: u32 = 48;

/// Activity-wide terminal configuration, stored as YAML.
///
/// Every key is optional in the file; missing keys take the defaults from
/// [`crate::defaults`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Program spawned in every new tab
    #[serde(default = "defaults::shell")]
    pub shell: String,

    /// Font size for tabs that have not been zoomed
    #[serde(default = "defaults::font_size")]
    pub font_size: u32,

    /// Scrollback lines retained per tab
    #[serde(default = "defaults::scrollback_lines")]
    pub scrollback_lines: usize,

    /// Terminal type advertised to children through `TERM`
    #[serde(default = "defaults::emulation")]
    pub emulation: String,

    /// Colour scheme applied at startup when no session overrides it
    #[serde(default = "defaults::theme")]
    pub theme: ThemeKind,

    /// Foreground colour for `theme: custom`
    #[serde(default = "defaults::fg_color")]
    pub fg_color: String,

    /// Background colour for `theme: custom`
    #[serde(default = "defaults::bg_color")]
    pub bg_color: String,

    /// PTY width in columns
    #[serde(default = "defaults::cols")]
    pub cols: u16,

    /// PTY height in rows
    #[serde(default = "defaults::rows")]
    pub rows: u16,

    /// Restore the previous session on startup
    #[serde(default = "defaults::restore_session")]
    pub restore_session: bool,

    /// Save the session on shutdown
    #[serde(default = "defaults::save_session")]
    pub save_session: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shell: defaults::shell(),
            font_size: defaults::font_size(),
            scrollback_lines: defaults::scrollback_lines(),
            emulation: defaults::emulation(),
            theme: defaults::theme(),
            fg_color: defaults::fg_color(),
            bg_color: defaults::bg_color(),
            cols: defaults::cols(),
            rows: defaults::rows(),
            restore_session: defaults::restore_session(),
            save_session: defaults::save_session(),
        }
    }
}

impl Config {
    /// Check field values that serde cannot enforce on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shell.trim().is_empty() {
            return Err(ConfigError::Validation("shell must not be empty".into()));
        }
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size) {
            return Err(ConfigError::Validation(format!(
                "font_size {} is outside {}..={}",
                self.font_size, MIN_FONT_SIZE, MAX_FONT_SIZE
            )));
        }
        if self.scrollback_lines == 0 {
            return Err(ConfigError::Validation(
                "scrollback_lines must be at least 1".into(),
            ));
        }
        if self.emulation.trim().is_empty() {
            return Err(ConfigError::Validation("emulation must not be empty".into()));
        }
        if self.cols == 0 || self.rows == 0 {
            return Err(ConfigError::Validation(format!(
                "terminal size {}x{} must be non-zero",
                self.cols, self.rows
            )));
        }
        for (key, value) in [("fg_color", &self.fg_color), ("bg_color", &self.bg_color)] {
            if Color::from_hex(value).is_none() {
                return Err(ConfigError::Validation(format!(
                    "{key} '{value}' is not a #RRGGBB colour"
                )));
            }
        }
        Ok(())
    }

    /// The theme this configuration asks for.
    ///
    /// Custom colours are validated on load, so the light fallback only
    /// applies to a hand-built `Config` with bad hex strings.
    pub fn load_theme(&self) -> Theme {
        match self.theme {
            ThemeKind::Custom => {
                match (
                    Color::from_hex(&self.fg_color),
                    Color::from_hex(&self.bg_color),
                ) {
                    (Some(fg), Some(bg)) => Theme::custom(fg, bg),
                    _ => {
                        log::warn!(
                            "Invalid custom colours fg={} bg={}, using light theme",
                            self.fg_color,
                            self.bg_color
                        );
                        Theme::light()
                    }
                }
            }
            kind => Theme::named(kind).unwrap_or_default(),
        }
    }

    /// Clamp a font size into the zoomable range
    pub fn clamp_font_size(size: u32) -> u32 {
        size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
    }
}
