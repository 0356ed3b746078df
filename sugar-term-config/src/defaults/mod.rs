//! Default value functions for configuration.
//!
//! Each sub-module groups related `default_*` free functions used as
//! `#[serde(default = "crate::defaults::...")]` attributes on `Config` fields.

mod colors;
mod terminal;

// ── Colours & theme ────────────────────────────────────────────────────────
pub use colors::{bg_color, fg_color, theme};

// ── Terminal behaviour ─────────────────────────────────────────────────────
pub use terminal::{
    cols, emulation, font_size, restore_session, rows, save_session, scrollback_lines, shell,
};
