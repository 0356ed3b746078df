/// Colour theme definitions for the terminal
use serde::{Deserialize, Serialize};
use std::fmt;

/// A color in RGB format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string (hex digits are case-insensitive)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as `#RRGGBB` with upper-case hex digits
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Which colour scheme is in effect.
///
/// Serialized in lower case (`light`, `dark`, `custom`), which is also the
/// spelling used by the session document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Light,
    Dark,
    Custom,
}

impl ThemeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeKind::Light => "light",
            ThemeKind::Dark => "dark",
            ThemeKind::Custom => "custom",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "light" => Some(ThemeKind::Light),
            "dark" => Some(ThemeKind::Dark),
            "custom" => Some(ThemeKind::Custom),
            _ => None,
        }
    }
}

/// Terminal colour theme: foreground and background for the whole activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub kind: ThemeKind,
    pub foreground: Color,
    pub background: Color,
}

impl Theme {
    /// Black text on white, the activity's stock look
    pub const fn light() -> Self {
        Self {
            kind: ThemeKind::Light,
            foreground: Color::new(0, 0, 0),
            background: Color::new(255, 255, 255),
        }
    }

    /// White text on black
    pub const fn dark() -> Self {
        Self {
            kind: ThemeKind::Dark,
            foreground: Color::new(255, 255, 255),
            background: Color::new(0, 0, 0),
        }
    }

    pub const fn custom(foreground: Color, background: Color) -> Self {
        Self {
            kind: ThemeKind::Custom,
            foreground,
            background,
        }
    }

    /// Build a named theme. `Custom` has no colours of its own, so it
    /// yields `None` here; use [`Theme::custom`] instead.
    pub fn named(kind: ThemeKind) -> Option<Self> {
        match kind {
            ThemeKind::Light => Some(Self::light()),
            ThemeKind::Dark => Some(Self::dark()),
            ThemeKind::Custom => None,
        }
    }

    /// Colours as `(fg, bg)` hex strings, only for custom themes
    pub fn custom_hex(&self) -> Option<(String, String)> {
        (self.kind == ThemeKind::Custom)
            .then(|| (self.foreground.to_hex(), self.background.to_hex()))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
