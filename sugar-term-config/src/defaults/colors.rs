//! Default values for colour settings.

use crate::themes::ThemeKind;

pub fn theme() -> ThemeKind {
    ThemeKind::Light
}

// Used only when `theme: custom`
pub fn fg_color() -> String {
    "#000000".to_string()
}

pub fn bg_color() -> String {
    "#FFFFFF".to_string()
}
