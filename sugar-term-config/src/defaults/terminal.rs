//! Default values for terminal-behaviour settings.

/// The user's login shell, or `/bin/sh` when `$SHELL` is unset
pub fn shell() -> String {
    std::env::var("SHELL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "/bin/sh".to_string())
}

pub fn font_size() -> u32 {
    8
}

pub fn scrollback_lines() -> usize {
    1000
}

pub fn emulation() -> String {
    "xterm".to_string()
}

pub fn cols() -> u16 {
    80
}

pub fn rows() -> u16 {
    24
}

pub fn restore_session() -> bool {
    true
}

pub fn save_session() -> bool {
    true
}
