//! Session document for save/restore across runs
//!
//! This module snapshots the tab registry into a JSON document on shutdown
//! (or on demand) and rebuilds the registry from it on the next launch.
//! Each tab keeps its working directory, initial environment, font size and
//! scrollback text; the document also records the active tab and the theme.

pub mod capture;
pub mod restore;
pub mod storage;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sugar_term_config::{Color, Theme, ThemeKind};

/// Environment variables never carried from one run to the next.
///
/// Both describe the parent of the old child and are wrong in any new one.
pub const ENV_DENY_LIST: &[&str] = &["DBUS_SESSION_BUS_ADDRESS", "PPID"];

/// Top-level session document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Index of the active tab; signed so bad values clamp instead of failing
    #[serde(rename = "current-tab", default)]
    pub current_tab: i64,
    #[serde(default)]
    pub theme: ThemeKind,
    /// Colours of a custom theme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_hex: Option<ThemeHex>,
    #[serde(default)]
    pub tabs: Vec<TabState>,
}

/// `#RRGGBB` colours of a custom theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeHex {
    pub fg_color: String,
    pub bg_color: String,
}

/// Snapshot of a single tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabState {
    /// `NAME=value` entries, deny-listed names removed
    #[serde(default)]
    pub env: Vec<String>,
    /// Working directory of the tab's shell
    #[serde(default)]
    pub cwd: String,
    #[serde(default = "sugar_term_config::defaults::font_size")]
    pub font_size: u32,
    /// Buffer text, one entry per row, oldest first
    #[serde(default)]
    pub scrollback: Vec<String>,
}

impl Default for TabState {
    fn default() -> Self {
        Self {
            env: Vec::new(),
            cwd: String::new(),
            font_size: sugar_term_config::defaults::font_size(),
            scrollback: Vec::new(),
        }
    }
}

impl SessionDocument {
    /// Record `theme` in the document
    pub fn set_theme(&mut self, theme: &Theme) {
        self.theme = theme.kind;
        self.theme_hex = theme
            .custom_hex()
            .map(|(fg_color, bg_color)| ThemeHex { fg_color, bg_color });
    }

    /// Theme the document asks for.
    ///
    /// A custom theme without usable colours falls back to light.
    pub fn resolve_theme(&self) -> Theme {
        match self.theme {
            ThemeKind::Custom => {
                let colors = self.theme_hex.as_ref().and_then(|hex| {
                    Some((Color::from_hex(&hex.fg_color)?, Color::from_hex(&hex.bg_color)?))
                });
                match colors {
                    Some((fg, bg)) => Theme::custom(fg, bg),
                    None => {
                        log::warn!(
                            "Session theme is custom but colours are missing or invalid ({:?}), using light",
                            self.theme_hex
                        );
                        Theme::light()
                    }
                }
            }
            kind => Theme::named(kind).unwrap_or_default(),
        }
    }

    /// `current_tab` clamped into `[0, tab_count - 1]` (0 when there are none)
    pub fn clamped_current_tab(&self, tab_count: usize) -> usize {
        if tab_count == 0 || self.current_tab <= 0 {
            return 0;
        }
        usize::try_from(self.current_tab)
            .unwrap_or(usize::MAX)
            .min(tab_count - 1)
    }
}

/// Name part of a `NAME=value` entry
fn env_name(entry: &str) -> &str {
    entry.split_once('=').map_or(entry, |(name, _)| name)
}

/// Drop deny-listed variables, keeping every other entry in order
pub fn filter_environment<I>(env: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    env.into_iter()
        .filter(|entry| !ENV_DENY_LIST.contains(&env_name(entry)))
        .collect()
}

/// The user's home directory, or `/` when it cannot be determined
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        home_dir()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Validate a working directory path, falling back to $HOME if invalid
pub fn validate_cwd(cwd: &str) -> PathBuf {
    if !cwd.is_empty() {
        let dir = expand_home(cwd);
        if Path::new(&dir).is_dir() {
            return dir;
        }
        log::warn!(
            "Session restore: directory '{}' no longer exists, falling back to home",
            cwd
        );
    }
    home_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_environment_removes_exactly_deny_list() {
        let env = strings(&[
            "HOME=/home/u",
            "PPID=123",
            "DBUS_SESSION_BUS_ADDRESS=unix:path=/run/bus",
            "PPIDX=1",
            "MY_PPID=2",
            "LANG=C",
        ]);
        assert_eq!(
            filter_environment(env),
            strings(&["HOME=/home/u", "PPIDX=1", "MY_PPID=2", "LANG=C"])
        );
    }

    #[test]
    fn test_filter_environment_matches_name_only() {
        let env = strings(&["NOTE=PPID=1", "PPID", "X=DBUS_SESSION_BUS_ADDRESS"]);
        assert_eq!(
            filter_environment(env),
            strings(&["NOTE=PPID=1", "X=DBUS_SESSION_BUS_ADDRESS"])
        );
    }

    #[test]
    fn test_serialized_keys() {
        let mut doc = SessionDocument {
            current_tab: 1,
            tabs: vec![TabState::default()],
            ..Default::default()
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["current-tab"], 1);
        assert_eq!(json["theme"], "light");
        assert!(json.get("theme_hex").is_none());
        assert_eq!(json["tabs"][0]["font_size"], 8);

        doc.set_theme(&Theme::custom(Color::new(0x11, 0x22, 0x33), Color::new(0xAA, 0xBB, 0xCC)));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["theme"], "custom");
        assert_eq!(json["theme_hex"]["fg_color"], "#112233");
        assert_eq!(json["theme_hex"]["bg_color"], "#AABBCC");
    }

    #[test]
    fn test_missing_fields_default() {
        let doc: SessionDocument = serde_json::from_str(r#"{"tabs": [{}]}"#).unwrap();
        assert_eq!(doc.current_tab, 0);
        assert_eq!(doc.theme, ThemeKind::Light);
        assert_eq!(doc.tabs, vec![TabState::default()]);
    }

    #[test]
    fn test_resolve_theme() {
        let mut doc = SessionDocument {
            theme: ThemeKind::Dark,
            ..Default::default()
        };
        assert_eq!(doc.resolve_theme(), Theme::dark());

        doc.theme = ThemeKind::Custom;
        assert_eq!(doc.resolve_theme(), Theme::light());

        doc.theme_hex = Some(ThemeHex {
            fg_color: "#00ff00".to_string(),
            bg_color: "#000000".to_string(),
        });
        assert_eq!(
            doc.resolve_theme(),
            Theme::custom(Color::new(0, 255, 0), Color::new(0, 0, 0))
        );

        doc.theme_hex = Some(ThemeHex {
            fg_color: "green".to_string(),
            bg_color: "#000000".to_string(),
        });
        assert_eq!(doc.resolve_theme(), Theme::light());
    }

    #[test]
    fn test_clamped_current_tab() {
        let mut doc = SessionDocument::default();
        for (current, count, expected) in [(0, 3, 0), (2, 3, 2), (5, 2, 1), (-4, 2, 0), (3, 0, 0)] {
            doc.current_tab = current;
            assert_eq!(doc.clamped_current_tab(count), expected, "current={current}");
        }
    }

    #[test]
    fn test_validate_cwd_existing_dir() {
        let dir = std::env::temp_dir();
        assert_eq!(validate_cwd(&dir.to_string_lossy()), dir);
    }

    #[test]
    fn test_validate_cwd_missing_dir_falls_back_to_home() {
        let result = validate_cwd("/nonexistent/path/that/does/not/exist");
        assert_eq!(result, home_dir());
    }

    #[test]
    fn test_validate_cwd_empty_falls_back_to_home() {
        assert_eq!(validate_cwd(""), home_dir());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("~"), home_dir());
        assert_eq!(expand_home("~/src"), home_dir().join("src"));
        assert_eq!(expand_home("/tmp/~x"), PathBuf::from("/tmp/~x"));
    }
}
