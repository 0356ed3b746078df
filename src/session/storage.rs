//! File I/O for session persistence
//!
//! Sessions are stored as JSON in `~/.config/sugar-term/session.json`

use super::SessionDocument;
use crate::error::SessionError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use sugar_term_config::Config;

/// Get the path to the session file
pub fn session_path() -> PathBuf {
    Config::config_dir().join("session.json")
}

/// Parse a session document from raw file contents
pub fn parse_session(bytes: &[u8]) -> Result<SessionDocument, SessionError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Save a session document to a specific file
///
/// Written to a sibling temp file first and renamed into place, so a crash
/// mid-write never leaves a truncated document behind.
pub fn save_session_to(doc: &SessionDocument, path: &Path) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create session directory {:?}", parent))?;
    }

    let contents =
        serde_json::to_string_pretty(doc).context("Failed to serialize session document")?;

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, contents)
        .with_context(|| format!("Failed to write session to {:?}", temp_path))?;
    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to move session into place at {:?}", path))?;

    log::info!("Saved session ({} tabs) to {:?}", doc.tabs.len(), path);
    Ok(())
}

/// Load a session document from a specific file
///
/// Returns `None` if the file doesn't exist or is blank.
/// Returns `SessionError::Corrupt` if the file exists but does not parse.
pub fn load_session_from(path: &Path) -> Result<Option<SessionDocument>, SessionError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read(path).map_err(|source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if contents.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let doc = parse_session(&contents)?;

    log::info!("Loaded session ({} tabs) from {:?}", doc.tabs.len(), path);
    Ok(Some(doc))
}
