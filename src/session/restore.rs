//! Rebuild the tab registry from a session document

use super::SessionDocument;
use crate::app::AppState;
use crate::tab::TabManager;
use anyhow::Result;
use sugar_term_terminal::TerminalSpawner;

/// Replace every open tab with the tabs recorded in `doc`.
///
/// Always leaves at least one tab open. A snapshot whose shell fails to
/// spawn is skipped; if none could be opened a default tab is tried, and
/// only that failure is returned.
pub fn restore_session<S: TerminalSpawner>(
    doc: &SessionDocument,
    manager: &mut TabManager<S>,
    state: &mut AppState,
) -> Result<()> {
    manager.clear();
    state.theme = doc.resolve_theme();

    for (idx, snapshot) in doc.tabs.iter().enumerate() {
        if let Err(e) = manager.open(Some(snapshot), state) {
            log::error!("Session restore: failed to open tab {}: {:#}", idx, e);
        }
    }

    if manager.is_empty() {
        log::info!("Session restore: no tabs restored, opening a default tab");
        manager.open(None, state)?;
    }

    let current = doc.clamped_current_tab(manager.tab_count());
    manager.activate(current)?;
    manager.apply_theme(&state.theme);

    log::info!(
        "Restored session: {} tabs, active {}, theme {}",
        manager.tab_count(),
        current,
        state.theme.kind.as_str()
    );
    Ok(())
}
