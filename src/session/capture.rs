//! Capture the current session state from the tab registry

use super::{SessionDocument, TabState, filter_environment, home_dir};
use crate::app::AppState;
use crate::tab::{Tab, TabManager};
use sugar_term_terminal::{ProcessTable, TerminalSpawner, TerminalWidget};

/// Snapshot every open tab, in registry order
pub fn capture_session<S, P>(
    manager: &TabManager<S>,
    state: &AppState,
    process_table: &mut P,
) -> SessionDocument
where
    S: TerminalSpawner,
    P: ProcessTable + ?Sized,
{
    let tabs: Vec<TabState> = manager
        .tabs()
        .iter()
        .map(|tab| capture_tab(tab, process_table))
        .collect();

    let current_tab = manager.active_tab_index().unwrap_or(0) as i64;

    let mut doc = SessionDocument {
        current_tab,
        tabs,
        ..Default::default()
    };
    doc.set_theme(&state.theme);

    log::debug!(
        "Captured session: {} tabs, current {}, theme {}",
        doc.tabs.len(),
        doc.current_tab,
        doc.theme.as_str()
    );
    doc
}

/// Snapshot a single tab.
///
/// A child that is gone (or never had a pid) is not an error: the tab keeps
/// its scrollback and gets the home directory and an empty environment.
pub fn capture_tab<W, P>(tab: &Tab<W>, process_table: &mut P) -> TabState
where
    W: TerminalWidget,
    P: ProcessTable + ?Sized,
{
    let info = match tab.process_id() {
        Some(pid) => match process_table.lookup(pid) {
            Ok(info) => Some(info),
            Err(e) => {
                log::debug!("Tab {}: {}, saving defaults", tab.id, e);
                None
            }
        },
        None => {
            log::debug!("Tab {} has no child process, saving defaults", tab.id);
            None
        }
    };

    let (cwd, env) = match info {
        Some(info) => {
            let cwd = info
                .cwd
                .filter(|dir| dir.is_dir())
                .unwrap_or_else(home_dir);
            (cwd, filter_environment(info.environ))
        }
        None => (home_dir(), Vec::new()),
    };

    TabState {
        env,
        cwd: cwd.to_string_lossy().into_owned(),
        font_size: tab.font_size,
        scrollback: tab.widget.buffer_text(),
    }
}
