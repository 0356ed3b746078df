//! Tests for the application shell: event dispatch and driver commands
//!
//! Apps run over stub terminals with their output captured, and the session
//! file lives in a temp dir.

mod common;

use common::TestContext;
use sugar_term::app::AppFlow;
use sugar_term::app::input::Command;
use sugar_term::config::{Theme, ThemeKind};
use sugar_term::session::storage::{load_session_from, save_session_to};
use sugar_term::session::{SessionDocument, TabState};
use sugar_term_terminal::stub::StubProcessTable;
use sugar_term_terminal::{ProcessInfo, TerminalEvent, TerminalHandle};

// ============================================================================
// Startup
// ============================================================================

#[test]
fn test_start_without_session_opens_one_tab() {
    let ctx = TestContext::new();
    let (mut app, _) = ctx.app();
    app.start(true).unwrap();
    assert_eq!(app.tabs.tab_count(), 1);
}

#[test]
fn test_start_restores_saved_session() {
    let ctx = TestContext::new();
    let doc = SessionDocument {
        current_tab: 1,
        theme: ThemeKind::Dark,
        theme_hex: None,
        tabs: vec![TabState::default(), TabState::default()],
    };
    save_session_to(&doc, &ctx.session_path()).unwrap();

    let (mut app, _) = ctx.app();
    app.start(true).unwrap();
    assert_eq!(app.tabs.tab_count(), 2);
    assert_eq!(app.tabs.active_tab_index(), Some(1));
    assert_eq!(app.state.theme, Theme::dark());
}

#[test]
fn test_start_fresh_ignores_saved_session() {
    let ctx = TestContext::new();
    let doc = SessionDocument {
        tabs: vec![TabState::default(), TabState::default()],
        ..Default::default()
    };
    save_session_to(&doc, &ctx.session_path()).unwrap();

    let (mut app, _) = ctx.app();
    app.start(false).unwrap();
    assert_eq!(app.tabs.tab_count(), 1);
}

#[test]
fn test_corrupt_session_falls_back_to_single_tab() {
    let ctx = TestContext::new();
    std::fs::write(ctx.session_path(), "{\"tabs\": [{\"cwd\": ").unwrap();

    let (mut app, output) = ctx.app();
    app.start(true).unwrap();
    assert_eq!(app.tabs.tab_count(), 1);
    assert_eq!(app.tabs.active_tab_index(), Some(0));
    assert!(output.contents().contains("starting fresh"));
}

// ============================================================================
// Terminal events
// ============================================================================

#[test]
fn test_last_child_exit_quits() {
    let ctx = TestContext::new();
    let (mut app, _) = ctx.app();
    app.start(false).unwrap();
    app.handle_command(Command::NewTab).unwrap();

    let exit = |id| TerminalEvent::ChildExited {
        handle: TerminalHandle(id),
        exit_code: Some(0),
    };
    assert_eq!(app.handle_terminal_event(exit(1)), AppFlow::Continue);
    // A duplicate exit for a tab that is already gone changes nothing
    assert_eq!(app.handle_terminal_event(exit(1)), AppFlow::Continue);
    assert_eq!(app.handle_terminal_event(exit(2)), AppFlow::Quit);
    assert!(app.tabs.is_empty());
}

#[test]
fn test_title_event_relabels_tab() {
    let ctx = TestContext::new();
    let (mut app, _) = ctx.app();
    app.start(false).unwrap();
    let flow = app.handle_terminal_event(TerminalEvent::TitleChanged {
        handle: TerminalHandle(1),
        title: "vim notes.txt".to_string(),
    });
    assert_eq!(flow, AppFlow::Continue);
    assert_eq!(app.tabs.tabs()[0].label_text, "vim notes.txt");
}

#[test]
fn test_only_active_tab_output_is_shown() {
    let ctx = TestContext::new();
    let (mut app, output) = ctx.app();
    app.start(false).unwrap();
    app.handle_command(Command::NewTab).unwrap();
    output.clear();

    app.handle_terminal_event(TerminalEvent::Output {
        handle: TerminalHandle(1),
        bytes: b"background\r\n".to_vec(),
    });
    app.handle_terminal_event(TerminalEvent::Output {
        handle: TerminalHandle(2),
        bytes: b"foreground\r\n".to_vec(),
    });
    assert_eq!(output.contents(), "foreground\r\n");
}

// ============================================================================
// Driver commands
// ============================================================================

#[test]
fn test_plain_line_goes_to_active_shell() {
    let ctx = TestContext::new();
    let (mut app, _) = ctx.app();
    app.start(false).unwrap();
    app.handle_line("ls -la");
    app.handle_line("::not a command");
    assert_eq!(
        app.tabs.active_tab().unwrap().widget.input,
        "ls -la\n:not a command\n"
    );
}

#[test]
fn test_tab_commands() {
    let ctx = TestContext::new();
    let (mut app, _) = ctx.app();
    app.start(false).unwrap();
    app.handle_line(":new");
    app.handle_line(":new");
    assert_eq!(app.tabs.tab_count(), 3);

    app.handle_line(":tab 1");
    assert_eq!(app.tabs.active_tab_index(), Some(0));
    app.handle_line(":prev");
    assert_eq!(app.tabs.active_tab_index(), Some(2));
    app.handle_line(":next");
    assert_eq!(app.tabs.active_tab_index(), Some(0));

    app.handle_line(":close 2");
    assert_eq!(app.tabs.tab_count(), 2);
    app.handle_line(":close");
    assert_eq!(app.tabs.tab_count(), 1);
    assert_eq!(app.handle_line(":close"), AppFlow::Quit);
}

#[test]
fn test_invalid_index_is_reported_and_ignored() {
    let ctx = TestContext::new();
    let (mut app, output) = ctx.app();
    app.start(false).unwrap();
    assert_eq!(app.handle_line(":close 9"), AppFlow::Continue);
    assert_eq!(app.handle_line(":tab 4"), AppFlow::Continue);
    assert_eq!(app.handle_line(":bogus"), AppFlow::Continue);
    assert_eq!(app.tabs.tab_count(), 1);
    assert!(output.contents().contains("out of range"));
    assert!(output.contents().contains("unknown command"));
}

#[test]
fn test_zoom_and_theme_commands() {
    let ctx = TestContext::new();
    let (mut app, _) = ctx.app();
    app.start(false).unwrap();

    app.handle_line(":zoom+");
    app.handle_line(":zoom+");
    assert_eq!(app.tabs.active_tab().unwrap().font_size, 10);
    app.handle_line(":zoom-");
    assert_eq!(app.tabs.active_tab().unwrap().font_size, 9);
    app.handle_line(":zoom0");
    assert_eq!(app.tabs.active_tab().unwrap().font_size, 8);

    app.handle_line(":theme dark");
    assert_eq!(app.state.theme, Theme::dark());
    assert_eq!(
        app.tabs.active_tab().unwrap().widget.colors,
        Some(Theme::dark())
    );
}

#[test]
fn test_links_listing() {
    let ctx = TestContext::new();
    let (mut app, output) = ctx.app();
    app.start(false).unwrap();
    app.tabs.active_tab_mut().unwrap().widget.lines = vec![
        "$ cat README".to_string(),
        "docs: www.sugarlabs.org, mail dev@sugarlabs.org".to_string(),
    ];

    output.clear();
    app.handle_line(":links");
    let listing = output.contents();
    assert!(listing.contains("1. http://www.sugarlabs.org"));
    assert!(listing.contains("2. mailto:dev@sugarlabs.org"));

    output.clear();
    app.handle_line(":open 3");
    assert!(output.contents().contains("no link 3"));
}

#[test]
fn test_quit_command() {
    let ctx = TestContext::new();
    let (mut app, _) = ctx.app();
    app.start(false).unwrap();
    assert_eq!(app.handle_line(":quit"), AppFlow::Quit);
}

// ============================================================================
// Save and load
// ============================================================================

#[test]
fn test_save_and_load_commands() {
    let ctx = TestContext::new();
    let (mut app, _) = ctx.app();
    app.start(false).unwrap();
    app.handle_line(":new");
    app.handle_line(":zoom+");
    app.tabs.active_tab_mut().unwrap().widget.lines = vec!["kept".to_string()];
    app.handle_line(":save");

    app.handle_line(":close");
    app.handle_line(":theme dark");
    assert_eq!(app.tabs.tab_count(), 1);

    app.handle_line(":load");
    assert_eq!(app.tabs.tab_count(), 2);
    assert_eq!(app.tabs.active_tab_index(), Some(1));
    let active = app.tabs.active_tab().unwrap();
    assert_eq!(active.font_size, 9);
    assert_eq!(active.widget.lines, vec!["kept".to_string()]);
    assert_eq!(app.state.theme, Theme::light());
}

#[test]
fn test_shutdown_saves_session() {
    let ctx = TestContext::new();
    let mut table = StubProcessTable::new();
    table.insert(
        1000,
        ProcessInfo {
            cwd: Some(ctx.path().to_path_buf()),
            environ: vec!["PPID=1".to_string(), "EDITOR=nano".to_string()],
        },
    );
    let (mut app, _) = ctx.app_with_table(table);
    app.start(false).unwrap();
    app.shutdown().unwrap();

    assert!(app.tabs.is_empty());
    let doc = load_session_from(&ctx.session_path()).unwrap().unwrap();
    assert_eq!(doc.tabs.len(), 1);
    assert_eq!(doc.tabs[0].cwd, ctx.path().to_string_lossy());
    assert_eq!(doc.tabs[0].env, vec!["EDITOR=nano".to_string()]);
}

#[test]
fn test_shutdown_respects_save_session_setting() {
    let mut ctx = TestContext::new();
    ctx.config.save_session = false;
    let (mut app, _) = ctx.app();
    app.start(false).unwrap();
    app.shutdown().unwrap();
    assert!(!ctx.session_path().exists());
}
