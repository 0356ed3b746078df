//! PTY backend tests against real child processes.
//!
//! Unix only: they run `/bin/sh` and `sleep`. Events are polled from the
//! channel with a deadline instead of running an event loop.

#![cfg(unix)]

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use sugar_term_terminal::{
    EventReceiver, PtySpawner, SpawnConfig, TerminalEvent, TerminalHandle, TerminalSpawner,
    TerminalWidget, event_channel,
};
use tokio::sync::mpsc::error::TryRecvError;

const TIMEOUT: Duration = Duration::from_secs(10);

fn config(argv: &[&str]) -> SpawnConfig {
    SpawnConfig {
        argv: argv.iter().map(|s| s.to_string()).collect(),
        working_directory: PathBuf::from("/"),
        env: vec![("TERM".to_string(), "xterm".to_string())],
        scrollback_lines: 100,
        initial_lines: Vec::new(),
        cols: 80,
        rows: 24,
    }
}

fn sh(script: &str) -> SpawnConfig {
    config(&["/bin/sh", "-c", script])
}

/// Poll until an event matches, or give up after `TIMEOUT`
fn wait_for(
    events: &mut EventReceiver,
    mut matches: impl FnMut(&TerminalEvent) -> bool,
) -> Option<TerminalEvent> {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        match events.try_recv() {
            Ok(event) if matches(&event) => return Some(event),
            Ok(_) => {}
            Err(TryRecvError::Empty) => thread::sleep(Duration::from_millis(10)),
            Err(TryRecvError::Disconnected) => return None,
        }
    }
    None
}

fn wait_for_exit(events: &mut EventReceiver, handle: TerminalHandle) -> Option<u32> {
    match wait_for(events, |e| {
        matches!(e, TerminalEvent::ChildExited { handle: h, .. } if *h == handle)
    }) {
        Some(TerminalEvent::ChildExited { exit_code, .. }) => exit_code,
        other => panic!("no exit event for {}: {:?}", handle, other),
    }
}

#[test]
fn test_output_and_exit_code() {
    let (tx, mut rx) = event_channel();
    let mut spawner = PtySpawner::new(tx);
    let handle = TerminalHandle(1);
    let terminal = spawner
        .spawn(handle, sh("printf 'hello\\nworld\\n'; exit 3"))
        .unwrap();
    assert!(terminal.process_id().is_some());

    assert_eq!(wait_for_exit(&mut rx, handle), Some(3));
    assert!(terminal.process_id().is_none());
    assert!(!terminal.is_running());

    let lines = terminal.buffer_text();
    assert!(lines.contains(&"hello".to_string()), "{:?}", lines);
    assert!(lines.contains(&"world".to_string()), "{:?}", lines);
}

#[test]
fn test_title_change_event() {
    let (tx, mut rx) = event_channel();
    let mut spawner = PtySpawner::new(tx);
    let handle = TerminalHandle(2);
    let terminal = spawner
        .spawn(handle, sh("printf '\\033]0;build: ok\\007'; sleep 0.2"))
        .unwrap();

    let event = wait_for(&mut rx, |e| matches!(e, TerminalEvent::TitleChanged { .. }));
    assert_eq!(
        event,
        Some(TerminalEvent::TitleChanged {
            handle,
            title: "build: ok".to_string()
        })
    );
    assert_eq!(terminal.title(), "build: ok");
    wait_for_exit(&mut rx, handle);
}

#[test]
fn test_spawn_uses_cwd_and_env() {
    let dir = tempfile::tempdir().unwrap();
    let canonical = dir.path().canonicalize().unwrap();

    let mut cfg = sh("pwd -P; echo \"greeting=$GREETING term=$TERM\"");
    cfg.working_directory = dir.path().to_path_buf();
    cfg.env.push(("GREETING".to_string(), "hi".to_string()));

    let (tx, mut rx) = event_channel();
    let handle = TerminalHandle(3);
    let terminal = PtySpawner::new(tx).spawn(handle, cfg).unwrap();
    wait_for_exit(&mut rx, handle);

    let lines = terminal.buffer_text();
    assert!(
        lines.contains(&canonical.to_string_lossy().into_owned()),
        "{:?}",
        lines
    );
    assert!(lines.contains(&"greeting=hi term=xterm".to_string()), "{:?}", lines);
}

#[test]
fn test_write_input_reaches_child() {
    let (tx, mut rx) = event_channel();
    let handle = TerminalHandle(4);
    let mut terminal = PtySpawner::new(tx)
        .spawn(handle, sh("read line; echo \"got $line\""))
        .unwrap();

    terminal.write_input("ping\n").unwrap();
    wait_for_exit(&mut rx, handle);
    assert!(terminal.buffer_text().contains(&"got ping".to_string()));
}

#[test]
fn test_kill_terminates_child() {
    let (tx, mut rx) = event_channel();
    let handle = TerminalHandle(5);
    let mut terminal = PtySpawner::new(tx)
        .spawn(handle, config(&["sleep", "30"]))
        .unwrap();
    assert!(terminal.is_running());

    terminal.kill().unwrap();
    wait_for_exit(&mut rx, handle);
    assert!(terminal.process_id().is_none());
    // Killing an exited child is not an error
    terminal.kill().unwrap();
}

#[test]
fn test_saved_lines_come_before_child_output() {
    let (tx, mut rx) = event_channel();
    let handle = TerminalHandle(6);
    let mut spawn = sh("printf PROMPT");
    spawn.initial_lines = vec![
        "saved one".to_string(),
        String::new(),
        "x".repeat(100),
    ];
    let terminal = PtySpawner::new(tx).spawn(handle, spawn).unwrap();

    wait_for_exit(&mut rx, handle);
    assert_eq!(
        terminal.buffer_text(),
        vec![
            "saved one".to_string(),
            String::new(),
            "x".repeat(100),
            "PROMPT".to_string()
        ]
    );
}

#[test]
fn test_spawn_failure_is_an_error() {
    let (tx, _rx) = event_channel();
    let mut spawner = PtySpawner::new(tx);
    let result = spawner.spawn(TerminalHandle(7), config(&["/nonexistent/binary/sugar-term-test"]));
    assert!(result.is_err());
    assert!(spawner.spawn(TerminalHandle(8), config(&[])).is_err());
}
