use super::{PtyTerminal, scrollback};
use crate::events::{EventSender, TerminalEvent, TerminalHandle};
use crate::widget::{SpawnConfig, TerminalSpawner};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use portable_pty::{Child, CommandBuilder, PtySize, native_pty_system};
use std::io::{ErrorKind, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Spawns `PtyTerminal`s that report to one event channel
pub struct PtySpawner {
    events: EventSender,
}

impl PtySpawner {
    pub fn new(events: EventSender) -> Self {
        Self { events }
    }
}

impl TerminalSpawner for PtySpawner {
    type Widget = PtyTerminal;

    fn spawn(&mut self, handle: TerminalHandle, config: SpawnConfig) -> Result<PtyTerminal> {
        PtyTerminal::spawn(handle, config, self.events.clone())
    }
}

// ========================================================================
// Shell spawn methods
// ========================================================================

impl PtyTerminal {
    /// Open a PTY, start `config.argv` on it and begin pumping its output
    pub fn spawn(handle: TerminalHandle, config: SpawnConfig, events: EventSender) -> Result<Self> {
        let Some((program, args)) = config.argv.split_first() else {
            anyhow::bail!("Cannot spawn {}: empty argv", handle);
        };

        log::info!(
            "Spawning {:?} in PTY {} ({}x{}, dir: {:?}, env: {:?}, {} saved lines)",
            config.argv,
            handle,
            config.cols,
            config.rows,
            config.working_directory,
            config.env,
            config.initial_lines.len()
        );

        // Saved lines go in before the child exists, so nothing it prints
        // can land above them
        let mut parser = vt100::Parser::new(config.rows, config.cols, config.scrollback_lines);
        scrollback::replay_lines(&mut parser, &config.initial_lines);
        let parser = Arc::new(Mutex::new(parser));

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: config.rows,
                cols: config.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("Failed to open PTY")?;

        let mut cmd = CommandBuilder::new(program);
        cmd.args(args);
        cmd.cwd(&config.working_directory);
        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .with_context(|| format!("Failed to spawn {}", program))?;
        // The child holds its own copy of the slave side
        drop(pair.slave);

        let process_id = child.process_id();
        let killer = child.clone_killer();
        let reader = pair
            .master
            .try_clone_reader()
            .context("Failed to clone PTY reader")?;
        let writer = pair
            .master
            .take_writer()
            .context("Failed to take PTY writer")?;

        let exited = Arc::new(AtomicBool::new(false));

        {
            let parser = Arc::clone(&parser);
            let exited = Arc::clone(&exited);
            thread::Builder::new()
                .name(format!("pty-reader-{}", handle.0))
                .spawn(move || pump_output(handle, reader, child, parser, exited, events))
                .context("Failed to start PTY reader thread")?;
        }

        Ok(Self {
            handle,
            parser,
            _master: pair.master,
            writer,
            killer,
            process_id,
            exited,
            font_size: sugar_term_config::defaults::font_size(),
            colors: None,
        })
    }
}

/// Reader-thread body: feed output to the parser until the PTY closes,
/// then reap the child and report its exit
fn pump_output(
    handle: TerminalHandle,
    mut reader: Box<dyn Read + Send>,
    mut child: Box<dyn Child + Send + Sync>,
    parser: Arc<Mutex<vt100::Parser>>,
    exited: Arc<AtomicBool>,
    events: EventSender,
) {
    let mut buf = [0u8; 8192];
    let mut last_title = String::new();

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let title = {
                    let mut parser = parser.lock();
                    parser.process(&buf[..n]);
                    parser.screen().title().to_string()
                };
                // A closed channel means the UI loop is gone; keep draining
                // so the child is not blocked on a full PTY.
                let _ = events.send(TerminalEvent::Output {
                    handle,
                    bytes: buf[..n].to_vec(),
                });
                if title != last_title {
                    log::debug!("{} title changed to {:?}", handle, title);
                    last_title = title.clone();
                    let _ = events.send(TerminalEvent::TitleChanged { handle, title });
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                // EIO is how Linux reports a hung-up PTY
                log::debug!("PTY {} read ended: {}", handle, e);
                break;
            }
        }
    }

    let exit_code = match child.wait() {
        Ok(status) => Some(status.exit_code()),
        Err(e) => {
            log::warn!("Failed to reap child of {}: {}", handle, e);
            None
        }
    };
    exited.store(true, Ordering::Release);
    log::info!("Child of {} exited (code: {:?})", handle, exit_code);
    let _ = events.send(TerminalEvent::ChildExited { handle, exit_code });
}
