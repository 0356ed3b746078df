use anyhow::Result;
use std::io::BufRead;
use sugar_term::app::{App, AppState};
use sugar_term::cli;
use sugar_term::config::Config;
use sugar_term::session::storage::session_path;
use sugar_term_terminal::{PtySpawner, SysinfoProcessTable, event_channel};

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let options = match cli::process_cli() {
        cli::CliResult::Exit(code) => {
            if code == 0 {
                return Ok(());
            }
            // No app state exists yet, so no destructors are skipped.
            std::process::exit(code);
        }
        cli::CliResult::Continue(options) => options,
    };
    // Routes all log::info!() etc. to the debug log in the temp directory.
    // When RUST_LOG is set, also mirrors to stderr.
    sugar_term::debug::init_log_bridge(options.log_level);

    log::info!("Starting sugar-term {}", sugar_term::VERSION);

    let loaded = match &options.config_path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        eprintln!("sugar-term: config error: {e}; using defaults");
        Config::default()
    });
    let restore = config.restore_session && !options.fresh;

    let (event_tx, event_rx) = event_channel();
    let (line_tx, line_rx) = tokio::sync::mpsc::unbounded_channel();

    // Blocking stdin reads stay off the event loop; the thread ends with
    // the process or when stdin closes.
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        })?;

    let session_path = options.session_path.unwrap_or_else(session_path);
    let mut app = App::new(
        AppState::new(config),
        PtySpawner::new(event_tx),
        SysinfoProcessTable::new(),
        session_path,
    );
    app.start(restore)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(app.run(event_rx, line_rx));

    log::info!("Event loop exited, shutting down");
    if let Err(e) = app.shutdown() {
        log::error!("Failed to save session: {:#}", e);
        eprintln!("sugar-term: error: {e:#}");
    }
    Ok(())
}
