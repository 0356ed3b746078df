use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
/// Logging backend for sugar-term
///
/// Routes every `log::info!()` etc. to `sugar_term_debug.log` in the temp
/// directory (`/tmp` on most Unix systems). Terminal output goes to stdout,
/// so log lines are kept out of it. When `RUST_LOG` is set, records are also
/// mirrored to stderr.
///
/// Level precedence: the `--log-level` flag, then `RUST_LOG`, then `info`.
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// File name of the debug log inside the temp directory
const LOG_FILE_NAME: &str = "sugar_term_debug.log";

/// Global log bridge
struct LogBridge {
    level: LevelFilter,
    file: Option<Mutex<File>>,
    mirror_stderr: bool,
}

impl LogBridge {
    fn new(level: LevelFilter, mirror_stderr: bool) -> Self {
        let file = if level != LevelFilter::Off {
            match OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_path())
            {
                Ok(mut f) => {
                    // Write header
                    let _ = writeln!(
                        f,
                        "{}\nsugar-term debug session started at {} (level={})\n{}",
                        "=".repeat(80),
                        get_timestamp(),
                        level,
                        "=".repeat(80)
                    );
                    Some(Mutex::new(f))
                }
                // Logging must never take the terminal down with it
                Err(_) => None,
            }
        } else {
            None
        };

        Self {
            level,
            file,
            mirror_stderr,
        }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = &self.file {
            let mut file = file.lock();
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
        if self.mirror_stderr {
            eprint!("{}", line);
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            let _ = file.lock().flush();
        }
    }
}

static LOGGER: OnceLock<LogBridge> = OnceLock::new();

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Where the debug log is written
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

/// Parse `RUST_LOG` as a plain level (`debug`, `warn`, ...)
///
/// Directive lists like `sugar_term=debug,info` use their last bare level.
fn level_from_env(value: &str) -> Option<LevelFilter> {
    value
        .split(',')
        .rev()
        .find_map(|directive| directive.trim().parse::<LevelFilter>().ok())
}

/// Pick the effective level from the CLI flag and `RUST_LOG`
pub fn resolve_level(cli_level: Option<LevelFilter>, rust_log: Option<&str>) -> LevelFilter {
    cli_level
        .or_else(|| rust_log.and_then(level_from_env))
        .unwrap_or(LevelFilter::Info)
}

/// Install the log bridge as the global `log` backend.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let level = resolve_level(cli_level, rust_log.as_deref());
    let logger = LOGGER.get_or_init(|| LogBridge::new(level, rust_log.is_some()));

    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
    }
}
