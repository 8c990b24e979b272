#![cfg(feature = "std")]

use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable consulted when no level is given on the command line.
pub const LOG_ENV: &str = "SEABATTLE_LOG";

/// Writes records to stderr so they never interleave with the boards.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Resolve the log level: an explicit `level` wins, then `SEABATTLE_LOG`,
/// then `warn`.
pub fn resolve_level(level: Option<LevelFilter>) -> LevelFilter {
    level
        .or_else(|| std::env::var(LOG_ENV).ok().and_then(|lvl| lvl.parse().ok()))
        .unwrap_or(LevelFilter::Warn)
}

/// Install the stderr logger. Calling it again only adjusts the level.
pub fn init_logging(level: Option<LevelFilter>) {
    let level = resolve_level(level);
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
