//! Logging setup
//!
//! Installs a `tracing` subscriber writing to standard output or, when a log
//! file is configured, to that file through a non-blocking writer.

use std::path::Path;
use std::str::FromStr;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::LogConfig;

/// Installs the global subscriber
///
/// The returned guard flushes the log file when dropped and must be kept alive
/// for the whole run. Calling this a second time leaves the first subscriber
/// in place.
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
    let level = Level::from_str(&config.level).unwrap_or(Level::INFO);

    match &config.file {
        Some(file) => {
            let dir = file.parent().unwrap_or(Path::new("."));
            let name = file.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "oxyde.log".into());
            let file_appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let installed = tracing_subscriber::fmt()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_max_level(level)
                .try_init()
                .is_ok();
            report_installed(installed);
            Some(guard)
        }
        None => {
            let installed = tracing_subscriber::fmt()
                .with_max_level(level)
                .try_init()
                .is_ok();
            report_installed(installed);
            None
        }
    }
}

fn report_installed(installed: bool) {
    if installed {
        tracing::debug!("Logging initialized");
    } else {
        tracing::debug!("Global subscriber already installed");
    }
}
