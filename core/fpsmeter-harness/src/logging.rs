//! Logging initialization for the harness.
//!
//! Debug logging is gated on the FPSMETER_DEBUG_LOG env var; otherwise the
//! standard RUST_LOG filter applies with an "info" fallback. Output goes to
//! stderr and, when the fpsmeter directory is resolvable, to a daily file
//! under ~/.fpsmeter/logs.

use fs_err as fs;
use std::env;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

pub fn init() -> Option<WorkerGuard> {
    let debug_enabled = env::var("FPSMETER_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    match log_dir() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "harness.log");
            let (file_writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file_writer.and(std::io::stderr))
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

fn log_dir() -> Option<PathBuf> {
    let dir = fpsmeter_core::config::config_dir().ok()?.join("logs");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
