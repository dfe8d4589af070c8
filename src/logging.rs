use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{Config, DEFAULT_LOG_FILTER};

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Logs to stderr, for one-shot CLI commands.
pub fn init_cli(config: &Config) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Logs to a file beside the task store so the terminal UI is not overdrawn.
/// Logging is dropped if the file cannot be opened.
pub fn init_tui(config: &Config) {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path());
    match file {
        Ok(f) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter(config))
                .with_ansi(false)
                .with_writer(Mutex::new(f))
                .try_init();
        }
        Err(_) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter(config))
                .with_writer(std::io::sink)
                .try_init();
        }
    }
}
