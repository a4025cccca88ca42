//! Structured logging configuration.
//!
//! Uses `tracing` with `tracing-subscriber`. The human-facing result lines go
//! through `ui::messages`; tracing carries the step-by-step diagnostics.
//!
//! Environment variables:
//! - `AUTOPUNCH_LOG` or `RUST_LOG`: filter directive (default `autopunch=info`)
//! - `AUTOPUNCH_LOG_FILE`: append plain-text logs to this file as well

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "autopunch=info";

fn env_filter() -> EnvFilter {
    let directive = std::env::var("AUTOPUNCH_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Safe to call once, early in run().
pub fn init() {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter())
        .with(stderr_layer);

    match std::env::var("AUTOPUNCH_LOG_FILE") {
        Ok(path) if !path.is_empty() => {
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => {
                    let file_layer = fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false);
                    registry.with(file_layer).init();
                }
                Err(e) => {
                    registry.init();
                    tracing::warn!("cannot open log file {path}: {e}");
                }
            }
        }
        _ => registry.init(),
    }
}
