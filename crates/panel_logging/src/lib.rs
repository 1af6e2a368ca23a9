#![deny(missing_docs)]
//! Logging front end shared by the davpanel crates.
//!
//! Every crate logs through the `panel_*` macros so the backend (simplelog in the
//! binary, a terminal logger in tests) is chosen in one place.

use std::sync::Once;

/// Trace-level event, for per-entry parser detail.
#[macro_export]
macro_rules! panel_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Debug-level event.
#[macro_export]
macro_rules! panel_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Info-level event, for connections, listings and queued jobs.
#[macro_export]
macro_rules! panel_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Warn-level event, for recoverable failures such as a listing fallback.
#[macro_export]
macro_rules! panel_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Error-level event.
#[macro_export]
macro_rules! panel_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Maps a configured level name (`"info"`, `"DEBUG"`, `"off"`, ...) to a filter.
///
/// Unknown names fall back to `Info`.
pub fn parse_level(raw: &str) -> log::LevelFilter {
    raw.trim().parse().unwrap_or(log::LevelFilter::Info)
}

static TEST_LOGGER: Once = Once::new();

/// Installs a terminal logger for integration tests the first time it is called.
///
/// Logs at `Debug` in debug builds and `Info` otherwise. Later calls, and calls
/// after some other logger was installed, do nothing.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    TEST_LOGGER.call_once(|| {
        let level = if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        let _ = CombinedLogger::init(vec![TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )]);
    });
}
