//! Diagnostic logging
//!
//! Everything goes through the `log` facade; the wasm start function installs
//! `console_log` as the backend. Per-event chatter is gated on the instance's
//! `debug` option via [`sortable_debug!`](crate::sortable_debug).

use std::fmt;

const PREFIX: &str = "[sortable]";

/// Log a debug message when the given options have `debug` set
#[macro_export]
macro_rules! sortable_debug {
    ($options:expr, $($arg:tt)*) => {
        if $options.debug {
            $crate::utils::logging::debug(format_args!($($arg)*))
        }
    };
}

/// Log a warning with the sortable prefix
#[macro_export]
macro_rules! sortable_warn {
    ($($arg:tt)*) => {
        $crate::utils::logging::warn(format_args!($($arg)*))
    };
}

/// Log an error with the sortable prefix
#[macro_export]
macro_rules! sortable_error {
    ($($arg:tt)*) => {
        $crate::utils::logging::error(format_args!($($arg)*))
    };
}

pub fn debug(args: fmt::Arguments<'_>) {
    log::debug!("{PREFIX} {args}");
}

pub fn warn(args: fmt::Arguments<'_>) {
    log::warn!("{PREFIX} ⚠️ {args}");
}

pub fn error(args: fmt::Arguments<'_>) {
    log::error!("{PREFIX} ❌ {args}");
}
