//! Logging macros for ergonomic log message formatting.
//!
//! The message is only formatted when the logger's filter accepts the
//! level, so disabled calls cost a filter check and nothing else.
//!
//! # Examples
//!
//! ```
//! use rust_memory_logger::prelude::*;
//! use rust_memory_logger::info;
//! use std::sync::Arc;
//!
//! let logger = MemoryLogger::with_defaults("Server", Arc::new(LogStore::default()));
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_memory_logger::prelude::*;
/// # let logger = MemoryLogger::with_defaults("App", std::sync::Arc::new(LogStore::default()));
/// use rust_memory_logger::log;
/// log!(logger, LogLevel::Information, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, (), None, |_, _| format!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an information-level message.
///
/// # Examples
///
/// ```
/// # use rust_memory_logger::prelude::*;
/// # let logger = MemoryLogger::with_defaults("App", std::sync::Arc::new(LogStore::default()));
/// use rust_memory_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Information, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// # Examples
///
/// ```
/// # use rust_memory_logger::prelude::*;
/// # let logger = MemoryLogger::with_defaults("App", std::sync::Arc::new(LogStore::default()));
/// use rust_memory_logger::critical;
/// critical!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{min_level_filter, DefaultLineFormatter, LogLevel, LogStore, MemoryLogger};
    use std::sync::Arc;

    fn logger() -> MemoryLogger {
        MemoryLogger::new(
            "Macros",
            min_level_filter(LogLevel::Debug),
            DefaultLineFormatter::shared(),
            Arc::new(LogStore::new(10).unwrap()),
        )
    }

    #[test]
    fn test_log_macro() {
        let logger = logger();
        log!(logger, LogLevel::Information, "Formatted: {}", 42);

        let lines = logger.store().entries_for_level(LogLevel::Information);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("[Macros] Formatted: 42"));
    }

    #[test]
    fn test_level_macros() {
        let logger = logger();
        trace!(logger, "Trace message");
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        critical!(logger, "Critical failure: {}", "system");

        let store = logger.store();
        assert!(store.entries_for_level(LogLevel::Trace).is_empty());
        assert_eq!(store.entries_at_least(LogLevel::Debug).len(), 5);
        assert!(store.entries_for_level(LogLevel::Warning)[0].contains("WARNING : [Macros] Retry 1 of 3"));
    }
}
