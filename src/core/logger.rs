//! Per-category logger writing into a [`LogStore`]

use super::formatter::{DefaultLineFormatter, LineFormatter, LogError};
use super::log_level::LogLevel;
use super::log_store::LogStore;
use super::scope::{ScopeChain, ScopeGuard};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether `(category, level)` is recorded
pub type LogFilter = Arc<dyn Fn(&str, LogLevel) -> bool + Send + Sync>;

/// Filter accepting every level.
pub fn always_enabled() -> LogFilter {
    Arc::new(|_: &str, _: LogLevel| true)
}

/// Filter accepting `min_level` and above.
pub fn min_level_filter(min_level: LogLevel) -> LogFilter {
    Arc::new(move |_: &str, level: LogLevel| level >= min_level)
}

pub struct MemoryLogger {
    name: String,
    filter: RwLock<LogFilter>,
    line_formatter: LineFormatter,
    store: Arc<LogStore>,
}

impl MemoryLogger {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        filter: LogFilter,
        line_formatter: LineFormatter,
        store: Arc<LogStore>,
    ) -> Self {
        Self {
            name: name.into(),
            filter: RwLock::new(filter),
            line_formatter,
            store,
        }
    }

    /// Logger that records every level with the default line layout.
    #[must_use]
    pub fn with_defaults(name: impl Into<String>, store: Arc<LogStore>) -> Self {
        Self::new(name, always_enabled(), DefaultLineFormatter::shared(), store)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &Arc<LogStore> {
        &self.store
    }

    /// Swap the filter. Calls already past the filter check are unaffected.
    pub fn set_filter<F>(&self, filter: F)
    where
        F: Fn(&str, LogLevel) -> bool + Send + Sync + 'static,
    {
        self.set_shared_filter(Arc::new(filter));
    }

    pub fn set_shared_filter(&self, filter: LogFilter) {
        *self.filter.write() = filter;
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        let filter = Arc::clone(&self.filter.read());
        filter(self.name.as_str(), level)
    }

    /// Render `state` and store the resulting line under `level`.
    ///
    /// Nothing is stored when the level is filtered out, when `formatter`
    /// produces an empty message, or for the `None` sentinel level.
    pub fn log<S, F>(&self, level: LogLevel, state: S, error: Option<LogError<'_>>, formatter: F)
    where
        F: FnOnce(&S, Option<LogError<'_>>) -> String,
    {
        if !self.is_enabled(level) || !level.is_storable() {
            return;
        }

        let message = formatter(&state, error);
        if message.is_empty() {
            return;
        }

        let line = (self.line_formatter)(level, &self.name, &message, error);
        self.store.append(level, line);
    }

    pub fn log_message(&self, level: LogLevel, message: impl Into<String>) {
        self.log(level, message.into(), None, |message, _| message.clone());
    }

    pub fn log_error(&self, level: LogLevel, message: impl Into<String>, error: LogError<'_>) {
        self.log(level, message.into(), Some(error), |message, _| message.clone());
    }

    /// Open an ambient scope tagged with this logger's name.
    pub fn begin_scope<S>(&self, state: S) -> ScopeGuard
    where
        S: fmt::Display + Send + Sync + 'static,
    {
        ScopeChain::push(self.name.clone(), state)
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log_message(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log_message(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log_message(LogLevel::Information, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log_message(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log_message(LogLevel::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log_message(LogLevel::Critical, message);
    }
}

impl fmt::Debug for MemoryLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryLogger")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn plain_lines() -> LineFormatter {
        Arc::new(|level: LogLevel, name: &str, message: &str, _: Option<LogError<'_>>| {
            format!("{}|{}|{}", level, name, message)
        })
    }

    fn logger(filter: LogFilter) -> MemoryLogger {
        MemoryLogger::new("Test", filter, plain_lines(), Arc::new(LogStore::new(10).unwrap()))
    }

    #[test]
    fn test_filtered_level_not_stored() {
        let logger = logger(min_level_filter(LogLevel::Information));
        logger.debug("hidden");
        logger.info("shown");

        let store = logger.store();
        assert!(store.entries_for_level(LogLevel::Debug).is_empty());
        assert_eq!(store.all_entries(), vec!["Information|Test|shown"]);
    }

    #[test]
    fn test_empty_message_not_stored() {
        let logger = logger(always_enabled());
        assert!(logger.is_enabled(LogLevel::Warning));

        logger.log(LogLevel::Warning, 7, None, |_, _| String::new());
        assert!(logger.store().is_empty());
    }

    #[test]
    fn test_formatter_not_called_when_disabled() {
        let calls = AtomicUsize::new(0);
        let logger = logger(min_level_filter(LogLevel::Error));

        logger.log(LogLevel::Information, (), None, |_, _| {
            calls.fetch_add(1, Ordering::Relaxed);
            "x".to_string()
        });
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_sentinel_level_never_stored() {
        let logger = logger(always_enabled());
        logger.log_message(LogLevel::None, "nothing");
        assert!(logger.store().is_empty());
    }

    #[test]
    fn test_filter_receives_category_name() {
        let logger = logger(Arc::new(|name: &str, _: LogLevel| name == "Test"));
        assert!(logger.is_enabled(LogLevel::Trace));

        logger.set_filter(|name, _| name == "Other");
        assert!(!logger.is_enabled(LogLevel::Trace));
    }

    #[test]
    fn test_state_passed_to_formatter() {
        let logger = logger(always_enabled());
        logger.log(LogLevel::Error, ("disk", 93), None, |(device, pct), _| {
            format!("{} at {}%", device, pct)
        });
        assert_eq!(
            logger.store().entries_for_level(LogLevel::Error),
            vec!["Error|Test|disk at 93%"]
        );
    }

    #[test]
    fn test_begin_scope_uses_logger_name() {
        let logger = logger(always_enabled());
        let _guard = logger.begin_scope("batch 3");

        let current = ScopeChain::current().unwrap();
        assert_eq!(current.name(), "Test");
        assert_eq!(current.to_string(), "batch 3");
    }
}
