//! Logger provider
//!
//! `MemoryLoggerProvider` builds one [`MemoryLogger`] per category, all
//! writing into the same [`LogStore`]. Filters come either from a fixed
//! predicate or from [`MemoryLoggerSettings`]; in the latter case a
//! background thread waits on the settings' change token and rebuilds every
//! logger's filter in place after a reload.

use crate::core::{
    always_enabled, min_level_filter, DefaultLineFormatter, LineFormatter, LogError, LogFilter,
    LogLevel, LogStore, LoggerError, MemoryLogger, Result,
};
use crate::settings::{key_prefixes, MemoryLoggerSettings};
use crossbeam_channel::{bounded, select, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

enum FilterSource {
    Fixed(LogFilter),
    Settings(Arc<dyn MemoryLoggerSettings>),
}

struct ProviderState {
    store: Arc<LogStore>,
    loggers: RwLock<HashMap<String, Arc<MemoryLogger>>>,
    source: RwLock<FilterSource>,
    line_formatter: LineFormatter,
    include_scopes: Arc<AtomicBool>,
    refresh_lock: Mutex<()>,
}

impl ProviderState {
    fn filter_for(&self, category: &str) -> Result<LogFilter> {
        match &*self.source.read() {
            FilterSource::Fixed(filter) => Ok(Arc::clone(filter)),
            FilterSource::Settings(settings) => filter_from_settings(settings.as_ref(), category),
        }
    }

    fn current_settings(&self) -> Option<Arc<dyn MemoryLoggerSettings>> {
        match &*self.source.read() {
            FilterSource::Fixed(_) => None,
            FilterSource::Settings(settings) => Some(Arc::clone(settings)),
        }
    }

    /// Reload settings and apply them to the store and every cached logger.
    ///
    /// The reloaded settings are adopted even when applying them fails, so
    /// the next change notification is observed; the loggers keep their
    /// previous filters in that case.
    fn refresh(&self) -> Result<()> {
        let _serial = self.refresh_lock.lock();
        let Some(settings) = self.current_settings() else {
            return Ok(());
        };

        let reloaded = settings.reload()?;
        *self.source.write() = FilterSource::Settings(Arc::clone(&reloaded));
        self.apply(reloaded.as_ref())
    }

    fn apply(&self, settings: &dyn MemoryLoggerSettings) -> Result<()> {
        let capacity = settings.max_log_count()?;

        let loggers: Vec<Arc<MemoryLogger>> = self.loggers.read().values().cloned().collect();
        let filters = loggers
            .iter()
            .map(|logger| filter_from_settings(settings, logger.name()))
            .collect::<Result<Vec<_>>>()?;

        self.store.set_capacity(capacity)?;
        self.include_scopes
            .store(settings.include_scopes(), Ordering::Release);
        for (logger, filter) in loggers.iter().zip(filters) {
            logger.set_shared_filter(filter);
        }
        Ok(())
    }
}

/// Filter for `category` from the most specific matching switch.
///
/// Categories without any matching switch, `Default` included, are disabled.
pub fn filter_from_settings(settings: &dyn MemoryLoggerSettings, category: &str) -> Result<LogFilter> {
    for prefix in key_prefixes(category) {
        if let Some(level) = settings.try_get_switch(prefix)? {
            return Ok(min_level_filter(level));
        }
    }
    let disabled: LogFilter = Arc::new(|_: &str, _: LogLevel| false);
    Ok(disabled)
}

pub struct MemoryLoggerProvider {
    state: Arc<ProviderState>,
    shutdown: Option<Sender<()>>,
    watcher: Option<thread::JoinHandle<()>>,
}

impl MemoryLoggerProvider {
    /// Create a builder for MemoryLoggerProvider
    ///
    /// # Example
    /// ```
    /// use rust_memory_logger::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let store = Arc::new(LogStore::new(100).unwrap());
    /// let provider = MemoryLoggerProvider::builder()
    ///     .min_level(LogLevel::Information)
    ///     .store(Arc::clone(&store))
    ///     .build()
    ///     .unwrap();
    ///
    /// let logger = provider.create_logger("App").unwrap();
    /// logger.debug("not kept");
    /// logger.info("kept");
    /// assert_eq!(store.entries_at_least(LogLevel::Trace).len(), 1);
    /// ```
    #[must_use]
    pub fn builder() -> MemoryLoggerProviderBuilder {
        MemoryLoggerProviderBuilder::new()
    }

    pub fn store(&self) -> &Arc<LogStore> {
        &self.state.store
    }

    /// Logger for `category`, created on first request and cached after.
    pub fn create_logger(&self, category: &str) -> Result<Arc<MemoryLogger>> {
        if let Some(logger) = self.state.loggers.read().get(category) {
            return Ok(Arc::clone(logger));
        }

        // Filter lookup and insert happen under the refresh lock
        let _serial = self.state.refresh_lock.lock();
        if let Some(logger) = self.state.loggers.read().get(category) {
            return Ok(Arc::clone(logger));
        }

        let filter = self.state.filter_for(category)?;
        let logger = Arc::new(MemoryLogger::new(
            category,
            filter,
            Arc::clone(&self.state.line_formatter),
            Arc::clone(&self.state.store),
        ));
        self.state
            .loggers
            .write()
            .insert(category.to_string(), Arc::clone(&logger));
        Ok(logger)
    }

    /// Categories with a cached logger, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Reload settings now instead of waiting for the change token.
    pub fn refresh(&self) -> Result<()> {
        self.state.refresh()
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn spawn_watcher(state: Arc<ProviderState>, shutdown: Receiver<()>) -> Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("memory-logger-settings".to_string())
            .spawn(move || loop {
                let Some(token) = state.current_settings().and_then(|s| s.change_token()) else {
                    break;
                };
                if token.has_changed() {
                    // Reload produced an already-fired token; nothing left to wait for
                    break;
                }

                select! {
                    recv(token.receiver()) -> _ => {},
                    recv(shutdown) -> _ => break,
                }

                if let Err(e) = state.refresh() {
                    eprintln!("[LOGGER ERROR] Failed to apply reloaded memory logger settings: {}", e);
                }
            })
            .map_err(LoggerError::WatcherSpawn)
    }
}

impl Drop for MemoryLoggerProvider {
    fn drop(&mut self) {
        // Disconnecting the shutdown channel wakes the watcher
        drop(self.shutdown.take());

        if let Some(handle) = self.watcher.take() {
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] Settings watcher thread panicked: {:?}", e);
            }
        }
    }
}

/// Builder for constructing MemoryLoggerProvider with a fluent API
///
/// Without settings, loggers use the given filter (every level by default).
/// With settings, filters and capacity come from them and follow reloads.
pub struct MemoryLoggerProviderBuilder {
    filter: Option<LogFilter>,
    capacity: Option<usize>,
    line_formatter: Option<LineFormatter>,
    store: Option<Arc<LogStore>>,
    settings: Option<Arc<dyn MemoryLoggerSettings>>,
    watch: bool,
}

impl MemoryLoggerProviderBuilder {
    pub fn new() -> Self {
        Self {
            filter: None,
            capacity: None,
            line_formatter: None,
            store: None,
            settings: None,
            watch: true,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str, LogLevel) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Record `min_level` and above for every category.
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, min_level: LogLevel) -> Self {
        self.filter = Some(min_level_filter(min_level));
        self
    }

    /// Entries kept per level; applied to the store when building.
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn line_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(LogLevel, &str, &str, Option<LogError<'_>>) -> String + Send + Sync + 'static,
    {
        self.line_formatter = Some(Arc::new(formatter));
        self
    }

    /// Store to write into; the process-wide [`LogStore::shared`] otherwise.
    #[must_use = "builder methods return a new value"]
    pub fn store(mut self, store: Arc<LogStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn settings<S: MemoryLoggerSettings + 'static>(self, settings: S) -> Self {
        self.shared_settings(Arc::new(settings))
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_settings(mut self, settings: Arc<dyn MemoryLoggerSettings>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Follow the settings' change token on a background thread (default).
    #[must_use = "builder methods return a new value"]
    pub fn watch_settings(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn build(self) -> Result<MemoryLoggerProvider> {
        let store = self.store.unwrap_or_else(LogStore::shared);
        let include_scopes = Arc::new(AtomicBool::new(false));

        let source = match (self.settings, self.filter) {
            (Some(_), Some(_)) => {
                return Err(LoggerError::config(
                    "MemoryLoggerProvider",
                    "a filter and settings cannot be combined",
                ))
            }
            (Some(settings), None) => {
                store.set_capacity(settings.max_log_count()?)?;
                include_scopes.store(settings.include_scopes(), Ordering::Release);
                FilterSource::Settings(settings)
            }
            (None, filter) => FilterSource::Fixed(filter.unwrap_or_else(always_enabled)),
        };
        if let Some(capacity) = self.capacity {
            store.set_capacity(capacity)?;
        }

        let line_formatter = self.line_formatter.unwrap_or_else(|| {
            let include_scopes = Arc::clone(&include_scopes);
            let formatter: LineFormatter = Arc::new(
                move |level: LogLevel, name: &str, message: &str, error: Option<LogError<'_>>| {
                    if include_scopes.load(Ordering::Acquire) {
                        DefaultLineFormatter::format_with_scopes(level, name, message, error)
                    } else {
                        DefaultLineFormatter::format(level, name, message, error)
                    }
                },
            );
            formatter
        });

        let watch = self.watch
            && matches!(&source, FilterSource::Settings(settings) if settings.change_token().is_some());

        let state = Arc::new(ProviderState {
            store,
            loggers: RwLock::new(HashMap::new()),
            source: RwLock::new(source),
            line_formatter,
            include_scopes,
            refresh_lock: Mutex::new(()),
        });

        let (shutdown, watcher) = if watch {
            let (tx, rx) = bounded::<()>(0);
            let handle = MemoryLoggerProvider::spawn_watcher(Arc::clone(&state), rx)?;
            (Some(tx), Some(handle))
        } else {
            (None, None)
        };

        Ok(MemoryLoggerProvider {
            state,
            shutdown,
            watcher,
        })
    }
}

impl Default for MemoryLoggerProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
