//! # Rust Memory Logger
//!
//! An in-process log sink that keeps a bounded, queryable history of
//! rendered log lines per severity level, entirely in memory.
//!
//! ## Features
//!
//! - **Bounded**: a ring buffer per level keeps the most recent lines
//! - **Thread Safe**: per-level locks, concurrent snapshots
//! - **Ambient Scopes**: nested context that follows the logical call,
//!   including across `.await` points
//! - **Reloadable**: filters and capacity follow settings changes
//!
//! ## Example
//!
//! ```
//! use rust_memory_logger::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(LogStore::new(3).unwrap());
//! let logger = MemoryLogger::with_defaults("App", Arc::clone(&store));
//!
//! for step in ["a", "b", "c", "d"] {
//!     logger.info(step);
//! }
//! logger.warn("disk almost full");
//!
//! assert_eq!(store.entries_for_level(LogLevel::Information).len(), 3);
//! assert_eq!(store.entries_at_least(LogLevel::Warning).len(), 1);
//! ```

pub mod core;
pub mod macros;
pub mod provider;
pub mod settings;

pub mod prelude {
    pub use crate::core::{
        DefaultLineFormatter, LineFormatter, LogEntry, LogFilter, LogLevel, LogStore, LoggerError,
        MemoryLogger, Result, ScopeChain, ScopeGuard, ScopeNode, ScopedFutureExt, StoreMetrics,
    };
    pub use crate::provider::{MemoryLoggerProvider, MemoryLoggerProviderBuilder};
    pub use crate::settings::{
        ChangeNotifier, ChangeToken, ConfigurationSettings, ConfigurationSource,
        MemoryLoggerSettings, StaticSettings,
    };
}

pub use crate::core::{
    always_enabled, min_level_filter, DefaultLineFormatter, LevelBuffer, LineFormatter, LogEntry,
    LogError, LogFilter, LogLevel, LogStore, LoggerError, MemoryLogger, Result, ScopeChain,
    ScopeGuard, ScopeNode, Scoped, ScopedFutureExt, StoreMetrics, DEFAULT_MAX_LOG_COUNT,
};
pub use provider::{filter_from_settings, MemoryLoggerProvider, MemoryLoggerProviderBuilder};
pub use settings::{
    ChangeNotifier, ChangeToken, ConfigurationSettings, ConfigurationSource, MemoryLoggerSettings,
    StaticSettings,
};
