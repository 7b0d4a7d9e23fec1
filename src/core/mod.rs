//! Core store, scope and logger types

pub mod error;
pub mod formatter;
pub mod level_buffer;
pub mod log_entry;
pub mod log_level;
pub mod log_store;
pub mod logger;
pub mod metrics;
pub mod scope;

pub use error::{LoggerError, Result};
pub use formatter::{DefaultLineFormatter, LineFormatter, LogError, SCOPE_SEPARATOR};
pub use level_buffer::LevelBuffer;
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use log_store::{LogStore, DEFAULT_MAX_LOG_COUNT};
pub use logger::{always_enabled, min_level_filter, LogFilter, MemoryLogger};
pub use metrics::StoreMetrics;
pub use scope::{ScopeChain, ScopeGuard, ScopeNode, Scoped, ScopedFutureExt};
