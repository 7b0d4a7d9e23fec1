//! Settings consumed by [`MemoryLoggerProvider`](crate::MemoryLoggerProvider)
//!
//! Settings supply the per-level capacity, per-category level switches and
//! a change token. When the token fires, the provider calls
//! [`MemoryLoggerSettings::reload`] and rebuilds its loggers' filters.

pub mod change_token;
pub mod configuration;
pub mod static_settings;

pub use change_token::{ChangeNotifier, ChangeToken};
pub use configuration::{ConfigurationSettings, ConfigurationSource};
pub use static_settings::StaticSettings;

use crate::core::{LogLevel, Result};
use std::sync::Arc;

/// Category switch consulted when nothing more specific matches
pub const DEFAULT_SWITCH: &str = "Default";

pub trait MemoryLoggerSettings: Send + Sync {
    /// Entries kept per level. Malformed values are an error.
    fn max_log_count(&self) -> Result<usize>;

    /// Whether lines rendered by the default formatter include the ambient
    /// scope path.
    fn include_scopes(&self) -> bool {
        false
    }

    /// Level switch configured for exactly `category`.
    ///
    /// `Ok(None)` when no switch exists; an error when one exists but
    /// cannot be parsed.
    fn try_get_switch(&self, category: &str) -> Result<Option<LogLevel>>;

    /// Token firing when these settings become stale.
    fn change_token(&self) -> Option<ChangeToken>;

    /// Fresh settings reflecting the current configuration.
    fn reload(&self) -> Result<Arc<dyn MemoryLoggerSettings>>;
}

/// Switch names to try for `category`, most specific first.
///
/// Both `.` and `::` separate category segments:
/// `app::db.pool` yields `app::db.pool`, `app::db`, `app`, then `Default`.
/// A single `:` is part of a segment name. Separator characters left
/// dangling by a cut are trimmed, so `a:::b` yields `a:::b`, `a`, `Default`.
pub fn key_prefixes(category: &str) -> Vec<&str> {
    let mut prefixes = Vec::new();
    let mut current = category;
    while !current.is_empty() {
        prefixes.push(current);
        let cut = match (current.rfind('.'), current.rfind("::")) {
            (Some(dot), Some(colons)) => dot.max(colons),
            (Some(dot), None) => dot,
            (None, Some(colons)) => colons,
            (None, None) => 0,
        };
        current = current[..cut].trim_end_matches(|c: char| c == '.' || c == ':');
    }
    prefixes.push(DEFAULT_SWITCH);
    prefixes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_prefixes() {
        assert_eq!(
            key_prefixes("App.Data.Sql"),
            vec!["App.Data.Sql", "App.Data", "App", "Default"]
        );
        assert_eq!(
            key_prefixes("app::db.pool"),
            vec!["app::db.pool", "app::db", "app", "Default"]
        );
        assert_eq!(key_prefixes(""), vec!["Default"]);
        assert_eq!(key_prefixes("a:::b"), vec!["a:::b", "a", "Default"]);
        assert_eq!(key_prefixes("App..Db"), vec!["App..Db", "App", "Default"]);
        assert_eq!(key_prefixes("host:8080.Api"), vec!["host:8080.Api", "host:8080", "Default"]);
    }
}
