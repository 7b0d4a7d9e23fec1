//! Line formatting
//!
//! A [`LineFormatter`] turns `(level, category, message, error)` into the
//! single string stored in the log history. [`DefaultLineFormatter`]
//! renders `HH:mm:ss,fff - LEVEL   : [name] message`.

use super::log_level::LogLevel;
use super::scope::ScopeChain;
use chrono::{DateTime, Local};
use std::error::Error;
use std::fmt::Write;
use std::sync::Arc;

/// Error value that may accompany a log call
pub type LogError<'a> = &'a (dyn Error + 'static);

/// Shared line rendering function
pub type LineFormatter =
    Arc<dyn Fn(LogLevel, &str, &str, Option<LogError<'_>>) -> String + Send + Sync>;

/// Separator between scope frames in rendered lines
pub const SCOPE_SEPARATOR: &str = " > ";

pub struct DefaultLineFormatter;

impl DefaultLineFormatter {
    /// Render one line stamped with the local wall clock.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_memory_logger::{DefaultLineFormatter, LogLevel};
    ///
    /// let line = DefaultLineFormatter::format(LogLevel::Warning, "App", "disk low", None);
    /// assert!(line.ends_with(" - WARNING : [App] disk low"));
    /// ```
    pub fn format(level: LogLevel, name: &str, message: &str, error: Option<LogError<'_>>) -> String {
        Self::format_at(&Local::now(), level, name, message, None, error)
    }

    /// Same as [`format`](Self::format), with the ambient scope path after
    /// the category, e.g. `[App] => request 7 > db message`.
    pub fn format_with_scopes(
        level: LogLevel,
        name: &str,
        message: &str,
        error: Option<LogError<'_>>,
    ) -> String {
        let scopes = ScopeChain::current().map(|node| node.path(SCOPE_SEPARATOR));
        Self::format_at(&Local::now(), level, name, message, scopes.as_deref(), error)
    }

    pub fn format_at(
        time: &DateTime<Local>,
        level: LogLevel,
        name: &str,
        message: &str,
        scopes: Option<&str>,
        error: Option<LogError<'_>>,
    ) -> String {
        let mut line = format!(
            "{} - {}: [{}] ",
            time.format("%H:%M:%S,%3f"),
            level.padded_label(),
            name
        );
        if let Some(scopes) = scopes {
            let _ = write!(line, "=> {} ", scopes);
        }
        line.push_str(message);

        if let Some(error) = error {
            let _ = write!(line, "\n{}", error);
            let mut source = error.source();
            while let Some(cause) = source {
                let _ = write!(line, "\nCaused by: {}", cause);
                source = cause.source();
            }
        }
        line
    }

    /// The default formatter as a shareable [`LineFormatter`].
    pub fn shared() -> LineFormatter {
        Arc::new(Self::format)
    }

    /// Scope-aware variant as a shareable [`LineFormatter`].
    pub fn shared_with_scopes() -> LineFormatter {
        Arc::new(Self::format_with_scopes)
    }
}
