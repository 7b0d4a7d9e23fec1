//! Settings read from a reloadable configuration tree
//!
//! A [`ConfigurationSource`] holds a JSON document that the host may replace
//! at any time, for example after re-reading a settings file. Replacing it
//! fires the source's change token. [`ConfigurationSettings`] reads values
//! lazily, so malformed values surface as errors when they are read:
//!
//! ```json
//! {
//!   "MaxLogCount": 500,
//!   "IncludeScopes": true,
//!   "LogLevel": { "Default": "Information", "App.Data": "Debug" }
//! }
//! ```

use super::{ChangeNotifier, ChangeToken, MemoryLoggerSettings};
use crate::core::{LogLevel, LoggerError, Result, DEFAULT_MAX_LOG_COUNT};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

const MAX_LOG_COUNT_KEY: &str = "MaxLogCount";
const INCLUDE_SCOPES_KEY: &str = "IncludeScopes";
const LOG_LEVEL_SECTION: &str = "LogLevel";

#[derive(Debug)]
pub struct ConfigurationSource {
    root: RwLock<Value>,
    notifier: ChangeNotifier,
}

impl ConfigurationSource {
    pub fn new(root: Value) -> Arc<Self> {
        Arc::new(Self {
            root: RwLock::new(root),
            notifier: ChangeNotifier::new(),
        })
    }

    pub fn from_json(json: &str) -> Result<Arc<Self>> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Swap in a new document and fire the reload token.
    pub fn replace(&self, root: Value) {
        *self.root.write() = root;
        self.notifier.notify();
    }

    pub fn replace_json(&self, json: &str) -> Result<()> {
        self.replace(serde_json::from_str(json)?);
        Ok(())
    }

    pub fn reload_token(&self) -> ChangeToken {
        self.notifier.token()
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.root.read().get(key).cloned()
    }

    fn get_in(&self, section: &str, key: &str) -> Option<Value> {
        self.root
            .read()
            .get(section)
            .and_then(|section| section.get(key))
            .cloned()
    }
}

/// [`MemoryLoggerSettings`] over a [`ConfigurationSource`].
#[derive(Debug, Clone)]
pub struct ConfigurationSettings {
    source: Arc<ConfigurationSource>,
    token: ChangeToken,
}

impl ConfigurationSettings {
    pub fn new(source: Arc<ConfigurationSource>) -> Self {
        let token = source.reload_token();
        Self { source, token }
    }

    pub fn source(&self) -> &Arc<ConfigurationSource> {
        &self.source
    }
}

/// Text of a scalar value; `None` for missing, null or empty strings.
fn scalar_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

impl MemoryLoggerSettings for ConfigurationSettings {
    fn max_log_count(&self) -> Result<usize> {
        let Some(text) = scalar_text(self.source.get(MAX_LOG_COUNT_KEY)) else {
            return Ok(DEFAULT_MAX_LOG_COUNT);
        };
        match text.trim().parse::<usize>() {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(LoggerError::unsupported_setting(MAX_LOG_COUNT_KEY, text)),
        }
    }

    fn include_scopes(&self) -> bool {
        match self.source.get(INCLUDE_SCOPES_KEY) {
            Some(Value::Bool(flag)) => flag,
            Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn try_get_switch(&self, category: &str) -> Result<Option<LogLevel>> {
        let Some(text) = scalar_text(self.source.get_in(LOG_LEVEL_SECTION, category)) else {
            return Ok(None);
        };
        text.parse::<LogLevel>()
            .map(Some)
            .map_err(|_| LoggerError::unsupported_level(category, text))
    }

    fn change_token(&self) -> Option<ChangeToken> {
        Some(self.token.clone())
    }

    fn reload(&self) -> Result<Arc<dyn MemoryLoggerSettings>> {
        Ok(Arc::new(ConfigurationSettings::new(Arc::clone(&self.source))))
    }
}
