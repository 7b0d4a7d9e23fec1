//! Settings held in memory

use super::{ChangeToken, MemoryLoggerSettings};
use crate::core::{LogLevel, LoggerError, Result, DEFAULT_MAX_LOG_COUNT};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Fixed settings, typically built in code or deserialized once.
///
/// # Example
///
/// ```
/// use rust_memory_logger::settings::{MemoryLoggerSettings, StaticSettings};
/// use rust_memory_logger::LogLevel;
///
/// let settings = StaticSettings::new()
///     .with_max_log_count(50)
///     .with_switch("App", LogLevel::Debug);
///
/// assert_eq!(settings.max_log_count().unwrap(), 50);
/// assert_eq!(settings.try_get_switch("App").unwrap(), Some(LogLevel::Debug));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StaticSettings {
    pub max_log_count: usize,
    pub include_scopes: bool,
    #[serde(rename = "LogLevel", deserialize_with = "deserialize_switches")]
    pub switches: HashMap<String, LogLevel>,
    #[serde(skip)]
    pub change_token: Option<ChangeToken>,
}

impl StaticSettings {
    pub fn new() -> Self {
        Self {
            max_log_count: DEFAULT_MAX_LOG_COUNT,
            include_scopes: false,
            switches: HashMap::new(),
            change_token: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_log_count(mut self, max_log_count: usize) -> Self {
        self.max_log_count = max_log_count;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_switch(mut self, category: impl Into<String>, level: LogLevel) -> Self {
        self.switches.insert(category.into(), level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_include_scopes(mut self, include_scopes: bool) -> Self {
        self.include_scopes = include_scopes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_change_token(mut self, token: ChangeToken) -> Self {
        self.change_token = Some(token);
        self
    }
}

/// Level switches accept everything [`LogLevel::from_str`](std::str::FromStr)
/// does, including aliases and numbers; errors name the category.
fn deserialize_switches<'de, D>(deserializer: D) -> std::result::Result<HashMap<String, LogLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(category, value)| {
            let text = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
            match text.parse::<LogLevel>() {
                Ok(level) => Ok((category, level)),
                Err(_) => Err(de::Error::custom(LoggerError::unsupported_level(category, text))),
            }
        })
        .collect()
}

impl Default for StaticSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLoggerSettings for StaticSettings {
    fn max_log_count(&self) -> Result<usize> {
        if self.max_log_count == 0 {
            return Err(LoggerError::unsupported_setting("MaxLogCount", "0"));
        }
        Ok(self.max_log_count)
    }

    fn include_scopes(&self) -> bool {
        self.include_scopes
    }

    fn try_get_switch(&self, category: &str) -> Result<Option<LogLevel>> {
        Ok(self.switches.get(category).copied())
    }

    fn change_token(&self) -> Option<ChangeToken> {
        self.change_token.clone()
    }

    fn reload(&self) -> Result<Arc<dyn MemoryLoggerSettings>> {
        Ok(Arc::new(self.clone()))
    }
}
