//! Error types for the memory logger
//!
//! Only configuration paths can fail. Appending and querying never return
//! an error: disabled levels and empty lines are absorbed silently.

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Capacity must be a positive number of entries
    #[error("Invalid capacity {0}: each level must keep at least one entry")]
    InvalidCapacity(usize),

    /// Setting value that cannot be parsed
    #[error("Configuration value '{value}' for setting '{setting}' is not supported.")]
    UnsupportedSetting { setting: String, value: String },

    /// Level switch that cannot be parsed
    #[error("Configuration value '{value}' for category '{category}' is not supported.")]
    UnsupportedLevel { category: String, value: String },

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Reload watcher could not be started
    #[error("Failed to start settings watcher: {0}")]
    WatcherSpawn(#[source] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported setting value error
    pub fn unsupported_setting(setting: impl Into<String>, value: impl Into<String>) -> Self {
        LoggerError::UnsupportedSetting {
            setting: setting.into(),
            value: value.into(),
        }
    }

    /// Create an unsupported level switch error
    pub fn unsupported_level(category: impl Into<String>, value: impl Into<String>) -> Self {
        LoggerError::UnsupportedLevel {
            category: category.into(),
            value: value.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
