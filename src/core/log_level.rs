//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Information = 2,
    Warning = 3,
    Error = 4,
    Critical = 5,
    /// Sentinel that disables logging; never stored.
    None = 6,
}

impl LogLevel {
    /// Every level that owns a buffer in the store, ascending.
    pub const STORABLE: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Information,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "Trace",
            LogLevel::Debug => "Debug",
            LogLevel::Information => "Information",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Critical => "Critical",
            LogLevel::None => "None",
        }
    }

    /// Fixed-width label used by the default line formatter.
    pub fn padded_label(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE   ",
            LogLevel::Debug => "DEBUG   ",
            LogLevel::Information => "INFO    ",
            LogLevel::Warning => "WARNING ",
            LogLevel::Error => "ERROR   ",
            LogLevel::Critical => "CRITICAL",
            LogLevel::None => "UNKNOWN ",
        }
    }

    #[inline]
    pub fn is_storable(&self) -> bool {
        *self != LogLevel::None
    }

    /// Position of this level's buffer in the store, `None` for the sentinel.
    #[inline]
    pub(crate) fn slot(&self) -> Option<usize> {
        if self.is_storable() {
            Some(*self as usize)
        } else {
            None
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" | "0" => Ok(LogLevel::Trace),
            "DEBUG" | "1" => Ok(LogLevel::Debug),
            "INFORMATION" | "INFO" | "2" => Ok(LogLevel::Information),
            "WARNING" | "WARN" | "3" => Ok(LogLevel::Warning),
            "ERROR" | "4" => Ok(LogLevel::Error),
            "CRITICAL" | "FATAL" | "5" => Ok(LogLevel::Critical),
            "NONE" | "6" => Ok(LogLevel::None),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
