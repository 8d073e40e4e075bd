//! Log records and the sinks that receive them.

use serde_json::{Map, Value};

use super::context::Property;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Information,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Debug => "Debug",
            LogLevel::Information => "Information",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Critical => "Critical",
        };
        f.write_str(name)
    }
}

/// A fully rendered, structured log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: LogLevel,
    /// Logical source of the record, e.g. `employee_service::handlers`.
    pub category: String,
    /// Template before rendering.
    pub template: String,
    /// Rendered message.
    pub message: String,
    /// Context properties followed by template properties.
    pub properties: Vec<Property>,
}

impl LogRecord {
    /// Last value recorded under `key`.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .rev()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }

    /// Properties as a JSON object; later keys win.
    pub fn properties_json(&self) -> Value {
        let map: Map<String, Value> = self
            .properties
            .iter()
            .map(|p| (p.key.clone(), p.value.clone()))
            .collect();
        Value::Object(map)
    }
}

/// Destination for log records.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord);
}

/// Forwards records to the global `tracing` subscriber.
///
/// `tracing` has no critical level; critical records go out as errors tagged
/// `critical = true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord) {
        let category = record.category.as_str();
        let properties = record.properties_json();
        let message = record.message.as_str();

        match record.level {
            LogLevel::Debug => {
                tracing::debug!(category, properties = %properties, "{}", message)
            }
            LogLevel::Information => {
                tracing::info!(category, properties = %properties, "{}", message)
            }
            LogLevel::Warning => {
                tracing::warn!(category, properties = %properties, "{}", message)
            }
            LogLevel::Error => {
                tracing::error!(category, properties = %properties, "{}", message)
            }
            LogLevel::Critical => {
                tracing::error!(category, critical = true, properties = %properties, "{}", message)
            }
        }
    }
}
