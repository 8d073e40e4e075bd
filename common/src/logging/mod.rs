//! Structured logging facade.
//!
//! [`AppLogger`] wraps a [`LogSink`] with leveled, template-based logging, a scoped
//! context stack, and a catalog of event helpers (see [`events`]). A logger is meant to
//! live for one request or unit of work; it is not shared across tasks.
//!
//! ```ignore
//! let logger = AppLogger::tracing("employee_service::handlers");
//! let _scope = logger.begin_scope("GetEmployeeList");
//! logger.info("Fetched {Count} employees", &[json!(3)]);
//! logger.log_performance("GetEmployeeList", elapsed, None);
//! ```

pub mod context;
pub mod events;
pub mod sink;
pub mod template;

use std::sync::Arc;

use serde_json::Value;

pub use context::{ContextGuard, LogContext, Property};
pub use sink::{LogLevel, LogRecord, LogSink, TracingSink};

/// Leveled logger with scoped structured context.
pub struct AppLogger {
    category: String,
    sink: Arc<dyn LogSink>,
    context: LogContext,
}

impl AppLogger {
    pub fn new(category: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            category: category.into(),
            sink,
            context: LogContext::new(),
        }
    }

    /// Logger writing to the global `tracing` subscriber.
    pub fn tracing(category: impl Into<String>) -> Self {
        Self::new(category, Arc::new(TracingSink))
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Renders `template` with `args` and emits it with the current context attached.
    pub fn log(&self, level: LogLevel, template: &str, args: &[Value]) {
        self.emit(level, template, args, None);
    }

    fn emit(&self, level: LogLevel, template: &str, args: &[Value], error: Option<String>) {
        let (message, template_properties) = template::render(template, args);

        // Snapshot first; the sink runs without the context lock held.
        let mut properties = self.context.snapshot();
        properties.extend(template_properties);
        if let Some(error) = error {
            properties.push(Property::new("Exception", error));
        }

        self.sink.emit(&LogRecord {
            level,
            category: self.category.clone(),
            template: template.to_string(),
            message,
            properties,
        });
    }

    pub fn debug(&self, template: &str, args: &[Value]) {
        self.log(LogLevel::Debug, template, args);
    }

    pub fn info(&self, template: &str, args: &[Value]) {
        self.log(LogLevel::Information, template, args);
    }

    pub fn warn(&self, template: &str, args: &[Value]) {
        self.log(LogLevel::Warning, template, args);
    }

    pub fn error(&self, template: &str, args: &[Value]) {
        self.log(LogLevel::Error, template, args);
    }

    pub fn critical(&self, template: &str, args: &[Value]) {
        self.log(LogLevel::Critical, template, args);
    }

    /// Logs at error level with the error and its source chain as `Exception`.
    pub fn error_with(&self, err: &dyn std::error::Error, template: &str, args: &[Value]) {
        self.emit(LogLevel::Error, template, args, Some(error_chain(err)));
    }

    pub fn critical_with(&self, err: &dyn std::error::Error, template: &str, args: &[Value]) {
        self.emit(LogLevel::Critical, template, args, Some(error_chain(err)));
    }

    /// Pushes a single property for the lifetime of the returned guard.
    pub fn push_property(&self, key: impl Into<String>, value: impl Into<Value>) -> ContextGuard<'_> {
        self.context.push([Property::new(key, value)])
    }

    /// Names the enclosing operation: pushes `Scope = name`.
    pub fn begin_scope(&self, name: impl Into<String>) -> ContextGuard<'_> {
        self.push_property("Scope", name.into())
    }

    /// Pushes all `properties` as one frame.
    pub fn begin_scope_with<I, K, V>(&self, properties: I) -> ContextGuard<'_>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.context
            .push(properties.into_iter().map(|(k, v)| Property::new(k, v)))
    }

    /// Number of context frames currently pushed.
    pub fn context_depth(&self) -> usize {
        self.context.depth()
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}


#[cfg(test)]
mod tests {
    use super::testing::recording_logger;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leveled_methods_map_to_levels() {
        let (logger, sink) = recording_logger();
        logger.debug("d", &[]);
        logger.info("i", &[]);
        logger.warn("w", &[]);
        logger.error("e", &[]);
        logger.critical("c", &[]);

        let levels: Vec<LogLevel> = sink.records().iter().map(|r| r.level).collect();
        assert_eq!(
            levels,
            vec![
                LogLevel::Debug,
                LogLevel::Information,
                LogLevel::Warning,
                LogLevel::Error,
                LogLevel::Critical
            ]
        );
    }

    #[test]
    fn test_scope_properties_attach_then_detach() {
        let (logger, sink) = recording_logger();
        {
            let _scope = logger.begin_scope("ListEmployees");
            let _props = logger.begin_scope_with([("RequestId", "r-1")]);
            logger.info("Loaded {Count} rows", &[json!(3)]);
        }
        logger.info("after", &[]);

        let records = sink.records();
        assert_eq!(records[0].message, "Loaded 3 rows");
        assert_eq!(records[0].property("Scope"), Some(&json!("ListEmployees")));
        assert_eq!(records[0].property("RequestId"), Some(&json!("r-1")));
        assert_eq!(records[0].property("Count"), Some(&json!(3)));
        assert!(records[1].properties.is_empty());
        assert_eq!(logger.context_depth(), 0);
    }

    #[test]
    fn test_error_with_records_source_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer")]
        struct Outer(#[source] std::io::Error);

        let (logger, sink) = recording_logger();
        let err = Outer(std::io::Error::other("disk gone"));
        logger.error_with(&err, "Save failed for {Id}", &[json!(9)]);

        let record = sink.last();
        assert_eq!(record.level, LogLevel::Error);
        assert_eq!(record.property("Exception"), Some(&json!("outer: disk gone")));
    }

    #[test]
    fn test_context_restored_when_sink_panics() {
        struct PanickingSink;
        impl LogSink for PanickingSink {
            fn emit(&self, _record: &LogRecord) {
                panic!("sink unavailable");
            }
        }

        let logger = AppLogger::new("test", Arc::new(PanickingSink));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.log_security_event("LoginFailed", "u-1", "bad password", None);
        }));
        assert!(result.is_err());
        assert_eq!(logger.context_depth(), 0);
    }
}
