//! Event helpers.
//!
//! Each helper pushes a fixed set of context properties, logs one templated message at
//! the level the event calls for, and pops the properties again before returning.

use std::time::Duration;

use serde_json::Value;

use super::{AppLogger, LogLevel, Property};

/// Operations slower than this are logged as warnings.
pub const SLOW_OPERATION_THRESHOLD_MS: f64 = 1000.0;

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn data(value: Option<Value>) -> Value {
    value.unwrap_or(Value::Null)
}

impl AppLogger {
    fn with_context<const N: usize>(
        &self,
        properties: [(&str, Value); N],
        level: LogLevel,
        template: &str,
        args: &[Value],
    ) {
        let _frame = self
            .context
            .push(properties.into_iter().map(|(k, v)| Property::new(k, v)));
        self.log(level, template, args);
    }

    pub fn log_user_action(&self, user_id: &str, action: &str, additional_data: Option<Value>) {
        self.with_context(
            [("UserId", user_id.into()), ("ActionType", "UserAction".into())],
            LogLevel::Information,
            "User {UserId} performed action: {Action} with data: {@AdditionalData}",
            &[user_id.into(), action.into(), data(additional_data)],
        );
    }

    pub fn log_business_operation(
        &self,
        operation: &str,
        entity_type: &str,
        entity_id: &str,
        metadata: Option<Value>,
    ) {
        self.with_context(
            [
                ("OperationType", "BusinessOperation".into()),
                ("EntityType", entity_type.into()),
                ("EntityId", entity_id.into()),
            ],
            LogLevel::Information,
            "Business operation {Operation} on {EntityType}:{EntityId} with metadata: {@Metadata}",
            &[
                operation.into(),
                entity_type.into(),
                entity_id.into(),
                data(metadata),
            ],
        );
    }

    /// Warning when `duration` is strictly over one second, information otherwise.
    pub fn log_performance(&self, operation: &str, duration: Duration, additional_data: Option<Value>) {
        let ms = millis(duration);
        let level = if ms > SLOW_OPERATION_THRESHOLD_MS {
            LogLevel::Warning
        } else {
            LogLevel::Information
        };
        self.with_context(
            [("PerformanceMetric", true.into()), ("Duration", ms.into())],
            level,
            "Performance: {Operation} took {Duration}ms - {@AdditionalData}",
            &[operation.into(), ms.into(), data(additional_data)],
        );
    }

    pub fn log_security_event(
        &self,
        event_type: &str,
        user_id: &str,
        details: &str,
        metadata: Option<Value>,
    ) {
        self.with_context(
            [
                ("SecurityEvent", true.into()),
                ("UserId", user_id.into()),
                ("EventType", event_type.into()),
            ],
            LogLevel::Warning,
            "Security Event: {EventType} for user {UserId} - {Details} - {@Metadata}",
            &[
                event_type.into(),
                user_id.into(),
                details.into(),
                data(metadata),
            ],
        );
    }

    pub fn log_system_event(&self, event_type: &str, component: &str, payload: Option<Value>) {
        self.with_context(
            [("SystemEvent", true.into()), ("Component", component.into())],
            LogLevel::Information,
            "System Event: {EventType} in {Component} - {@Data}",
            &[event_type.into(), component.into(), data(payload)],
        );
    }

    /// Error when the remote answered with a status of 400 or above.
    pub fn log_external_api_call(&self, api_name: &str, endpoint: &str, status_code: u16, duration: Duration) {
        let ms = millis(duration);
        let level = if status_code >= 400 {
            LogLevel::Error
        } else {
            LogLevel::Information
        };
        self.with_context(
            [
                ("EventType", "ExternalApiCall".into()),
                ("ApiName", api_name.into()),
                ("Endpoint", endpoint.into()),
                ("StatusCode", status_code.into()),
                ("Duration", ms.into()),
            ],
            level,
            "External API call to {ApiName} at {Endpoint} returned {StatusCode} in {Duration}ms",
            &[api_name.into(), endpoint.into(), status_code.into(), ms.into()],
        );
    }

    pub fn log_cache_operation(&self, operation: &str, key: &str, hit: bool, metadata: Option<Value>) {
        self.with_context(
            [
                ("EventType", "CacheOperation".into()),
                ("Operation", operation.into()),
                ("CacheKey", key.into()),
                ("CacheHit", hit.into()),
            ],
            LogLevel::Debug,
            "Cache {Operation} for key {CacheKey}: {Result} - {@Metadata}",
            &[
                operation.into(),
                key.into(),
                if hit { "HIT" } else { "MISS" }.into(),
                data(metadata),
            ],
        );
    }

    pub fn log_business_rule_violation(&self, rule: &str, context: &str, payload: Option<Value>) {
        self.with_context(
            [("EventType", "BusinessRuleViolation".into()), ("Rule", rule.into())],
            LogLevel::Warning,
            "Business rule violation: {Rule} in context: {Context} with data: {@Data}",
            &[rule.into(), context.into(), data(payload)],
        );
    }

    pub fn log_validation_failure(&self, validator: &str, errors: &str, input: Option<Value>) {
        self.with_context(
            [("EventType", "ValidationFailure".into()), ("Validator", validator.into())],
            LogLevel::Warning,
            "Validation failed in {Validator}: {Errors} for input: {@Input}",
            &[validator.into(), errors.into(), data(input)],
        );
    }

    pub fn log_service_call(&self, service: &str, method: &str, parameters: Option<Value>) {
        self.with_context(
            [
                ("EventType", "ServiceCall".into()),
                ("Service", service.into()),
                ("Method", method.into()),
            ],
            LogLevel::Debug,
            "Calling service {Service}.{Method} with parameters: {@Parameters}",
            &[service.into(), method.into(), data(parameters)],
        );
    }

    pub fn log_service_response(&self, service: &str, method: &str, success: bool, response: Option<Value>) {
        let (level, template) = if success {
            (
                LogLevel::Debug,
                "Service {Service}.{Method} completed successfully with response: {@Response}",
            )
        } else {
            (
                LogLevel::Error,
                "Service {Service}.{Method} failed with response: {@Response}",
            )
        };
        self.with_context(
            [
                ("EventType", "ServiceResponse".into()),
                ("Service", service.into()),
                ("Method", method.into()),
                ("Success", success.into()),
            ],
            level,
            template,
            &[service.into(), method.into(), data(response)],
        );
    }

    pub fn log_data_access(&self, operation: &str, entity: &str, id: &str, success: bool) {
        let (level, template) = if success {
            (
                LogLevel::Debug,
                "Data access: {Operation} on {Entity}:{EntityId} succeeded",
            )
        } else {
            (
                LogLevel::Error,
                "Data access: {Operation} on {Entity}:{EntityId} failed",
            )
        };
        self.with_context(
            [
                ("EventType", "DataAccess".into()),
                ("Operation", operation.into()),
                ("Entity", entity.into()),
                ("EntityId", id.into()),
            ],
            level,
            template,
            &[operation.into(), entity.into(), id.into()],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::recording_logger;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_performance_threshold() {
        let (logger, sink) = recording_logger();

        logger.log_performance("Slow", Duration::from_millis(1500), None);
        assert_eq!(sink.last().level, LogLevel::Warning);

        logger.log_performance("Fast", Duration::from_millis(500), None);
        assert_eq!(sink.last().level, LogLevel::Information);

        logger.log_performance("Edge", Duration::from_millis(1000), None);
        assert_eq!(sink.last().level, LogLevel::Information);

        logger.log_performance("JustOver", Duration::from_micros(1_000_001), None);
        assert_eq!(sink.last().level, LogLevel::Warning);
    }

    #[test]
    fn test_performance_record_shape() {
        let (logger, sink) = recording_logger();
        logger.log_performance("Query", Duration::from_millis(250), Some(json!({"rows": 3})));

        let record = sink.last();
        assert_eq!(record.message, r#"Performance: Query took 250.0ms - {"rows":3}"#);
        assert_eq!(record.property("PerformanceMetric"), Some(&json!(true)));
        assert_eq!(record.property("Duration"), Some(&json!(250.0)));
    }

    #[test]
    fn test_fixed_level_events() {
        let (logger, sink) = recording_logger();

        logger.log_user_action("u-1", "Export", None);
        assert_eq!(sink.last().level, LogLevel::Information);
        assert_eq!(sink.last().property("ActionType"), Some(&json!("UserAction")));

        logger.log_business_operation("Approve", "Leave", "42", None);
        assert_eq!(sink.last().level, LogLevel::Information);
        assert_eq!(sink.last().message, "Business operation Approve on Leave:42 with metadata: null");

        logger.log_security_event("LoginFailed", "u-1", "bad password", None);
        assert_eq!(sink.last().level, LogLevel::Warning);
        assert_eq!(sink.last().property("SecurityEvent"), Some(&json!(true)));

        logger.log_system_event("Startup", "employee-service", None);
        assert_eq!(sink.last().level, LogLevel::Information);

        logger.log_business_rule_violation("MaxLeave", "Leave request", None);
        assert_eq!(sink.last().level, LogLevel::Warning);

        logger.log_validation_failure("EmployeeValidator", "Email is required", None);
        assert_eq!(sink.last().level, LogLevel::Warning);
        assert_eq!(sink.last().property("Validator"), Some(&json!("EmployeeValidator")));

        logger.log_service_call("Directory", "List", Some(json!({"page": 1})));
        assert_eq!(sink.last().level, LogLevel::Debug);
    }

    #[test]
    fn test_external_api_call_levels() {
        let (logger, sink) = recording_logger();

        logger.log_external_api_call("Payroll", "/api/runs", 200, Duration::from_millis(80));
        assert_eq!(sink.last().level, LogLevel::Information);

        logger.log_external_api_call("Payroll", "/api/runs", 400, Duration::from_millis(80));
        let record = sink.last();
        assert_eq!(record.level, LogLevel::Error);
        assert_eq!(record.property("StatusCode"), Some(&json!(400)));
        assert_eq!(record.property("EventType"), Some(&json!("ExternalApiCall")));
    }

    #[test]
    fn test_cache_operation_reports_hit_or_miss() {
        let (logger, sink) = recording_logger();

        logger.log_cache_operation("Get", "employees:all", false, None);
        let record = sink.last();
        assert_eq!(record.level, LogLevel::Debug);
        assert_eq!(record.message, "Cache Get for key employees:all: MISS - null");
        assert_eq!(record.property("CacheHit"), Some(&json!(false)));

        logger.log_cache_operation("Get", "employees:all", true, None);
        assert!(sink.last().message.contains("HIT"));
    }

    #[test]
    fn test_outcome_dependent_events() {
        let (logger, sink) = recording_logger();

        logger.log_service_response("Directory", "List", true, None);
        assert_eq!(sink.last().level, LogLevel::Debug);
        logger.log_service_response("Directory", "List", false, None);
        assert_eq!(sink.last().level, LogLevel::Error);

        logger.log_data_access("ListAll", "EmployeeRecord", "*", true);
        assert_eq!(sink.last().level, LogLevel::Debug);
        logger.log_data_access("ListAll", "EmployeeRecord", "*", false);
        let record = sink.last();
        assert_eq!(record.level, LogLevel::Error);
        assert_eq!(record.message, "Data access: ListAll on EmployeeRecord:* failed");
    }

    #[test]
    fn test_event_context_nests_inside_scope_and_unwinds() {
        let (logger, sink) = recording_logger();
        let _scope = logger.begin_scope("Request");

        logger.log_data_access("ListAll", "EmployeeRecord", "*", true);
        let record = sink.last();
        assert_eq!(record.property("Scope"), Some(&json!("Request")));
        assert_eq!(record.property("EventType"), Some(&json!("DataAccess")));
        assert_eq!(logger.context_depth(), 1);
    }
}
