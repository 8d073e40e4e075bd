//! Application error taxonomy.
//!
//! Every failure on the factory and query path is one of these variants. The HTTP
//! layer never surfaces them as transport errors: handlers convert them into a
//! failure-shaped [`ApiResponse`](crate::response::ApiResponse) carrying the error text.

use thiserror::Error;

/// Result alias used across the workspace.
pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// The profile's provider text is unknown, empty, or has no registered builder.
    #[error("Unsupported database provider: '{0}'")]
    UnsupportedProvider(String),

    /// No connection profile with this name exists in configuration.
    #[error("Connection profile '{0}' is not configured")]
    ConfigurationAbsent(String),

    /// The profile's connection string could not be turned into connect options.
    #[error("Invalid connection string for profile '{profile}': {reason}")]
    InvalidConnectionString { profile: String, reason: String },

    /// The driver reported a connectivity, syntax, or permission failure.
    #[error("Query execution failed: {0}")]
    QueryExecution(String),

    /// Configuration could not be loaded or is malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Status code carried inside the response envelope for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) => 422,
            AppError::UnsupportedProvider(_)
            | AppError::ConfigurationAbsent(_)
            | AppError::InvalidConnectionString { .. }
            | AppError::QueryExecution(_)
            | AppError::Config(_) => 500,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::QueryExecution(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_execution_keeps_driver_message() {
        let err = AppError::from(sqlx::Error::Protocol("timeout".to_string()));
        assert!(matches!(err, AppError::QueryExecution(_)));
        assert!(err.to_string().contains("timeout"));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_missing_profile_and_unsupported_provider_are_distinct() {
        let missing = AppError::ConfigurationAbsent("HR".into());
        let unsupported = AppError::UnsupportedProvider("sybase".into());
        assert_ne!(missing.to_string(), unsupported.to_string());
        assert!(missing.to_string().contains("HR"));
        assert!(unsupported.to_string().contains("sybase"));
    }

    #[test]
    fn test_validation_maps_to_422() {
        assert_eq!(AppError::Validation("bad".into()).status_code(), 422);
    }
}
