//! Connection profile models.
//!
//! A connection profile is a named database target read from configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::AppError;

/// Relational database technology a profile targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// MySQL database.
    MySql,
    /// PostgreSQL database.
    Postgres,
    /// Oracle database.
    Oracle,
}

impl ProviderKind {
    /// Returns the default port for this provider.
    pub fn default_port(&self) -> u16 {
        match self {
            ProviderKind::MySql => 3306,
            ProviderKind::Postgres => 5432,
            ProviderKind::Oracle => 1521,
        }
    }

    /// Quotes a table or column identifier for this provider's SQL dialect.
    pub fn quote_ident(&self, ident: &str) -> String {
        match self {
            ProviderKind::MySql => format!("`{}`", ident.replace('`', "``")),
            ProviderKind::Postgres | ProviderKind::Oracle => {
                format!("\"{}\"", ident.replace('"', "\"\""))
            }
        }
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    /// Parses configured provider text, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(ProviderKind::MySql),
            "postgres" | "postgresql" | "npgsql" => Ok(ProviderKind::Postgres),
            "oracle" => Ok(ProviderKind::Oracle),
            _ => Err(AppError::UnsupportedProvider(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::MySql => write!(f, "mysql"),
            ProviderKind::Postgres => write!(f, "postgres"),
            ProviderKind::Oracle => write!(f, "oracle"),
        }
    }
}

/// Named database connection definition, immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ConnectionProfile {
    /// Profile name, unique within a deployment.
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    /// Provider text exactly as configured (e.g. "MySQL").
    pub provider: String,
    /// Provider-specific connection string (not serialized in responses).
    #[serde(skip_serializing, default)]
    #[validate(length(min = 1, message = "ConnectionString must not be empty"))]
    pub connection_string: String,
}

impl ConnectionProfile {
    /// Resolves the configured provider text to a known provider kind.
    pub fn provider_kind(&self) -> Result<ProviderKind, AppError> {
        self.provider.parse()
    }
}
