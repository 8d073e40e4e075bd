//! Application state for employee service.

use std::sync::Arc;
use std::time::Duration;

use common::client::SystemClient;
use common::config::{AppConfig, AppSettings, ConnectionProfileStore};
use common::errors::AppResult;
use common::logging::{AppLogger, LogSink, TracingSink};
use crate::context_factory::{ContextSettings, DbContextFactory};
use crate::service::{EmployeeService, EmployeeServiceTrait, EMPLOYEE_PROFILE};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub profiles: Arc<ConnectionProfileStore>,
    pub employees: Arc<dyn EmployeeServiceTrait>,
    pub log_sink: Arc<dyn LogSink>,
    pub system_client: SystemClient,
}

impl AppState {
    /// Creates a new application state from process config and loaded settings.
    pub fn new(config: AppConfig, settings: &AppSettings) -> AppResult<Self> {
        let profiles = Arc::new(ConnectionProfileStore::from_settings(settings)?);
        if profiles.get(EMPLOYEE_PROFILE).is_none() {
            tracing::warn!(profile = EMPLOYEE_PROFILE, "Employee connection profile is not configured");
        }

        let context_settings = ContextSettings {
            acquire_timeout: Duration::from_secs(config.acquire_timeout_secs),
        };
        let factory = Arc::new(DbContextFactory::new(profiles.clone(), context_settings));

        Ok(Self {
            employees: Arc::new(EmployeeService::new(factory)),
            profiles,
            log_sink: Arc::new(TracingSink),
            system_client: SystemClient::new(&settings.system_url())?,
            config,
        })
    }

    /// Per-request logger writing to the shared sink.
    pub fn logger(&self, category: &str) -> AppLogger {
        AppLogger::new(category, self.log_sink.clone())
    }
}
