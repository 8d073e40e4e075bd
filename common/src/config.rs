//! Configuration loading.
//!
//! Two layers:
//! - [`AppConfig`]: process settings from environment variables (bind address, timeouts).
//! - [`AppSettings`]: `appsettings.json` layered with environment overrides through
//!   figment, from which the [`ConnectionProfileStore`] and the system base URL are read.

use std::collections::HashMap;
use std::path::Path;

use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use serde::Deserialize;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::ConnectionProfile;

/// Section holding the named connection profiles.
pub const PROFILES_SECTION: &str = "DynamicConnectionStrings";
const SYSTEM_URL_SECTION: &str = "SystemURL";
/// Base address used when `SystemURL:BaseURLFromAppSettings` is unset or blank.
pub const DEFAULT_SYSTEM_URL: &str = "https://localhost:44332/";

const ENV_DELIMITER: &str = "__";

/// Process-level settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Service name, used in logs and health responses.
    pub service_name: String,
    pub host: String,
    pub port: u16,
    /// Upper bound for acquiring a database connection on first query.
    pub acquire_timeout_secs: u64,
    /// Path of the hierarchical settings file.
    pub settings_path: String,
}

impl AppConfig {
    /// Loads settings from the environment with per-field defaults.
    pub fn load_with_service(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("SERVER_PORT").unwrap_or(8080),
            acquire_timeout_secs: env_parse("DB_ACQUIRE_TIMEOUT_SECS").unwrap_or(30),
            settings_path: std::env::var("APPSETTINGS_PATH")
                .unwrap_or_else(|_| "appsettings.json".to_string()),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Settings read from `appsettings.json` with environment overrides.
///
/// Environment variables use `__` as the section separator and must be spelled like the
/// file's keys, e.g. `DynamicConnectionStrings__TPCInformationDB__Provider`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppSettings {
    #[serde(rename = "DynamicConnectionStrings", default)]
    pub connection_profiles: HashMap<String, ProfileSection>,
    #[serde(rename = "SystemURL", default)]
    pub system: SystemUrlSection,
}

/// One entry under [`PROFILES_SECTION`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileSection {
    /// Missing provider is kept empty and fails later as unsupported.
    #[serde(rename = "Provider", default)]
    pub provider: String,
    #[serde(rename = "ConnectionString", default)]
    pub connection_string: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemUrlSection {
    #[serde(rename = "BaseURLFromAppSettings", default)]
    pub base_url: Option<String>,
}

impl AppSettings {
    /// Settings file first, then `Section__Key` environment variables on top.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::new()
            .merge(Json::file(path.as_ref()))
            .merge(
                Env::raw()
                    .filter(|key| is_settings_key(key.as_str()))
                    .lowercase(false)
                    .split(ENV_DELIMITER),
            )
    }

    /// Loads `path` if it exists, then applies process environment overrides.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Settings file not found, using environment only");
        }

        Self::figment(path)
            .extract()
            .map_err(|e| AppError::Config(format!("invalid settings in {}: {}", path.display(), e)))
    }

    /// Outbound client base address, falling back to [`DEFAULT_SYSTEM_URL`].
    pub fn system_url(&self) -> String {
        match self.system.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => DEFAULT_SYSTEM_URL.to_string(),
        }
    }
}

fn is_settings_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    [PROFILES_SECTION, SYSTEM_URL_SECTION]
        .iter()
        .any(|section| key.starts_with(&format!("{}{}", section.to_ascii_lowercase(), ENV_DELIMITER)))
}

/// Read-only lookup of named connection profiles.
///
/// Loaded once at startup and shared behind an `Arc`; lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct ConnectionProfileStore {
    profiles: HashMap<String, ConnectionProfile>,
}

impl ConnectionProfileStore {
    /// Reads every profile under [`PROFILES_SECTION`].
    ///
    /// A profile without a connection string is rejected here.
    pub fn from_settings(settings: &AppSettings) -> AppResult<Self> {
        let mut store = Self::default();

        for (name, section) in &settings.connection_profiles {
            let profile = ConnectionProfile {
                name: name.clone(),
                provider: section.provider.clone(),
                connection_string: section.connection_string.clone(),
            };
            profile
                .validate()
                .map_err(|e| AppError::Config(format!("profile '{}': {}", name, e)))?;

            tracing::debug!(profile = %profile.name, provider = %profile.provider, "Connection profile loaded");
            store.insert(profile);
        }

        Ok(store)
    }

    /// Builds a store from already-constructed profiles.
    pub fn from_profiles(profiles: impl IntoIterator<Item = ConnectionProfile>) -> Self {
        let mut store = Self::default();
        for profile in profiles {
            store.insert(profile);
        }
        store
    }

    fn insert(&mut self, profile: ConnectionProfile) {
        self.profiles.insert(profile.name.to_lowercase(), profile);
    }

    pub fn get(&self, name: &str) -> Option<&ConnectionProfile> {
        self.profiles.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.values().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names
    }
}
