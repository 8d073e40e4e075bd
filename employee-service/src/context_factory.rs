//! Database context factory.
//!
//! Builds a provider-bound [`DatabaseContext`] for a named connection profile. Provider
//! selection goes through the [`PROVIDERS`] registry: supporting a new provider means
//! adding one entry with its builder function. No builder opens a connection.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use common::config::ConnectionProfileStore;
use common::errors::{AppError, AppResult};
use common::models::{ConnectionProfile, ProviderKind};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{MySqlPool, PgPool};

use crate::connection_string::{self, ConnectionParams, ConnectionSpec};

/// MySQL server version the schema is kept compatible with.
///
/// Recorded on the context and in logs only; sqlx negotiates with the server itself
/// and has no option to pin a version.
pub const MYSQL_COMPAT_VERSION: &str = "5.6.13";

const APPLICATION_NAME: &str = "employee-service";

/// Settings applied to every context the factory builds.
#[derive(Debug, Clone)]
pub struct ContextSettings {
    /// How long the first query may wait for the connection to open.
    pub acquire_timeout: Duration,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Provider-specific connection handle.
///
/// Nothing is opened until the first query runs. The sqlx handles are lazily-connecting
/// pools limited to one connection; Oracle holds connect parameters and opens a
/// connection per query.
#[derive(Debug, Clone)]
pub enum ContextHandle {
    /// MySQL connection.
    MySql(MySqlPool),
    /// PostgreSQL connection.
    Postgres(PgPool),
    /// Oracle connect parameters.
    Oracle(OracleTarget),
}

/// Parameters for opening a blocking Oracle connection.
#[derive(Clone)]
pub struct OracleTarget {
    pub username: String,
    password: String,
    /// Easy Connect string, e.g. `//db:1521/ORCL`.
    pub connect_string: String,
}

impl OracleTarget {
    /// Opens a connection. Blocks; call from a blocking task.
    pub fn connect(&self) -> oracle::Result<oracle::Connection> {
        oracle::Connection::connect(&self.username, &self.password, &self.connect_string)
    }
}

impl std::fmt::Debug for OracleTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleTarget")
            .field("username", &self.username)
            .field("connect_string", &self.connect_string)
            .finish_non_exhaustive()
    }
}

/// Provider-bound handle for one unit of work.
///
/// Owned by the caller that created it and released with [`DatabaseContext::close`].
#[derive(Debug)]
pub struct DatabaseContext {
    profile: String,
    provider: ProviderKind,
    server_version: Option<&'static str>,
    handle: ContextHandle,
}

impl DatabaseContext {
    /// Name of the profile the context was built from.
    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Pinned server compatibility version, if the provider uses one.
    pub fn server_version(&self) -> Option<&'static str> {
        self.server_version
    }

    pub fn handle(&self) -> &ContextHandle {
        &self.handle
    }

    /// Closes the underlying connection, waiting for it to be returned.
    pub async fn close(self) {
        match self.handle {
            ContextHandle::MySql(pool) => pool.close().await,
            ContextHandle::Postgres(pool) => pool.close().await,
            ContextHandle::Oracle(_) => {}
        }
        tracing::debug!(profile = %self.profile, "Database context closed");
    }
}

type ContextBuilder = fn(&ConnectionProfile, &ContextSettings) -> AppResult<ContextHandle>;

/// One registered provider.
struct ProviderEntry {
    kind: ProviderKind,
    server_version: Option<&'static str>,
    build: ContextBuilder,
}

/// Providers the factory can build contexts for.
static PROVIDERS: &[ProviderEntry] = &[
    ProviderEntry {
        kind: ProviderKind::MySql,
        server_version: Some(MYSQL_COMPAT_VERSION),
        build: build_mysql,
    },
    ProviderEntry {
        kind: ProviderKind::Postgres,
        server_version: None,
        build: build_postgres,
    },
    ProviderEntry {
        kind: ProviderKind::Oracle,
        server_version: None,
        build: build_oracle,
    },
];

/// Creates database contexts from named connection profiles.
pub struct DbContextFactory {
    profiles: Arc<ConnectionProfileStore>,
    settings: ContextSettings,
}

impl DbContextFactory {
    pub fn new(profiles: Arc<ConnectionProfileStore>, settings: ContextSettings) -> Self {
        Self { profiles, settings }
    }

    /// Provider kinds with a registered builder.
    pub fn supported_providers() -> Vec<ProviderKind> {
        PROVIDERS.iter().map(|entry| entry.kind).collect()
    }

    /// Builds a context for `profile_name`.
    ///
    /// # Errors
    /// - [`AppError::ConfigurationAbsent`] if no such profile is configured
    /// - [`AppError::UnsupportedProvider`] if the provider is unknown or has no builder
    /// - [`AppError::InvalidConnectionString`] if the connection string cannot be used
    pub fn create_context(&self, profile_name: &str) -> AppResult<DatabaseContext> {
        let profile = self
            .profiles
            .get(profile_name)
            .ok_or_else(|| AppError::ConfigurationAbsent(profile_name.to_string()))?;

        let kind = profile.provider_kind()?;
        let entry = PROVIDERS
            .iter()
            .find(|entry| entry.kind == kind)
            .ok_or_else(|| AppError::UnsupportedProvider(profile.provider.clone()))?;

        let handle = (entry.build)(profile, &self.settings)?;

        tracing::debug!(
            profile = %profile.name,
            provider = %kind,
            server_version = entry.server_version.unwrap_or("-"),
            "Database context created"
        );

        Ok(DatabaseContext {
            profile: profile.name.clone(),
            provider: kind,
            server_version: entry.server_version,
            handle,
        })
    }
}

// ============== Provider Builders ==============

fn build_mysql(profile: &ConnectionProfile, settings: &ContextSettings) -> AppResult<ContextHandle> {
    let options = match connection_string::parse(&profile.name, &profile.connection_string)? {
        ConnectionSpec::Url(url) => MySqlConnectOptions::from_str(&url)
            .map_err(|e| invalid(profile, e))?,
        ConnectionSpec::KeyValue(params) => mysql_options(&params),
    };
    let options = options.charset("utf8mb4");

    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(settings.acquire_timeout)
        .connect_lazy_with(options);
    Ok(ContextHandle::MySql(pool))
}

fn mysql_options(params: &ConnectionParams) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .host(&params.host)
        .port(params.port.unwrap_or(ProviderKind::MySql.default_port()));
    if let Some(username) = &params.username {
        options = options.username(username);
    }
    if let Some(password) = &params.password {
        options = options.password(password);
    }
    if let Some(database) = &params.database {
        options = options.database(database);
    }
    options
}

fn build_postgres(profile: &ConnectionProfile, settings: &ContextSettings) -> AppResult<ContextHandle> {
    let options = match connection_string::parse(&profile.name, &profile.connection_string)? {
        ConnectionSpec::Url(url) => PgConnectOptions::from_str(&url)
            .map_err(|e| invalid(profile, e))?,
        ConnectionSpec::KeyValue(params) => postgres_options(&params),
    };
    let options = options.application_name(APPLICATION_NAME);

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(settings.acquire_timeout)
        .connect_lazy_with(options);
    Ok(ContextHandle::Postgres(pool))
}

fn postgres_options(params: &ConnectionParams) -> PgConnectOptions {
    let mut options = PgConnectOptions::new()
        .host(&params.host)
        .port(params.port.unwrap_or(ProviderKind::Postgres.default_port()));
    if let Some(username) = &params.username {
        options = options.username(username);
    }
    if let Some(password) = &params.password {
        options = options.password(password);
    }
    if let Some(database) = &params.database {
        options = options.database(database);
    }
    options
}

fn build_oracle(profile: &ConnectionProfile, _settings: &ContextSettings) -> AppResult<ContextHandle> {
    match connection_string::parse(&profile.name, &profile.connection_string)? {
        ConnectionSpec::Url(_) => Err(AppError::InvalidConnectionString {
            profile: profile.name.clone(),
            reason: "Oracle profiles use the Data Source=...;User Id=...;Password=... form".to_string(),
        }),
        ConnectionSpec::KeyValue(params) => Ok(ContextHandle::Oracle(OracleTarget {
            username: params.username.clone().unwrap_or_default(),
            password: params.password.clone().unwrap_or_default(),
            connect_string: oracle_connect_string(&params),
        })),
    }
}

/// `Data Source` values are already Easy Connect strings; split host/port/service
/// fields are assembled into one.
fn oracle_connect_string(params: &ConnectionParams) -> String {
    match (&params.database, params.port) {
        (None, None) => params.host.clone(),
        (database, port) => format!(
            "//{}:{}/{}",
            params.host,
            port.unwrap_or(ProviderKind::Oracle.default_port()),
            database.as_deref().unwrap_or_default()
        ),
    }
}

fn invalid(profile: &ConnectionProfile, err: sqlx::Error) -> AppError {
    AppError::InvalidConnectionString {
        profile: profile.name.clone(),
        reason: err.to_string(),
    }
}
