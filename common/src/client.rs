//! Outbound HTTP client bound to the configured system base address.

use std::time::Duration;

use reqwest::Url;

use crate::errors::{AppError, AppResult};

/// Long-running report downloads go through this client.
pub const SYSTEM_CLIENT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// HTTP client bound to `SystemURL:BaseURLFromAppSettings`.
#[derive(Debug, Clone)]
pub struct SystemClient {
    pub base_url: Url,
    pub http: reqwest::Client,
}

impl SystemClient {
    pub fn new(base_url: &str) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid system base URL '{}': {}", base_url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(SYSTEM_CLIENT_TIMEOUT)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, http })
    }
}
