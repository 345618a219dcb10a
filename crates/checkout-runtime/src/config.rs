//! Gateway Configuration
//!
//! Reads connection settings from the environment:
//!
//! | Variable               | Default                                  |
//! |------------------------|------------------------------------------|
//! | `GATEWAY_BASE_URL`     | `https://testgateway.altapaysecure.com/` |
//! | `GATEWAY_USERNAME`     | required                                 |
//! | `GATEWAY_PASSWORD`     | required                                 |
//! | `GATEWAY_TIMEOUT_SECS` | `30`                                     |

use std::time::Duration;

use checkout_core::{ApiEndpoints, Credentials, GatewayError, Result, Url};

use crate::reqwest_transport::DEFAULT_TIMEOUT;

pub const DEFAULT_BASE_URL: &str = "https://testgateway.altapaysecure.com/";

/// Connection settings for one gateway account
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Gateway base URL (the API lives under `checkout/v1/api`)
    pub base_url: Url,

    pub credentials: Credentials,

    /// Per-request timeout
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: Url, credentials: Credentials) -> Self {
        Self {
            base_url,
            credentials,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| GatewayError::InvalidConfiguration(format!("{key} not set")))
        };

        let raw_base = lookup("GATEWAY_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let base_url = Url::parse(&raw_base).map_err(|e| {
            GatewayError::InvalidConfiguration(format!("GATEWAY_BASE_URL '{raw_base}': {e}"))
        })?;

        let username = required("GATEWAY_USERNAME")?;
        let password = required("GATEWAY_PASSWORD")?;

        let timeout = match lookup("GATEWAY_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    GatewayError::InvalidConfiguration(format!(
                        "GATEWAY_TIMEOUT_SECS '{raw}' is not a whole number of seconds"
                    ))
                })?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url,
            credentials: Credentials::new(username, password),
            timeout,
        })
    }

    /// API endpoints for this gateway
    pub fn endpoints(&self) -> Result<ApiEndpoints> {
        ApiEndpoints::new(&self.base_url)
    }
}
