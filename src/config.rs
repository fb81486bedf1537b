// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Chainfeed

//! # Gateway Configuration
//!
//! Configuration is loaded from the environment at startup; every value has
//! a development default so the client works against a locally-running
//! backend with no setup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `NEWS_API_URL` | Base URL of the Chainfeed backend | `http://localhost:8000` |
//! | `NEWS_API_TIMEOUT_SECS` | Per-request timeout in seconds | `15` |
//! | `RUST_LOG` | Log level filter (CLI only) | `info` |

use std::time::Duration;

/// Environment variable name for the backend base URL.
pub const API_URL_ENV: &str = "NEWS_API_URL";

/// Environment variable name for the per-request timeout.
pub const API_TIMEOUT_ENV: &str = "NEWS_API_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Connection settings for the gateway client.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Timeout applied to each request.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Build a configuration for the given base URL with default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Empty or whitespace-only values are treated as unset.
    pub fn from_env() -> Self {
        let base_url = env_or_default(API_URL_ENV, DEFAULT_BASE_URL);
        let timeout_secs = env_optional(API_TIMEOUT_ENV)
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url: normalize_base_url(base_url),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn normalize_base_url(raw: String) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = GatewayConfig::new("https://api.chainfeed.example//");
        assert_eq!(config.base_url, "https://api.chainfeed.example");
    }

    #[test]
    fn timeout_override() {
        let config = GatewayConfig::default().with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
