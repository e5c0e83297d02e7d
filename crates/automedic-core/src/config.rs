//! Resolver configuration.
//!
//! Defaults can be overridden through environment variables:
//!
//! | Variable                  | Meaning                                   | Default                 |
//! |---------------------------|-------------------------------------------|-------------------------|
//! | `AUTOMEDIC_STRATEGY`      | `mock`, `fixed` or `remote`               | `mock`                  |
//! | `AUTOMEDIC_ENDPOINT`      | base URL of the remote diagnosis service  | `http://127.0.0.1:8000` |
//! | `AUTOMEDIC_MOCK_DELAY_MS` | artificial latency of the mock resolvers  | `1500`                  |
//! | `AUTOMEDIC_TIMEOUT_SECS`  | remote request timeout (unset = none)     | unset                   |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{DiagnosisError, Result};

pub const ENV_STRATEGY: &str = "AUTOMEDIC_STRATEGY";
pub const ENV_ENDPOINT: &str = "AUTOMEDIC_ENDPOINT";
pub const ENV_MOCK_DELAY_MS: &str = "AUTOMEDIC_MOCK_DELAY_MS";
pub const ENV_TIMEOUT_SECS: &str = "AUTOMEDIC_TIMEOUT_SECS";

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";
pub const DEFAULT_MOCK_DELAY_MS: u64 = 1500;

/// Which resolver answers diagnosis requests.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Keyword dispatch over the canned diagnoses.
    #[default]
    Mock,
    /// Always answers the brake pad diagnosis.
    Fixed,
    /// Delegates to a remote `POST /api/diagnose` endpoint.
    Remote,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Mock => "mock",
            Strategy::Fixed => "fixed",
            Strategy::Remote => "remote",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = DiagnosisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Strategy::Mock),
            "fixed" => Ok(Strategy::Fixed),
            "remote" => Ok(Strategy::Remote),
            other => Err(DiagnosisError::Config(format!(
                "unknown strategy '{other}' (expected mock, fixed or remote)"
            ))),
        }
    }
}

/// Settings for building a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub strategy: Strategy,
    /// Base URL; `/api/diagnose` is appended by the remote resolver.
    pub endpoint: String,
    pub mock_delay: Duration,
    /// `None` waits for the remote endpoint indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Mock,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            mock_delay: Duration::from_millis(DEFAULT_MOCK_DELAY_MS),
            timeout: None,
        }
    }
}

impl ResolverConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(strategy) = lookup(ENV_STRATEGY) {
            config.strategy = strategy.parse()?;
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            config.endpoint = endpoint;
        }
        if let Some(delay) = lookup(ENV_MOCK_DELAY_MS) {
            let ms = parse_u64(ENV_MOCK_DELAY_MS, &delay)?;
            config.mock_delay = Duration::from_millis(ms);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            let secs = parse_u64(ENV_TIMEOUT_SECS, &timeout)?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_mock_delay(mut self, delay: Duration) -> Self {
        self.mock_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Host and port of the endpoint, with the scheme's default port filled in.
    /// IPv6 hosts are returned without brackets.
    pub fn endpoint_host_port(&self) -> Result<(String, u16)> {
        let invalid = |reason: &str| {
            DiagnosisError::Config(format!("invalid endpoint '{}': {reason}", self.endpoint))
        };
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| invalid(&e.to_string()))?;
        let host = url.host_str().ok_or_else(|| invalid("no host"))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| invalid("no port"))?;
        Ok((
            host.trim_start_matches('[').trim_end_matches(']').to_string(),
            port,
        ))
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| DiagnosisError::Config(format!("{key} must be a whole number, got '{value}'")))
}
