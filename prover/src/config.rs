use crate::error::{Result, ToolchainError};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProverConfig {
    /// Base URL of an external proving service; `None` selects the in-process backend
    pub endpoint: Option<Url>,
    pub ready_attempts: u32,
    pub ready_interval_seconds: u64,
    pub timeout_seconds: u64,
}

impl ProverConfig {
    pub fn from_env() -> Result<Self> {
        let endpoint = match env::var("PROVER_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Url::parse(raw.trim())
                    .map_err(|e| ToolchainError::Config(format!("Invalid PROVER_URL: {e}")))?,
            ),
            _ => None,
        };

        let defaults = Self::default();
        Ok(Self {
            endpoint,
            ready_attempts: env::var("PROVER_READY_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.ready_attempts),
            ready_interval_seconds: env::var("PROVER_READY_INTERVAL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.ready_interval_seconds),
            timeout_seconds: env::var("PROVER_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            if !matches!(endpoint.scheme(), "http" | "https") {
                return Err(ToolchainError::Config(format!(
                    "Unsupported prover URL scheme: {}",
                    endpoint.scheme()
                )));
            }
        }

        if self.ready_attempts == 0 {
            return Err(ToolchainError::Config(
                "Readiness attempts must be greater than 0".to_string(),
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(ToolchainError::Config(
                "Prover timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub const fn ready_interval(&self) -> Duration {
        Duration::from_secs(self.ready_interval_seconds)
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            ready_attempts: 60,
            ready_interval_seconds: 5,
            // Compiling a contract can take minutes
            timeout_seconds: 600,
        }
    }
}
