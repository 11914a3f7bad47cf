//! # Controller Configuration
//!
//! Controller-level settings loaded from environment variables.

use crate::constants::{
    DEFAULT_BACKOFF_MAX_SECS, DEFAULT_BACKOFF_MIN_SECS, DEFAULT_CREATE_GRACE_REQUEUE_SECS,
    DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL, DEFAULT_MAX_RECONCILE_RATE, DEFAULT_METRICS_PORT,
    DEFAULT_POLL_INTERVAL_SECS,
};
use std::time::Duration;

/// Controller-level configuration
///
/// All settings have defaults and can be overridden via environment variables.
/// Command-line flags take precedence over both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Interval between observations of an in-sync resource (seconds)
    pub poll_interval_secs: u64,
    /// Resources of one kind reconciled concurrently
    pub max_reconcile_rate: u16,
    /// Port of the metrics and probe server
    pub metrics_port: u16,
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Error backoff lower bound (seconds)
    pub backoff_min_secs: u64,
    /// Error backoff upper bound (seconds)
    pub backoff_max_secs: u64,
    /// Requeue delay after a create (seconds)
    pub create_grace_requeue_secs: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_reconcile_rate: DEFAULT_MAX_RECONCILE_RATE,
            metrics_port: DEFAULT_METRICS_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: DEFAULT_LOG_FORMAT.to_string(),
            backoff_min_secs: DEFAULT_BACKOFF_MIN_SECS,
            backoff_max_secs: DEFAULT_BACKOFF_MAX_SECS,
            create_grace_requeue_secs: DEFAULT_CREATE_GRACE_REQUEUE_SECS,
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            poll_interval_secs: env_var_or_default("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS),
            max_reconcile_rate: env_var_or_default("MAX_RECONCILE_RATE", DEFAULT_MAX_RECONCILE_RATE),
            metrics_port: env_var_or_default("METRICS_PORT", DEFAULT_METRICS_PORT),
            log_level: env_var_or_default_str("LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_format: env_var_or_default_str("LOG_FORMAT", DEFAULT_LOG_FORMAT),
            backoff_min_secs: env_var_or_default("BACKOFF_MIN_SECS", DEFAULT_BACKOFF_MIN_SECS),
            backoff_max_secs: env_var_or_default("BACKOFF_MAX_SECS", DEFAULT_BACKOFF_MAX_SECS),
            create_grace_requeue_secs: env_var_or_default(
                "CREATE_GRACE_REQUEUE_SECS",
                DEFAULT_CREATE_GRACE_REQUEUE_SECS,
            ),
        }
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub fn create_grace_requeue(&self) -> Duration {
        Duration::from_secs(self.create_grace_requeue_secs)
    }

    /// Whether logs are emitted as JSON
    #[must_use]
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(60));
        assert_eq!(config.max_reconcile_rate, 10);
        assert_eq!(config.metrics_port, 8080);
        assert!(!config.json_logs());
    }

    #[test]
    fn test_unparseable_value_falls_back_to_default() {
        assert_eq!(env_var_or_default("PROVIDER_AWS_TEST_UNSET_KEY", 42u64), 42);
    }

    #[test]
    fn test_json_logs_is_case_insensitive() {
        let config = ControllerConfig {
            log_format: "JSON".to_string(),
            ..ControllerConfig::default()
        };
        assert!(config.json_logs());
    }
}
