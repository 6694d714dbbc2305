//! Environment-driven configuration.

use std::time::Duration;

use crate::error::ConfigError;
use crate::poller::DEFAULT_POLL_INTERVAL;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

const BASE_URL_VAR: &str = "TODO_API_URL";
const POLL_INTERVAL_VAR: &str = "TODO_POLL_INTERVAL_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Root of the todo API, e.g. `http://localhost:5000/api`.
    pub base_url: String,
    pub poll_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl SyncConfig {
    /// Read `TODO_API_URL` and `TODO_POLL_INTERVAL_SECS`, falling back to
    /// defaults for unset or empty variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(POLL_INTERVAL_VAR).filter(|v| !v.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: POLL_INTERVAL_VAR,
                    value: raw.clone(),
                })?;
            config.poll_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = SyncConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides() {
        let config = SyncConfig::from_lookup(lookup(&[
            ("TODO_API_URL", "https://todos.example.com/v2"),
            ("TODO_POLL_INTERVAL_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://todos.example.com/v2");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_interval() {
        for bad in ["0", "soon", "-3"] {
            let err = SyncConfig::from_lookup(lookup(&[("TODO_POLL_INTERVAL_SECS", bad)]))
                .unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    key: "TODO_POLL_INTERVAL_SECS",
                    value: bad.to_string(),
                }
            );
        }
    }
}
