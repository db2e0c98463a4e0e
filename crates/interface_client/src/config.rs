//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use core_kernel::{CoreError, Timezone};

/// Environment variable prefix, e.g. `DESK_API_BASE_URL`
pub const ENV_PREFIX: &str = "DESK";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the repository and auth service, without a trailing slash
    pub api_base_url: String,
    /// Where the token and decoded user are persisted between runs
    pub session_file: PathBuf,
    /// Request timeout; none means wait as long as the server takes
    pub timeout_secs: Option<u64>,
    /// IANA name of the zone calendar dates are anchored in
    pub timezone: String,
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            session_file: PathBuf::from("policy-desk-session.json"),
            timeout_secs: None,
            timezone: "UTC".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from `DESK_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from the given environment source
    pub fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// The configured anchor timezone
    ///
    /// # Errors
    ///
    /// `CoreError::Temporal` when the name is not a known IANA zone.
    pub fn timezone(&self) -> Result<Timezone, CoreError> {
        Ok(self.timezone.parse::<Timezone>()?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Joins a path such as `/policies` onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        join_url(&self.api_base_url, path)
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ClientConfig {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_environment(
            config::Environment::with_prefix(ENV_PREFIX).source(Some(source)),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        assert_eq!(load(&[]), ClientConfig::default());
    }

    #[test]
    fn test_reads_prefixed_variables() {
        let config = load(&[
            ("DESK_API_BASE_URL", "https://desk.example.com/api/"),
            ("DESK_TIMEOUT_SECS", "15"),
            ("DESK_TIMEZONE", "Europe/London"),
        ]);
        assert_eq!(config.api_base_url, "https://desk.example.com/api/");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.endpoint("/policies"), "https://desk.example.com/api/policies");
        assert!(config.timezone().is_ok());
    }

    #[test]
    fn test_unknown_timezone_is_an_error() {
        let config = ClientConfig {
            timezone: "Nowhere/Special".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.timezone().is_err());
    }
}
