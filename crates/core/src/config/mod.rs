use serde::{Deserialize, Serialize};

use crate::errors::{GatewayError, GatewayResult};

/// Top-level application configuration, loaded from a TOML file with
/// `TICKETGATE_*` environment overrides layered on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub resolution: ResolutionConfig,
    /// Optional TOML file overriding the built-in classification rules.
    #[serde(default)]
    pub rules_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
}

/// Remote ticketing platform connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Table holding the ticket records.
    pub incident_table: String,
    /// Value of the client-identification header sent on every request.
    pub client_header: String,
}

/// Exponential backoff policy for the remote client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub base_delay_ms: u64,
    pub multiplier: f64,
    pub max_attempts: u32,
    /// Signed jitter fraction applied to each computed delay.
    pub jitter: f64,
}

/// Resolution settings. The close code must match a value in the remote
/// instance's choice list; it is operator configuration, not a constant
/// this system can assume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionConfig {
    pub close_code: String,
    pub default_note: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://instance.example.com/api/now/table".to_string(),
            username: "gateway".to_string(),
            password: String::new(),
            incident_table: "incident".to_string(),
            client_header: "ticketgate/0.3".to_string(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 500,
            multiplier: 2.0,
            max_attempts: 5,
            jitter: 0.15,
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            close_code: "Solution provided".to_string(),
            default_note: "Resolved via ticket gateway".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            remote: RemoteConfig::default(),
            retry: RetryPolicy::default(),
            resolution: ResolutionConfig::default(),
            rules_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then layer
    /// `TICKETGATE__SECTION__KEY` environment variables on top.
    pub fn load(path: Option<&str>) -> GatewayResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("TICKETGATE")
                .prefix_separator("__")
                .separator("__"),
        );

        let loaded: AppConfig = builder
            .build()
            .map_err(|e| GatewayError::Configuration(e.to_string()))?
            .try_deserialize()
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;

        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> GatewayResult<()> {
        if self.remote.base_url.trim().is_empty() {
            return Err(GatewayError::Configuration(
                "remote.base_url must not be empty".to_string(),
            ));
        }
        if self.remote.incident_table.trim().is_empty() {
            return Err(GatewayError::Configuration(
                "remote.incident_table must not be empty".to_string(),
            ));
        }
        if self.resolution.close_code.trim().is_empty() {
            return Err(GatewayError::Configuration(
                "resolution.close_code must not be empty".to_string(),
            ));
        }
        self.retry.validate()
    }
}

impl RetryPolicy {
    pub fn validate(&self) -> GatewayResult<()> {
        if self.max_attempts == 0 {
            return Err(GatewayError::Configuration(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.multiplier < 1.0 {
            return Err(GatewayError::Configuration(
                "retry.multiplier must be at least 1.0".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.jitter) {
            return Err(GatewayError::Configuration(
                "retry.jitter must be in [0.0, 1.0)".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.jitter, 0.15);
    }

    #[test]
    fn test_retry_policy_validation() {
        let mut policy = RetryPolicy::default();
        policy.max_attempts = 0;
        assert!(policy.validate().is_err());

        let mut policy = RetryPolicy::default();
        policy.multiplier = 0.5;
        assert!(policy.validate().is_err());

        let mut policy = RetryPolicy::default();
        policy.jitter = 1.5;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[server]
bind_address = "127.0.0.1:9000"

[remote]
base_url = "https://dev.example.com/api/now/table"
username = "svc"
password = "secret"
incident_table = "incident"
client_header = "ticketgate-test"

[retry]
base_delay_ms = 100
multiplier = 3.0
max_attempts = 4
jitter = 0.1

[resolution]
close_code = "Closed/Resolved by Caller"
default_note = "done"
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.retry.multiplier, 3.0);
        assert_eq!(config.resolution.close_code, "Closed/Resolved by Caller");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Some("/nonexistent/ticketgate.toml")).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
    }
}
